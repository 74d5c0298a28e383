use anyhow::Result;
use clap::{Parser, Subcommand};

use wealthflow::audit::AuditLogger;
use wealthflow::cli::{handle_account_command, handle_audit_command, handle_ledger_command};
use wealthflow::config::{Settings, WealthflowPaths};
use wealthflow::storage::{CsvStore, LedgerStore, TimeoutStore};

#[derive(Parser)]
#[command(
    name = "wealthflow",
    author = "Kaylee Beyene",
    version,
    about = "Personal finance ledger backed by sheet-style storage",
    long_about = "WealthFlow keeps one income/expense/savings ledger per account \
                  in a workbook of CSV sheets. It shows totals, a daily net \
                  series and an expense breakdown, and writes records back \
                  with optimistic concurrency checks."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Account directory commands
    #[command(subcommand)]
    Account(wealthflow::cli::AccountCommands),

    /// Ledger commands
    #[command(subcommand)]
    Ledger(wealthflow::cli::LedgerCommands),

    /// Show recent ledger writes
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Initialize the settings file and workbook
    Init,

    /// Show current configuration and paths
    Config,
}

fn open_store(paths: &WealthflowPaths, settings: &Settings) -> Box<dyn LedgerStore> {
    let workbook = CsvStore::new(settings.store.workbook_dir(paths), settings.store.dialect);
    match settings.store.timeout() {
        Some(timeout) => Box::new(TimeoutStore::new(workbook, timeout)),
        None => Box::new(workbook),
    }
}

fn main() -> Result<()> {
    wealthflow::init_tracing();
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = WealthflowPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    let store = open_store(&paths, &settings);
    let audit = AuditLogger::new(paths.audit_log());

    match cli.command {
        Some(Commands::Account(cmd)) => {
            handle_account_command(store.as_ref(), &paths, &mut settings, cmd)?;
        }
        Some(Commands::Ledger(cmd)) => {
            handle_ledger_command(store.as_ref(), &settings, &audit, cmd)?;
        }
        Some(Commands::Audit { limit }) => {
            handle_audit_command(&audit, limit)?;
        }
        Some(Commands::Init) => {
            println!("Initializing WealthFlow at: {}", paths.base_dir().display());
            let workbook = CsvStore::create(settings.store.workbook_dir(&paths), settings.store.dialect)?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Workbook: {}", workbook.root().display());
            println!("Run 'wealthflow account add <login>' to register an account.");
        }
        Some(Commands::Config) => {
            println!("WealthFlow Configuration");
            println!("========================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Settings file:  {}", paths.settings_file().display());
            println!("Workbook:       {}", settings.store.workbook_dir(&paths).display());
            println!("Audit log:      {}", paths.audit_log().display());
            println!(
                "Initialized:    {}",
                if paths.is_initialized() { "Yes" } else { "No" }
            );
            println!();
            println!("Settings:");
            println!("  Accounts: {}", settings.accounts.len());
            println!(
                "  Starting balance: {}",
                settings.starting_balance.format_with_symbol(&settings.currency_symbol)
            );
            println!("  Sheet dialect: {:?}", settings.store.dialect);
            println!("  Post-append sort: {:?}", settings.post_append_sort);
            match settings.store.timeout() {
                Some(timeout) => println!("  Store timeout: {}s", timeout.as_secs()),
                None => println!("  Store timeout: none"),
            }
        }
        None => {
            println!("WealthFlow - personal finance ledger");
            println!();
            println!("Run 'wealthflow --help' for usage information.");
            println!("Run 'wealthflow init' to get started.");
        }
    }

    Ok(())
}
