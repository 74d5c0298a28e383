//! Account CLI commands
//!
//! Implements CLI commands for the login-to-partition directory.

use clap::Subcommand;
use tracing::warn;

use crate::config::{Settings, WealthflowPaths};
use crate::display::format_account_list;
use crate::error::{LedgerError, LedgerResult};
use crate::storage::LedgerStore;

/// Account subcommands
#[derive(Subcommand)]
pub enum AccountCommands {
    /// List registered accounts
    List,
    /// Register a login
    Add {
        /// Login identifier
        login: String,
        /// Partition (sheet tab) holding the ledger; defaults to the login
        partition: Option<String>,
    },
    /// Remove a login from the directory (its ledger is kept)
    Remove {
        /// Login identifier
        login: String,
    },
}

/// Handle an account command
pub fn handle_account_command<S: LedgerStore + ?Sized>(
    store: &S,
    paths: &WealthflowPaths,
    settings: &mut Settings,
    cmd: AccountCommands,
) -> LedgerResult<()> {
    match cmd {
        AccountCommands::List => {
            let existing = store.partitions().unwrap_or_else(|e| {
                warn!(error = %e, "Could not list partitions");
                Vec::new()
            });
            println!("{}", format_account_list(&settings.directory(), &existing));
        }

        AccountCommands::Add { login, partition } => {
            let partition = partition.unwrap_or_else(|| login.clone());
            settings.register_account(&login, &partition)?;
            settings.save(paths)?;

            let account = settings.directory().resolve(&login)?;
            println!("Registered account: {}", login.trim().to_lowercase());
            println!("  Partition: {}", account);
        }

        AccountCommands::Remove { login } => {
            if !settings.unregister_account(&login) {
                return Err(LedgerError::UnknownAccount(login.trim().to_lowercase()));
            }
            settings.save(paths)?;
            println!("Removed account: {}", login.trim().to_lowercase());
        }
    }

    Ok(())
}
