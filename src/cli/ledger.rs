//! Ledger CLI commands
//!
//! Implements CLI commands for reading and writing an account's ledger.

use std::io::Write;
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::Subcommand;

use crate::audit::AuditLogger;
use crate::config::Settings;
use crate::display::{format_daily_series, format_dashboard, format_item_breakdown, format_record_table};
use crate::error::{LedgerError, LedgerResult};
use crate::export::{export_ledger_csv, export_ledger_json, read_records_file, ExportFormat};
use crate::models::{parse_date, AccountId, Category, Money, Revision, TransactionRecord};
use crate::reports::{daily_net, Dashboard, ItemReport, LedgerSummary};
use crate::services::{LedgerOptions, LedgerService};
use crate::storage::{file_io, LedgerStore};

/// Ledger subcommands
#[derive(Subcommand)]
pub enum LedgerCommands {
    /// Create an empty ledger for an account
    Create {
        /// Login identifier
        login: String,
    },
    /// List records, newest first
    List {
        /// Login identifier
        login: String,
        /// Number of records to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
        /// Show every record
        #[arg(short, long)]
        all: bool,
    },
    /// Append a record
    Add {
        /// Login identifier
        login: String,
        /// Category (income, expense, savings-deposit, savings-investment)
        category: String,
        /// Item label
        item: String,
        /// Amount (e.g., "5000", "5,000" or "10.50")
        amount: String,
        /// Record date (defaults to today)
        #[arg(short, long)]
        date: Option<String>,
        /// Memo
        #[arg(short, long, default_value = "")]
        memo: String,
    },
    /// Show income, expense, savings and available balance
    Summary {
        /// Login identifier
        login: String,
    },
    /// Show the per-day net series
    Daily {
        /// Login identifier
        login: String,
    },
    /// Show expenses grouped by item
    Items {
        /// Login identifier
        login: String,
        /// Number of items to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },
    /// Show the full dashboard
    Show {
        /// Login identifier
        login: String,
    },
    /// Replace the whole ledger with the contents of an edited file
    Replace {
        /// Login identifier
        login: String,
        /// CSV or JSON file (as written by `ledger export`)
        file: PathBuf,
        /// Revision the edit was based on (defaults to the one in a JSON export)
        #[arg(long)]
        revision: Option<String>,
        /// Overwrite even if the ledger changed since the file was exported
        #[arg(long)]
        force: bool,
    },
    /// Export the ledger
    Export {
        /// Login identifier
        login: String,
        /// Output format (csv, json); guessed from --output when omitted
        #[arg(short, long)]
        format: Option<String>,
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Handle a ledger command
pub fn handle_ledger_command<S: LedgerStore + ?Sized>(
    store: &S,
    settings: &Settings,
    audit: &AuditLogger,
    cmd: LedgerCommands,
) -> LedgerResult<()> {
    let directory = settings.directory();
    let service = LedgerService::new(store)
        .with_options(LedgerOptions {
            post_append_sort: settings.post_append_sort,
        })
        .with_audit(audit);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        LedgerCommands::Create { login } => {
            let account = directory.resolve(&login)?;
            let ledger = service.create(&account).map_err(|e| {
                if e.is_conflict() {
                    LedgerError::Validation(format!("Ledger '{}' already exists", account))
                } else {
                    e
                }
            })?;
            println!("Created ledger: {}", ledger.account());
        }

        LedgerCommands::List { login, limit, all } => {
            let ledger = load_existing(&service, &directory.resolve(&login)?)?;
            let recent = ledger.recent();
            let shown = if all { recent.len() } else { limit.min(recent.len()) };

            print!("{}", format_record_table(&recent[..shown], symbol));
            if shown < recent.len() {
                println!("Showing {} of {} records. Use --all to see every record.", shown, recent.len());
            }
        }

        LedgerCommands::Add {
            login,
            category,
            item,
            amount,
            date,
            memo,
        } => {
            let account = directory.resolve(&login)?;
            let amount = Money::parse(&amount).map_err(|e| {
                LedgerError::Validation(format!(
                    "Invalid amount: '{}'. Use format like '5000' or '10.50'. Error: {}",
                    amount, e
                ))
            })?;
            let date = match date {
                Some(text) => parse_input_date(&text, &settings.date_format)?,
                None => Local::now().date_naive(),
            };
            let record = TransactionRecord::new(date, Category::parse(&category), item, amount, memo);

            let ledger = service.load(&account)?;
            let updated = service.append(&ledger, record.clone())?;
            let summary = LedgerSummary::from_records(updated.records(), settings.starting_balance);

            println!(
                "Added to {}: {} {} {} {}",
                account,
                date.format("%Y-%m-%d"),
                record.category,
                record.item.trim(),
                record.amount.format_with_symbol(symbol)
            );
            println!(
                "  Available balance: {}",
                summary.available_balance.format_with_symbol(symbol)
            );
        }

        LedgerCommands::Summary { login } => {
            let ledger = service.load(&directory.resolve(&login)?)?;
            let summary = LedgerSummary::from_records(ledger.records(), settings.starting_balance);
            println!("Ledger: {}\n", ledger.account());
            print!("{}", summary.format_terminal(symbol));
        }

        LedgerCommands::Daily { login } => {
            let ledger = service.load(&directory.resolve(&login)?)?;
            print!("{}", format_daily_series(&daily_net(ledger.records()), symbol));
        }

        LedgerCommands::Items { login, limit } => {
            let ledger = service.load(&directory.resolve(&login)?)?;
            let report = ItemReport::generate(ledger.records());
            print!("{}", format_item_breakdown(&report, symbol, limit));
        }

        LedgerCommands::Show { login } => {
            let ledger = service.load(&directory.resolve(&login)?)?;
            let dashboard = Dashboard::build(&ledger, settings.starting_balance);
            print!("{}", format_dashboard(&dashboard, symbol, 10));
        }

        LedgerCommands::Replace {
            login,
            file,
            revision,
            force,
        } => {
            let account = directory.resolve(&login)?;
            let edited = read_records_file(&file)?;
            edited.check_account(&account)?;

            let explicit = revision
                .map(|text| {
                    Revision::parse(&text).ok_or_else(|| {
                        LedgerError::Validation(format!("Invalid revision: '{}'", text))
                    })
                })
                .transpose()?;

            let ledger = if force {
                service.force_replace(&account, edited.records)?
            } else if let Some(expected) = explicit.or(edited.revision) {
                service.replace_expecting(&account, edited.records, expected)?
            } else {
                let current = service.load(&account)?;
                service.replace(&current, edited.records)?
            };

            println!("Replaced ledger {}: {} records", account, ledger.len());
            println!("  Revision: {}", ledger.revision());
        }

        LedgerCommands::Export {
            login,
            format,
            output,
        } => {
            let ledger = load_existing(&service, &directory.resolve(&login)?)?;
            let format = match (&format, &output) {
                (Some(name), _) => ExportFormat::parse(name)?,
                (None, Some(path)) => ExportFormat::from_path(path),
                (None, None) => ExportFormat::Csv,
            };

            let mut buffer = Vec::new();
            match format {
                ExportFormat::Csv => export_ledger_csv(&ledger, settings.store.dialect, &mut buffer)?,
                ExportFormat::Json => {
                    export_ledger_json(&ledger, settings.starting_balance, &mut buffer, true)?;
                    buffer.push(b'\n');
                }
            }

            match output {
                Some(path) => {
                    file_io::write_bytes_atomic(&path, &buffer)?;
                    eprintln!(
                        "Exported {} records from {} to {}",
                        ledger.len(),
                        ledger.account(),
                        path.display()
                    );
                }
                None => {
                    let mut stdout = std::io::stdout().lock();
                    stdout.write_all(&buffer)?;
                    stdout.flush()?;
                }
            }
        }
    }

    Ok(())
}

/// Load a ledger that must already exist
fn load_existing<S: LedgerStore + ?Sized>(
    service: &LedgerService<'_, S>,
    account: &AccountId,
) -> LedgerResult<crate::models::Ledger> {
    service.open(account).map_err(|e| {
        if e.is_not_found() {
            LedgerError::PartitionNotFound(format!(
                "{} (run 'wealthflow ledger create' first)",
                account
            ))
        } else {
            e
        }
    })
}

/// Parse a user-entered date, trying the configured format first
fn parse_input_date(text: &str, format: &str) -> LedgerResult<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), format)
        .ok()
        .or_else(|| parse_date(text))
        .ok_or_else(|| {
            LedgerError::Validation(format!(
                "Invalid date: '{}'. Expected {} or YYYY-MM-DD",
                text, format
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input_date() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        assert_eq!(parse_input_date("2025-03-09", "%Y-%m-%d").unwrap(), expected);
        assert_eq!(parse_input_date("09/03/2025", "%d/%m/%Y").unwrap(), expected);
        assert_eq!(parse_input_date("2025.03.09", "%d/%m/%Y").unwrap(), expected);
        assert!(parse_input_date("yesterday", "%Y-%m-%d").is_err());
    }
}
