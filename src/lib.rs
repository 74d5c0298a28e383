//! WealthFlow - personal finance ledger over sheet-style storage
//!
//! Each account owns one ledger: an ordered list of dated income, expense
//! and savings records kept in a partition (one sheet tab) of a tabular
//! store. The library loads a ledger, derives totals and series from it,
//! and writes it back through single-record appends or full replaces.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (records, ledgers, money, accounts)
//! - `storage`: Store trait and the workbook, in-memory and timeout stores
//! - `services`: Load, append and replace with validation
//! - `reports`: Totals, daily series, item breakdown, dashboard
//! - `audit`: Audit logging system
//! - `export`: CSV and JSON export
//! - `display`: Terminal formatting
//! - `cli`: Command handlers for the `wealthflow` binary
//!
//! # Example
//!
//! ```rust
//! use wealthflow::models::{AccountId, Category, Money, TransactionRecord};
//! use wealthflow::reports::LedgerSummary;
//! use wealthflow::services::LedgerService;
//! use wealthflow::storage::MemoryStore;
//!
//! let store = MemoryStore::new();
//! let service = LedgerService::new(&store);
//! let account = AccountId::new("newbin");
//!
//! let ledger = service.load(&account)?;
//! let record = TransactionRecord::new(
//!     chrono::NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
//!     Category::Expense,
//!     "lunch",
//!     Money::from_units(1000),
//!     "",
//! );
//! let ledger = service.append(&ledger, record)?;
//!
//! let summary = LedgerSummary::from_records(ledger.records(), Money::zero());
//! assert_eq!(summary.expense, Money::from_units(1000));
//! # Ok::<(), wealthflow::LedgerError>(())
//! ```

use std::sync::Once;

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{LedgerError, LedgerResult};

static TRACING_INIT: Once = Once::new();

/// Install the global tracing subscriber (once)
///
/// Diagnostics go to stderr so exported data on stdout stays clean.
/// `RUST_LOG` overrides the default `wealthflow=warn` filter.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("wealthflow=warn"));

        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    });
}
