//! Display formatting for terminal output
//!
//! Provides utilities for formatting ledgers, reports and the account
//! directory for terminal display.

pub mod account;
pub mod ledger;
pub mod report;

pub use account::format_account_list;
pub use ledger::{format_daily_series, format_dashboard, format_item_breakdown, format_record_table};
