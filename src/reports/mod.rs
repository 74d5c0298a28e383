//! Reports module for WealthFlow
//!
//! Aggregates computed from a loaded ledger: scalar totals, the daily net
//! series, the per-item expense breakdown, and the dashboard combining them.

pub mod daily;
pub mod dashboard;
pub mod items;
pub mod summary;

pub use daily::{daily_net, DailyNet};
pub use dashboard::Dashboard;
pub use items::{ItemExpense, ItemReport};
pub use summary::LedgerSummary;
