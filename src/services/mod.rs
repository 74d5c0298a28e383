//! Business logic layer for WealthFlow
//!
//! The service layer sits between the CLI and the store, owning validation
//! and audit logging for ledger writes.

pub mod ledger;

pub use ledger::{validate_all, LedgerOptions, LedgerService};
