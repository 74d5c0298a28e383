//! Core data models for WealthFlow
//!
//! This module contains the data structures of the ledger domain: records,
//! ledgers, account identifiers and money.

pub mod account;
pub mod ledger;
pub mod money;
pub mod record;

pub use account::{normalize_login, AccountDirectory, AccountId};
pub use ledger::{Ledger, LedgerState, Revision, SortOrder};
pub use money::{Money, MoneyParseError};
pub use record::{parse_date, Category, RecordValidationError, TransactionRecord};
