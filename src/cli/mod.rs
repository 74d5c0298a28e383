//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod account;
pub mod audit;
pub mod ledger;

pub use account::{handle_account_command, AccountCommands};
pub use audit::handle_audit_command;
pub use ledger::{handle_ledger_command, LedgerCommands};
