//! Audit logging for WealthFlow
//!
//! Every successful ledger write (create, append, replace) is recorded in an
//! append-only JSON-lines log next to the settings file.
//!
//! - `AuditEntry`: one write, with timestamp, account, revision and row counts.
//! - `AuditLogger`: appends entries to the log file and reads them back.

mod entry;
mod logger;

pub use entry::{AuditEntry, Operation};
pub use logger::AuditLogger;
