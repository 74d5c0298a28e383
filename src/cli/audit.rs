//! Audit CLI command
//!
//! Shows the most recent ledger writes.

use crate::audit::AuditLogger;
use crate::error::LedgerResult;

/// Print the last `limit` audit entries, oldest first
pub fn handle_audit_command(logger: &AuditLogger, limit: usize) -> LedgerResult<()> {
    let entries = logger.read_recent(limit)?;

    if entries.is_empty() {
        println!("No ledger writes recorded yet.");
        return Ok(());
    }

    for entry in &entries {
        println!("{}", entry.format_human_readable());
    }

    Ok(())
}
