//! JSON Export functionality
//!
//! Exports one ledger to JSON with schema versioning, and reads such an
//! export back as input for a bulk replace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{AccountId, Ledger, Money, Revision, TransactionRecord};
use crate::reports::LedgerSummary;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Ledger export structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    /// Export timestamp
    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub account: AccountId,

    /// Store revision the ledger was read at
    pub revision: Revision,

    pub records: Vec<TransactionRecord>,

    /// Totals at export time, for reference only
    pub summary: LedgerSummary,

    pub metadata: ExportMetadata,
}

/// Export metadata for reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub record_count: usize,

    /// Earliest record date
    pub earliest_record: Option<String>,

    /// Latest record date
    pub latest_record: Option<String>,
}

impl LedgerExport {
    /// Create an export from a loaded ledger
    pub fn from_ledger(ledger: &Ledger, starting_balance: Money) -> Self {
        let records = ledger.records().to_vec();
        let dates = || records.iter().filter_map(|r| r.date);

        let metadata = ExportMetadata {
            record_count: records.len(),
            earliest_record: dates().min().map(|d| d.to_string()),
            latest_record: dates().max().map(|d| d.to_string()),
        };

        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            account: ledger.account().clone(),
            revision: ledger.revision(),
            summary: LedgerSummary::from_records(&records, starting_balance),
            records,
            metadata,
        }
    }

    /// Validate the export structure
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        if self.metadata.record_count != self.records.len() {
            return Err(format!(
                "Record count mismatch: metadata says {}, found {}",
                self.metadata.record_count,
                self.records.len()
            ));
        }

        Ok(())
    }
}

/// Export a ledger to JSON
pub fn export_ledger_json<W: Write>(
    ledger: &Ledger,
    starting_balance: Money,
    writer: &mut W,
    pretty: bool,
) -> LedgerResult<()> {
    let export = LedgerExport::from_ledger(ledger, starting_balance);

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| LedgerError::Export(e.to_string()))?;

    Ok(())
}

/// Read a JSON export back
pub fn import_from_json(json_str: &str) -> LedgerResult<LedgerExport> {
    let export: LedgerExport = serde_json::from_str(json_str)
        .map_err(|e| LedgerError::Json(format!("Invalid ledger export: {}", e)))?;

    export.validate().map_err(LedgerError::Validation)?;

    Ok(export)
}
