//! Export module for WealthFlow
//!
//! Writes a single ledger out in one of two formats:
//! - CSV: the workbook row layout (spreadsheet-compatible, re-importable)
//! - JSON: records plus totals, with schema versioning

pub mod csv;
pub mod json;

pub use self::csv::export_ledger_csv;
pub use self::json::{export_ledger_json, import_from_json, LedgerExport, EXPORT_SCHEMA_VERSION};

use std::path::Path;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{AccountId, Revision, TransactionRecord};
use crate::storage::rows;

/// Output format for an export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    /// Parse a format name
    pub fn parse(name: &str) -> LedgerResult<Self> {
        match name.trim().to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(LedgerError::Validation(format!(
                "Unknown export format '{}'. Use csv or json",
                other
            ))),
        }
    }

    /// Guess the format from a file extension, defaulting to CSV
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Csv,
        }
    }
}

/// Records read back from an edited export file
#[derive(Debug, Clone)]
pub struct EditedLedger {
    pub records: Vec<TransactionRecord>,
    /// Account and revision recorded at export time; CSV files carry neither
    pub account: Option<AccountId>,
    pub revision: Option<Revision>,
}

impl EditedLedger {
    /// Reject a file exported from a different account's ledger
    pub fn check_account(&self, target: &AccountId) -> LedgerResult<()> {
        match &self.account {
            Some(source) if source != target => Err(LedgerError::Validation(format!(
                "File was exported from ledger '{}', not '{}'",
                source, target
            ))),
            _ => Ok(()),
        }
    }
}

/// Read records from an edited export file for a bulk replace
pub fn read_records_file(path: &Path) -> LedgerResult<EditedLedger> {
    let bytes = std::fs::read(path)
        .map_err(|e| LedgerError::Io(format!("Failed to read {}: {}", path.display(), e)))?;

    match ExportFormat::from_path(path) {
        ExportFormat::Csv => Ok(EditedLedger {
            records: rows::decode(&bytes)?,
            account: None,
            revision: None,
        }),
        ExportFormat::Json => {
            let text = String::from_utf8(bytes)
                .map_err(|e| LedgerError::Json(format!("File is not UTF-8: {}", e)))?;
            let export = import_from_json(&text)?;
            Ok(EditedLedger {
                records: export.records,
                account: Some(export.account),
                revision: Some(export.revision),
            })
        }
    }
}
