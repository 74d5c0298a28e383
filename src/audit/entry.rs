//! Audit entry data structures
//!
//! Defines the structure of audit log entries: which ledger write happened,
//! against which account, and how the row count changed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{AccountId, Revision, TransactionRecord};

/// Types of ledger writes that are audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Empty ledger created
    Create,
    /// One record appended
    Append,
    /// Whole ledger replaced
    Replace,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Append => write!(f, "APPEND"),
            Operation::Replace => write!(f, "REPLACE"),
        }
    }
}

/// A single audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    /// Partition written to
    pub account: String,

    /// Revision the partition ended up at
    pub revision: Revision,

    pub records_before: usize,

    pub records_after: usize,

    /// The appended record, for appends
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record: Option<serde_json::Value>,
}

impl AuditEntry {
    /// Entry for a newly created, empty ledger
    pub fn create(account: &AccountId, revision: Revision) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: Operation::Create,
            account: account.to_string(),
            revision,
            records_before: 0,
            records_after: 0,
            record: None,
        }
    }

    /// Entry for a single appended record
    pub fn append(
        account: &AccountId,
        revision: Revision,
        records_before: usize,
        record: &TransactionRecord,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: Operation::Append,
            account: account.to_string(),
            revision,
            records_before,
            records_after: records_before + 1,
            record: serde_json::to_value(record).ok(),
        }
    }

    /// Entry for a bulk replace
    pub fn replace(
        account: &AccountId,
        revision: Revision,
        records_before: usize,
        records_after: usize,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: Operation::Replace,
            account: account.to_string(),
            revision,
            records_before,
            records_after,
            record: None,
        }
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} rows {} -> {} ({})",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.account,
            self.records_before,
            self.records_after,
            self.revision
        );

        if let Some(record) = &self.record {
            let item = record.get("item").and_then(|v| v.as_str()).unwrap_or("");
            output.push_str(&format!("\n  Added: {}", item));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Money};
    use chrono::NaiveDate;

    #[test]
    fn test_operation_display() {
        assert_eq!(Operation::Create.to_string(), "CREATE");
        assert_eq!(Operation::Append.to_string(), "APPEND");
        assert_eq!(Operation::Replace.to_string(), "REPLACE");
    }

    #[test]
    fn test_append_entry() {
        let record = TransactionRecord::new(
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            Category::Expense,
            "lunch",
            Money::from_units(1000),
            "",
        );
        let entry = AuditEntry::append(&AccountId::new("newbin"), Revision::new(9), 4, &record);

        assert_eq!(entry.operation, Operation::Append);
        assert_eq!(entry.records_after, 5);
        assert_eq!(entry.record.as_ref().unwrap()["item"], "lunch");
        assert!(entry.format_human_readable().contains("Added: lunch"));
    }

    #[test]
    fn test_serialization() {
        let entry = AuditEntry::replace(&AccountId::new("newbin"), Revision::new(3), 10, 8);

        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("\"record\""));
        let deserialized: AuditEntry = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.operation, Operation::Replace);
        assert_eq!(deserialized.records_before, 10);
        assert_eq!(deserialized.records_after, 8);
    }

    #[test]
    fn test_human_readable_format() {
        let entry = AuditEntry::create(&AccountId::new("sheet2"), Revision::new(1));
        let formatted = entry.format_human_readable();
        assert!(formatted.contains("CREATE"));
        assert!(formatted.contains("sheet2"));
        assert!(formatted.contains("rows 0 -> 0"));
    }
}
