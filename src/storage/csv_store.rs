//! Workbook store backed by a directory of CSV files
//!
//! The workbook is a directory; each partition ("tab") is `<account>.csv`
//! inside it. The revision of a partition is a CRC-64 of its bytes, so any
//! change made by another process, including a hand edit, is detected.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crc::{Crc, CRC_64_ECMA_182};
use tracing::{debug, info};

use super::file_io::{read_optional, write_bytes_atomic};
use super::rows::{self, SheetDialect, SheetLayout};
use super::{check_revision, LedgerStore, Snapshot};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{AccountId, Revision, TransactionRecord};

const CHECKSUM: Crc<u64> = Crc::<u64>::new(&CRC_64_ECMA_182);

/// Store keeping one CSV file per account in a workbook directory
#[derive(Debug, Clone)]
pub struct CsvStore {
    root: PathBuf,
    dialect: SheetDialect,
}

impl CsvStore {
    /// Create a store over an existing or future workbook directory
    pub fn new(root: impl Into<PathBuf>, dialect: SheetDialect) -> Self {
        Self {
            root: root.into(),
            dialect,
        }
    }

    /// Create the workbook directory if needed and return the store
    pub fn create(root: impl Into<PathBuf>, dialect: SheetDialect) -> LedgerResult<Self> {
        let store = Self::new(root, dialect);
        std::fs::create_dir_all(&store.root).map_err(|e| {
            LedgerError::unavailable(format!(
                "Cannot create workbook {}: {}",
                store.root.display(),
                e
            ))
        })?;
        Ok(store)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn dialect(&self) -> SheetDialect {
        self.dialect
    }

    fn ensure_workbook(&self) -> LedgerResult<()> {
        match std::fs::metadata(&self.root) {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(LedgerError::unavailable(format!(
                "Workbook {} is not a directory",
                self.root.display()
            ))),
            Err(e) => Err(unavailable(&self.root, e)),
        }
    }

    fn partition_path(&self, account: &AccountId) -> LedgerResult<PathBuf> {
        let name = account.as_str();
        let valid = !name.is_empty()
            && !name.starts_with('.')
            && !name.chars().any(|c| c == '/' || c == '\\' || c.is_control());
        if !valid {
            return Err(LedgerError::Validation(format!(
                "Invalid partition name '{}'",
                name
            )));
        }
        Ok(self.root.join(format!("{}.csv", name)))
    }

    /// Current bytes of a partition, `None` when it does not exist
    fn read_partition(&self, account: &AccountId) -> LedgerResult<(PathBuf, Option<Vec<u8>>)> {
        self.ensure_workbook()?;
        let path = self.partition_path(account)?;
        let bytes = read_optional(&path).map_err(|e| unavailable(&path, e))?;
        Ok((path, bytes))
    }

    /// Vocabulary an existing partition is written in, else the store's own
    fn dialect_of(&self, bytes: Option<&[u8]>) -> SheetDialect {
        bytes
            .and_then(|b| rows::read_headers(b).ok().flatten())
            .and_then(|headers| SheetDialect::detect(&headers))
            .unwrap_or(self.dialect)
    }

    fn write_partition(
        &self,
        path: &Path,
        records: &[TransactionRecord],
        dialect: SheetDialect,
    ) -> LedgerResult<Revision> {
        let bytes = rows::encode(records, dialect)?;
        write_bytes_atomic(path, &bytes).map_err(|e| unavailable(path, e))?;

        info!(
            partition = %path.display(),
            rows = records.len(),
            ?dialect,
            "Wrote partition"
        );
        Ok(revision_of(&bytes))
    }
}

fn revision_of(bytes: &[u8]) -> Revision {
    // Zero is reserved for "absent"
    Revision::new(CHECKSUM.checksum(bytes).max(1))
}

fn current_revision(bytes: &Option<Vec<u8>>) -> Revision {
    bytes
        .as_deref()
        .map(revision_of)
        .unwrap_or(Revision::ABSENT)
}

fn unavailable(path: &Path, err: std::io::Error) -> LedgerError {
    let hint = match err.kind() {
        ErrorKind::NotFound => "not found",
        ErrorKind::PermissionDenied => "permission denied",
        _ => "I/O failure",
    };
    LedgerError::unavailable(format!("{} ({}): {}", path.display(), hint, err))
}

impl LedgerStore for CsvStore {
    fn load(&self, account: &AccountId) -> LedgerResult<Snapshot> {
        let (path, bytes) = self.read_partition(account)?;
        let bytes = bytes.ok_or_else(|| LedgerError::PartitionNotFound(account.to_string()))?;

        let records = rows::decode(&bytes)?;
        debug!(
            partition = %path.display(),
            rows = records.len(),
            "Loaded partition"
        );

        Ok(Snapshot {
            revision: revision_of(&bytes),
            records,
        })
    }

    fn replace(
        &self,
        account: &AccountId,
        records: &[TransactionRecord],
        expected: Option<Revision>,
    ) -> LedgerResult<Revision> {
        let (path, current) = self.read_partition(account)?;
        check_revision(account, expected, current_revision(&current))?;

        let dialect = self.dialect_of(current.as_deref());
        self.write_partition(&path, records, dialect)
    }

    fn supports_append(&self) -> bool {
        true
    }

    fn append(
        &self,
        account: &AccountId,
        record: &TransactionRecord,
        expected: Option<Revision>,
    ) -> LedgerResult<Revision> {
        let (path, current) = self.read_partition(account)?;
        check_revision(account, expected, current_revision(&current))?;

        let existing = current.unwrap_or_default();
        let layout = match rows::read_headers(&existing)? {
            Some(headers) => SheetLayout::from_headers(&headers, self.dialect),
            // Nothing worth keeping: write a fresh partition with a header
            None => {
                return self.write_partition(&path, std::slice::from_ref(record), self.dialect)
            }
        };

        if !layout.is_complete() {
            // The header cannot hold every field; rewrite in canonical form
            let mut records = rows::decode(&existing)?;
            records.push(record.clone());
            debug!(partition = %path.display(), "Header incomplete, rewriting partition");
            return self.write_partition(&path, &records, layout.dialect());
        }

        let mut chunk = Vec::new();
        if !existing.ends_with(b"\n") {
            chunk.push(b'\n');
        }
        chunk.extend(layout.encode_row(record)?);

        let mut file = OpenOptions::new()
            .append(true)
            .open(&path)
            .map_err(|e| unavailable(&path, e))?;
        file.write_all(&chunk)
            .and_then(|_| file.sync_all())
            .map_err(|e| unavailable(&path, e))?;

        debug!(partition = %path.display(), "Appended one row");

        let mut updated = existing;
        updated.extend(chunk);
        Ok(revision_of(&updated))
    }

    fn partitions(&self) -> LedgerResult<Vec<AccountId>> {
        self.ensure_workbook()?;
        let entries = std::fs::read_dir(&self.root).map_err(|e| unavailable(&self.root, e))?;

        let mut accounts = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| unavailable(&self.root, e))?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("csv") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                accounts.push(AccountId::new(stem));
            }
        }
        accounts.sort();
        Ok(accounts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Money};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_store(dialect: SheetDialect) -> (TempDir, CsvStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = CsvStore::create(temp_dir.path().join("workbook"), dialect).unwrap();
        (temp_dir, store)
    }

    fn lunch() -> TransactionRecord {
        TransactionRecord::new(
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            Category::Expense,
            "lunch",
            Money::from_units(1000),
            "",
        )
    }

    #[test]
    fn test_missing_partition_is_not_found() {
        let (_temp_dir, store) = create_test_store(SheetDialect::English);
        let err = store.load(&AccountId::new("newbin")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_missing_workbook_is_unavailable() {
        let temp_dir = TempDir::new().unwrap();
        let store = CsvStore::new(temp_dir.path().join("nope"), SheetDialect::English);

        let err = store.load(&AccountId::new("newbin")).unwrap_err();
        assert!(err.is_store_unavailable());

        let err = store.replace(&AccountId::new("newbin"), &[], None).unwrap_err();
        assert!(err.is_store_unavailable());
    }

    #[test]
    fn test_replace_then_load() {
        let (_temp_dir, store) = create_test_store(SheetDialect::English);
        let account = AccountId::new("newbin");

        let revision = store.replace(&account, &[lunch()], Some(Revision::ABSENT)).unwrap();
        let snapshot = store.load(&account).unwrap();

        assert_eq!(snapshot.records, vec![lunch()]);
        assert_eq!(snapshot.revision, revision);
        assert_ne!(revision, Revision::ABSENT);
    }

    #[test]
    fn test_empty_replace_persists_schema() {
        let (_temp_dir, store) = create_test_store(SheetDialect::Korean);
        let account = AccountId::new("sheet2");

        store.replace(&account, &[], None).unwrap();

        let raw = std::fs::read_to_string(store.root().join("sheet2.csv")).unwrap();
        assert_eq!(raw, "날짜,구분,항목,금액,메모\n");
        assert!(store.load(&account).unwrap().records.is_empty());
    }

    #[test]
    fn test_stale_revision_conflicts() {
        let (_temp_dir, store) = create_test_store(SheetDialect::English);
        let account = AccountId::new("newbin");

        let first = store.replace(&account, &[], None).unwrap();
        store.replace(&account, &[lunch()], Some(first)).unwrap();

        let err = store.replace(&account, &[], Some(first)).unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(store.load(&account).unwrap().records.len(), 1);
    }

    #[test]
    fn test_hand_edit_changes_revision() {
        let (_temp_dir, store) = create_test_store(SheetDialect::English);
        let account = AccountId::new("newbin");

        let revision = store.replace(&account, &[lunch()], None).unwrap();
        let path = store.root().join("newbin.csv");
        let mut raw = std::fs::read_to_string(&path).unwrap();
        raw.push_str("2025-01-16,income,bonus,5000,\n");
        std::fs::write(&path, raw).unwrap();

        let err = store.append(&account, &lunch(), Some(revision)).unwrap_err();
        assert!(err.is_conflict());
    }

    #[test]
    fn test_append_adds_single_row() {
        let (_temp_dir, store) = create_test_store(SheetDialect::English);
        let account = AccountId::new("newbin");

        let first = store.append(&account, &lunch(), Some(Revision::ABSENT)).unwrap();
        let second = store.append(&account, &lunch(), Some(first)).unwrap();

        let snapshot = store.load(&account).unwrap();
        assert_eq!(snapshot.records.len(), 2);
        assert_eq!(snapshot.revision, second);
    }

    #[test]
    fn test_append_keeps_existing_korean_vocabulary() {
        let (_temp_dir, store) = create_test_store(SheetDialect::English);
        let path = store.root().join("newbin.csv");
        std::fs::write(&path, "날짜,구분,항목,금액,메모\n2025-01-01,수익,월급,100000,").unwrap();

        store.append(&AccountId::new("newbin"), &lunch(), None).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.ends_with("\n2025-01-15,지출,lunch,1000,\n"));
        let records = store.load(&AccountId::new("newbin")).unwrap().records;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].category, Category::Income);
    }

    #[test]
    fn test_append_follows_reordered_header() {
        let (_temp_dir, store) = create_test_store(SheetDialect::English);
        let account = AccountId::new("newbin");
        let path = store.root().join("newbin.csv");
        std::fs::write(&path, "amount,item,date,category,memo\n5000,salary,2025-01-01,income,\n")
            .unwrap();

        store.append(&account, &lunch(), None).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.ends_with("\n1000,lunch,2025-01-15,expense,\n"));
        let records = store.load(&account).unwrap().records;
        assert_eq!(records.len(), 2);
        assert_eq!(records[1], lunch());
    }

    #[test]
    fn test_append_to_partial_header_rewrites_partition() {
        let (_temp_dir, store) = create_test_store(SheetDialect::English);
        let account = AccountId::new("newbin");
        let path = store.root().join("newbin.csv");
        std::fs::write(&path, "amount,item,date\n700,bus,2025-01-02\n").unwrap();

        let revision = store.append(&account, &lunch(), None).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with("date,category,item,amount,memo\n"));
        let snapshot = store.load(&account).unwrap();
        assert_eq!(snapshot.revision, revision);
        assert_eq!(snapshot.records.len(), 2);
        assert_eq!(snapshot.records[0].item, "bus");
        assert_eq!(snapshot.records[1], lunch());
    }

    #[test]
    fn test_replace_keeps_existing_korean_vocabulary() {
        let (_temp_dir, store) = create_test_store(SheetDialect::English);
        let account = AccountId::new("newbin");
        let path = store.root().join("newbin.csv");
        std::fs::write(&path, "날짜,구분,항목,금액,메모\n2025-01-01,수익,월급,100000,\n").unwrap();

        store.replace(&account, &[lunch()], None).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert_eq!(raw, "날짜,구분,항목,금액,메모\n2025-01-15,지출,lunch,1000,\n");

        // A fresh partition still uses the configured vocabulary
        store.replace(&AccountId::new("sheet2"), &[lunch()], None).unwrap();
        let raw = std::fs::read_to_string(store.root().join("sheet2.csv")).unwrap();
        assert!(raw.starts_with("date,category,item,amount,memo\n"));
    }

    #[test]
    fn test_invalid_partition_name() {
        let (_temp_dir, store) = create_test_store(SheetDialect::English);
        let err = store.load(&AccountId::new("../etc")).unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
    }

    #[test]
    fn test_partitions_listed() {
        let (_temp_dir, store) = create_test_store(SheetDialect::English);
        store.replace(&AccountId::new("sheet2"), &[], None).unwrap();
        store.replace(&AccountId::new("newbin"), &[], None).unwrap();
        std::fs::write(store.root().join("notes.txt"), "x").unwrap();

        assert_eq!(
            store.partitions().unwrap(),
            vec![AccountId::new("newbin"), AccountId::new("sheet2")]
        );
    }
}
