//! Storage layer for WealthFlow
//!
//! A store holds one partition per account. The ledger core only needs
//! whole-partition reads and writes; stores that can append a single row
//! cheaply advertise it through `supports_append`.

pub mod csv_store;
pub mod file_io;
pub mod memory;
pub mod rows;
pub mod timeout;

pub use csv_store::CsvStore;
pub use file_io::{read_json, write_json_atomic};
pub use memory::MemoryStore;
pub use rows::SheetDialect;
pub use timeout::TimeoutStore;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{AccountId, Revision, TransactionRecord};

/// Contents of a partition at a given revision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub records: Vec<TransactionRecord>,
    pub revision: Revision,
}

/// A tabular store with one partition per account
pub trait LedgerStore {
    /// Read every record of a partition
    ///
    /// Fails with `PartitionNotFound` when the partition does not exist and
    /// with `StoreUnavailable` when the store cannot be reached.
    fn load(&self, account: &AccountId) -> LedgerResult<Snapshot>;

    /// Overwrite a partition, creating it if needed
    ///
    /// When `expected` is given the write only happens if the partition is
    /// still at that revision (`Revision::ABSENT` for "must not exist yet").
    fn replace(
        &self,
        account: &AccountId,
        records: &[TransactionRecord],
        expected: Option<Revision>,
    ) -> LedgerResult<Revision>;

    /// Whether `append` is cheaper than a full replace
    fn supports_append(&self) -> bool {
        false
    }

    /// Add one record to the end of a partition
    ///
    /// The default reads the partition and replaces it, which costs O(n).
    fn append(
        &self,
        account: &AccountId,
        record: &TransactionRecord,
        expected: Option<Revision>,
    ) -> LedgerResult<Revision> {
        let snapshot = match self.load(account) {
            Ok(snapshot) => snapshot,
            Err(e) if e.is_not_found() => Snapshot {
                records: Vec::new(),
                revision: Revision::ABSENT,
            },
            Err(e) => return Err(e),
        };
        check_revision(account, expected, snapshot.revision)?;

        let mut records = snapshot.records;
        records.push(record.clone());
        self.replace(account, &records, Some(snapshot.revision))
    }

    /// Accounts that currently have a partition
    fn partitions(&self) -> LedgerResult<Vec<AccountId>>;
}

impl<S: LedgerStore + ?Sized> LedgerStore for Box<S> {
    fn load(&self, account: &AccountId) -> LedgerResult<Snapshot> {
        (**self).load(account)
    }

    fn replace(
        &self,
        account: &AccountId,
        records: &[TransactionRecord],
        expected: Option<Revision>,
    ) -> LedgerResult<Revision> {
        (**self).replace(account, records, expected)
    }

    fn supports_append(&self) -> bool {
        (**self).supports_append()
    }

    fn append(
        &self,
        account: &AccountId,
        record: &TransactionRecord,
        expected: Option<Revision>,
    ) -> LedgerResult<Revision> {
        (**self).append(account, record, expected)
    }

    fn partitions(&self) -> LedgerResult<Vec<AccountId>> {
        (**self).partitions()
    }
}

/// Fail with `Conflict` unless `actual` matches the expected revision
pub fn check_revision(
    account: &AccountId,
    expected: Option<Revision>,
    actual: Revision,
) -> LedgerResult<()> {
    match expected {
        Some(expected) if expected != actual => Err(LedgerError::Conflict {
            account: account.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_revision() {
        let account = AccountId::new("newbin");
        assert!(check_revision(&account, None, Revision::new(3)).is_ok());
        assert!(check_revision(&account, Some(Revision::new(3)), Revision::new(3)).is_ok());

        let err = check_revision(&account, Some(Revision::ABSENT), Revision::new(3)).unwrap_err();
        assert!(err.is_conflict());
    }
}
