//! In-process store
//!
//! Keeps partitions in memory. Used as the fake store in tests and for
//! dry runs; `set_offline` simulates an unreachable backend.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::RwLock;

use super::{check_revision, LedgerStore, Snapshot};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{AccountId, Revision, TransactionRecord};

#[derive(Debug, Clone)]
struct Partition {
    records: Vec<TransactionRecord>,
    revision: Revision,
}

/// Store holding every partition in memory
#[derive(Debug)]
pub struct MemoryStore {
    partitions: RwLock<HashMap<AccountId, Partition>>,
    next_revision: AtomicU64,
    writes: AtomicUsize,
    offline: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            partitions: RwLock::new(HashMap::new()),
            next_revision: AtomicU64::new(1),
            writes: AtomicUsize::new(0),
            offline: AtomicBool::new(false),
        }
    }

    /// Make every subsequent operation fail with `StoreUnavailable`
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of successful writes (replace or append) so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn ensure_online(&self) -> LedgerResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            Err(LedgerError::unavailable("memory store is offline"))
        } else {
            Ok(())
        }
    }

    fn bump(&self) -> Revision {
        self.writes.fetch_add(1, Ordering::SeqCst);
        Revision::new(self.next_revision.fetch_add(1, Ordering::SeqCst))
    }

    fn write_with<F>(
        &self,
        account: &AccountId,
        expected: Option<Revision>,
        mutate: F,
    ) -> LedgerResult<Revision>
    where
        F: FnOnce(&mut Vec<TransactionRecord>),
    {
        self.ensure_online()?;
        let mut partitions = self.partitions.write().map_err(|e| {
            LedgerError::unavailable(format!("Failed to acquire write lock: {}", e))
        })?;

        let actual = partitions
            .get(account)
            .map(|p| p.revision)
            .unwrap_or(Revision::ABSENT);
        check_revision(account, expected, actual)?;

        let partition = partitions.entry(account.clone()).or_insert(Partition {
            records: Vec::new(),
            revision: Revision::ABSENT,
        });
        mutate(&mut partition.records);
        partition.revision = self.bump();
        Ok(partition.revision)
    }
}

impl LedgerStore for MemoryStore {
    fn load(&self, account: &AccountId) -> LedgerResult<Snapshot> {
        self.ensure_online()?;
        let partitions = self.partitions.read().map_err(|e| {
            LedgerError::unavailable(format!("Failed to acquire read lock: {}", e))
        })?;

        partitions
            .get(account)
            .map(|p| Snapshot {
                records: p.records.clone(),
                revision: p.revision,
            })
            .ok_or_else(|| LedgerError::PartitionNotFound(account.to_string()))
    }

    fn replace(
        &self,
        account: &AccountId,
        records: &[TransactionRecord],
        expected: Option<Revision>,
    ) -> LedgerResult<Revision> {
        self.write_with(account, expected, |stored| {
            *stored = records.to_vec();
        })
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
        self.write_with(account, expected, |stored| stored.push(record.clone()))
    }

    fn partitions(&self) -> LedgerResult<Vec<AccountId>> {
        self.ensure_online()?;
        let partitions = self.partitions.read().map_err(|e| {
            LedgerError::unavailable(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut accounts: Vec<_> = partitions.keys().cloned().collect();
        accounts.sort();
        Ok(accounts)
    }
}
