//! Per-operation deadline for any store
//!
//! Each call runs on a worker thread; if it has not finished within the
//! deadline the caller gets `StoreUnavailable`. The worker cannot be
//! cancelled, so a timed-out write may still land later. Reload before
//! retrying.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::warn;

use super::{LedgerStore, Snapshot};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{AccountId, Revision, TransactionRecord};

/// Wraps a store and bounds how long each operation may take
#[derive(Debug)]
pub struct TimeoutStore<S> {
    inner: Arc<S>,
    timeout: Duration,
}

impl<S> TimeoutStore<S>
where
    S: LedgerStore + Send + Sync + 'static,
{
    pub fn new(inner: S, timeout: Duration) -> Self {
        Self {
            inner: Arc::new(inner),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn run<T, F>(&self, operation: &'static str, account: Option<&AccountId>, call: F) -> LedgerResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&S) -> LedgerResult<T> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let store = Arc::clone(&self.inner);

        thread::Builder::new()
            .name(format!("store-{}", operation))
            .spawn(move || {
                // Receiver may be gone after a timeout
                let _ = tx.send(call(&store));
            })
            .map_err(|e| LedgerError::unavailable(format!("Cannot start {}: {}", operation, e)))?;

        let target = account.map(|a| a.as_str()).unwrap_or("*");
        match rx.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => {
                warn!(operation, account = target, timeout = ?self.timeout, "Store operation timed out");
                Err(LedgerError::unavailable(format!(
                    "{} of '{}' timed out after {:?}",
                    operation, target, self.timeout
                )))
            }
            Err(RecvTimeoutError::Disconnected) => Err(LedgerError::unavailable(format!(
                "{} of '{}' aborted",
                operation, target
            ))),
        }
    }
}

impl<S> LedgerStore for TimeoutStore<S>
where
    S: LedgerStore + Send + Sync + 'static,
{
    fn load(&self, account: &AccountId) -> LedgerResult<Snapshot> {
        let owned = account.clone();
        self.run("load", Some(account), move |store| store.load(&owned))
    }

    fn replace(
        &self,
        account: &AccountId,
        records: &[TransactionRecord],
        expected: Option<Revision>,
    ) -> LedgerResult<Revision> {
        let owned = account.clone();
        let records = records.to_vec();
        self.run("replace", Some(account), move |store| {
            store.replace(&owned, &records, expected)
        })
    }

    fn supports_append(&self) -> bool {
        self.inner.supports_append()
    }

    fn append(
        &self,
        account: &AccountId,
        record: &TransactionRecord,
        expected: Option<Revision>,
    ) -> LedgerResult<Revision> {
        let owned = account.clone();
        let record = record.clone();
        self.run("append", Some(account), move |store| {
            store.append(&owned, &record, expected)
        })
    }

    fn partitions(&self) -> LedgerResult<Vec<AccountId>> {
        self.run("list", None, |store| store.partitions())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    /// Store that never answers within a reasonable time
    struct StalledStore;

    impl LedgerStore for StalledStore {
        fn load(&self, _account: &AccountId) -> LedgerResult<Snapshot> {
            thread::sleep(Duration::from_millis(500));
            Ok(Snapshot {
                records: Vec::new(),
                revision: Revision::new(1),
            })
        }

        fn replace(
            &self,
            _account: &AccountId,
            _records: &[TransactionRecord],
            _expected: Option<Revision>,
        ) -> LedgerResult<Revision> {
            thread::sleep(Duration::from_millis(500));
            Ok(Revision::new(2))
        }

        fn partitions(&self) -> LedgerResult<Vec<AccountId>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_passes_results_through() {
        let store = TimeoutStore::new(MemoryStore::new(), Duration::from_secs(5));
        let account = AccountId::new("newbin");

        assert!(store.load(&account).unwrap_err().is_not_found());
        let revision = store.replace(&account, &[], None).unwrap();
        assert_eq!(store.load(&account).unwrap().revision, revision);
        assert!(store.supports_append());
    }

    #[test]
    fn test_slow_store_becomes_unavailable() {
        let store = TimeoutStore::new(StalledStore, Duration::from_millis(20));
        let account = AccountId::new("newbin");

        assert!(store.load(&account).unwrap_err().is_store_unavailable());
        assert!(store
            .replace(&account, &[], None)
            .unwrap_err()
            .is_store_unavailable());
        assert!(!store.supports_append());
    }
}
