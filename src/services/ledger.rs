//! Ledger service
//!
//! Load, append and bulk-replace operations on one account's ledger. The
//! service holds no session state: the caller passes the ledger it loaded
//! into every write, and the revision carried by that ledger guards against
//! overwriting somebody else's changes.

use tracing::{debug, info, warn};

use crate::audit::{AuditEntry, AuditLogger};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{AccountId, Ledger, Revision, SortOrder, TransactionRecord};
use crate::storage::LedgerStore;

/// Behaviour switches for ledger writes
#[derive(Debug, Clone, Copy, Default)]
pub struct LedgerOptions {
    /// Re-sort the whole ledger by date after each append
    ///
    /// Forces a full rewrite of the partition instead of a single-row append.
    pub post_append_sort: Option<SortOrder>,
}

/// Service for ledger management
pub struct LedgerService<'a, S: LedgerStore + ?Sized> {
    store: &'a S,
    options: LedgerOptions,
    audit: Option<&'a AuditLogger>,
}

impl<'a, S: LedgerStore + ?Sized> LedgerService<'a, S> {
    /// Create a new ledger service
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            options: LedgerOptions::default(),
            audit: None,
        }
    }

    pub fn with_options(mut self, options: LedgerOptions) -> Self {
        self.options = options;
        self
    }

    /// Record every successful write in the audit log
    pub fn with_audit(mut self, logger: &'a AuditLogger) -> Self {
        self.audit = Some(logger);
        self
    }

    /// Load an account's ledger
    ///
    /// A partition that does not exist yet yields an empty, absent ledger.
    /// An unreachable store is reported, never turned into an empty ledger.
    pub fn load(&self, account: &AccountId) -> LedgerResult<Ledger> {
        match self.open(account) {
            Err(e) if e.is_not_found() => {
                debug!(account = %account, "No partition yet, starting empty");
                Ok(Ledger::absent(account.clone()))
            }
            other => other,
        }
    }

    /// Load an account's ledger, failing with `PartitionNotFound` if absent
    pub fn open(&self, account: &AccountId) -> LedgerResult<Ledger> {
        let snapshot = self.store.load(account)?;
        Ok(Ledger::present(
            account.clone(),
            snapshot.records,
            snapshot.revision,
        ))
    }

    /// Create an empty ledger, persisting just the schema
    ///
    /// Fails with `Conflict` if the partition already exists.
    pub fn create(&self, account: &AccountId) -> LedgerResult<Ledger> {
        let revision = self.store.replace(account, &[], Some(Revision::ABSENT))?;
        info!(account = %account, "Created ledger");
        self.audit(AuditEntry::create(account, revision));
        Ok(Ledger::present(account.clone(), Vec::new(), revision))
    }

    /// Append one record to a ledger
    ///
    /// The record is validated first; an invalid record leaves the store
    /// untouched. Returns the ledger as it now stands in the store.
    pub fn append(&self, ledger: &Ledger, record: TransactionRecord) -> LedgerResult<Ledger> {
        let record = record.normalized();
        record
            .validate()
            .map_err(|e| LedgerError::invalid_record(e.to_string()))?;

        let account = ledger.account();
        let mut records = ledger.records().to_vec();
        records.push(record.clone());

        let revision = match self.options.post_append_sort {
            Some(order) => {
                order.apply(&mut records);
                self.store
                    .replace(account, &records, Some(ledger.revision()))?
            }
            None if self.store.supports_append() => {
                self.store
                    .append(account, &record, Some(ledger.revision()))?
            }
            None => self
                .store
                .replace(account, &records, Some(ledger.revision()))?,
        };

        info!(account = %account, rows = records.len(), "Appended record");
        self.audit(AuditEntry::append(account, revision, ledger.len(), &record));
        Ok(Ledger::present(account.clone(), records, revision))
    }

    /// Replace a ledger's entire contents
    ///
    /// Every record must pass the same checks as an append. The first
    /// invalid row rejects the whole replace and nothing is written.
    pub fn replace(&self, ledger: &Ledger, records: Vec<TransactionRecord>) -> LedgerResult<Ledger> {
        self.replace_checked(ledger.account(), records, Some(ledger.revision()), ledger.len())
    }

    /// Replace a ledger, requiring the partition to still be at `expected`
    ///
    /// For edits made outside this process (an exported file), where the
    /// revision was recorded at export time.
    pub fn replace_expecting(
        &self,
        account: &AccountId,
        records: Vec<TransactionRecord>,
        expected: Revision,
    ) -> LedgerResult<Ledger> {
        let before = self.count_rows(account);
        self.replace_checked(account, records, Some(expected), before)
    }

    /// Replace a ledger without checking for concurrent changes
    ///
    /// Last writer wins.
    pub fn force_replace(
        &self,
        account: &AccountId,
        records: Vec<TransactionRecord>,
    ) -> LedgerResult<Ledger> {
        let before = self.count_rows(account);
        self.replace_checked(account, records, None, before)
    }

    fn count_rows(&self, account: &AccountId) -> usize {
        match self.load(account) {
            Ok(ledger) => ledger.len(),
            Err(e) => {
                warn!(account = %account, error = %e, "Could not count rows before replace");
                0
            }
        }
    }

    fn replace_checked(
        &self,
        account: &AccountId,
        records: Vec<TransactionRecord>,
        expected: Option<Revision>,
        records_before: usize,
    ) -> LedgerResult<Ledger> {
        let records = validate_all(records)?;
        let revision = self.store.replace(account, &records, expected)?;

        info!(
            account = %account,
            before = records_before,
            after = records.len(),
            "Replaced ledger"
        );
        self.audit(AuditEntry::replace(
            account,
            revision,
            records_before,
            records.len(),
        ));
        Ok(Ledger::present(account.clone(), records, revision))
    }

    fn audit(&self, entry: AuditEntry) {
        if let Some(logger) = self.audit {
            // The write already happened; a broken audit log must not undo it
            if let Err(e) = logger.log(&entry) {
                warn!(error = %e, "Failed to write audit entry");
            }
        }
    }
}

/// Normalize and validate a full record set, rejecting on the first bad row
pub fn validate_all(records: Vec<TransactionRecord>) -> LedgerResult<Vec<TransactionRecord>> {
    records
        .into_iter()
        .enumerate()
        .map(|(row, record)| {
            let record = record.normalized();
            record
                .validate()
                .map_err(|e| LedgerError::invalid_row(row, e.to_string()))?;
            Ok(record)
        })
        .collect()
}
