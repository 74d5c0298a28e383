//! Ledger model
//!
//! A ledger is the ordered set of records for one account, together with the
//! store revision it was read at.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::account::AccountId;
use super::record::TransactionRecord;

/// Opaque version token handed out by a store
///
/// Compared before a write to detect that someone else changed the
/// partition in the meantime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Revision(u64);

impl Revision {
    /// Revision of a partition that does not exist yet
    pub const ABSENT: Revision = Revision(0);

    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Parse the form produced by `Display` ("absent" or "r-<hex>")
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("absent") {
            return Some(Self::ABSENT);
        }
        let hex = s.strip_prefix("r-")?;
        u64::from_str_radix(hex, 16).ok().map(Self)
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::ABSENT {
            write!(f, "absent")
        } else {
            write!(f, "r-{:016x}", self.0)
        }
    }
}

/// Whether the partition behind a ledger exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerState {
    Absent,
    Present,
}

/// Optional ordering applied after an append
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Oldest first; undated rows go last
    Ascending,
    /// Newest first; undated rows go last
    Descending,
}

impl SortOrder {
    /// Stable sort of records by date
    pub fn apply(&self, records: &mut [TransactionRecord]) {
        match self {
            SortOrder::Ascending => records.sort_by(|a, b| match (a.date, b.date) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            }),
            SortOrder::Descending => records.sort_by(|a, b| match (a.date, b.date) {
                (Some(x), Some(y)) => y.cmp(&x),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            }),
        }
    }
}

/// One account's ledger as last seen in the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    account: AccountId,
    records: Vec<TransactionRecord>,
    revision: Revision,
    state: LedgerState,
}

impl Ledger {
    /// A ledger whose partition does not exist yet
    pub fn absent(account: AccountId) -> Self {
        Self {
            account,
            records: Vec::new(),
            revision: Revision::ABSENT,
            state: LedgerState::Absent,
        }
    }

    /// A ledger read from (or just written to) the store
    pub fn present(account: AccountId, records: Vec<TransactionRecord>, revision: Revision) -> Self {
        Self {
            account,
            records,
            revision,
            state: LedgerState::Present,
        }
    }

    pub fn account(&self) -> &AccountId {
        &self.account
    }

    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<TransactionRecord> {
        self.records
    }

    pub fn revision(&self) -> Revision {
        self.revision
    }

    pub fn state(&self) -> LedgerState {
        self.state
    }

    pub fn is_present(&self) -> bool {
        self.state == LedgerState::Present
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records sorted newest first, undated rows last
    pub fn recent(&self) -> Vec<TransactionRecord> {
        let mut records = self.records.clone();
        SortOrder::Descending.apply(&mut records);
        records
    }
}
