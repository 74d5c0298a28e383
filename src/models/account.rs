//! Account identifiers and the login directory
//!
//! An account is nothing more than the name of a partition (sheet tab) in
//! the store. Users reach it through a login identifier that is mapped to
//! the partition by static configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{LedgerError, LedgerResult};

/// Partition key of one ledger
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(partition: impl Into<String>) -> Self {
        Self(partition.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Maps login identifiers to partitions
#[derive(Debug, Clone, Default)]
pub struct AccountDirectory {
    entries: BTreeMap<String, AccountId>,
}

impl AccountDirectory {
    /// Build a directory from the `login -> partition` table in settings
    pub fn from_mapping(mapping: &BTreeMap<String, String>) -> Self {
        let entries = mapping
            .iter()
            .map(|(login, partition)| (normalize_login(login), AccountId::new(partition.trim())))
            .collect();
        Self { entries }
    }

    /// Resolve a login to its account
    ///
    /// The login is trimmed and lower-cased first.
    pub fn resolve(&self, login: &str) -> LedgerResult<AccountId> {
        let key = normalize_login(login);
        if key.is_empty() {
            return Err(LedgerError::Validation(
                "No account identifier given".into(),
            ));
        }

        self.entries
            .get(&key)
            .cloned()
            .ok_or(LedgerError::UnknownAccount(key))
    }

    /// Registered logins with their partitions, sorted by login
    pub fn entries(&self) -> impl Iterator<Item = (&str, &AccountId)> {
        self.entries.iter().map(|(login, id)| (login.as_str(), id))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Canonical form of a login identifier
pub fn normalize_login(login: &str) -> String {
    login.trim().to_lowercase()
}
