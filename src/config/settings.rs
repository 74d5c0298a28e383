//! User settings for WealthFlow
//!
//! Holds the login directory, the starting balance, display preferences and
//! where/how ledgers are stored.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::paths::WealthflowPaths;
use crate::error::LedgerError;
use crate::models::{normalize_login, AccountDirectory, Money, SortOrder};
use crate::storage::SheetDialect;

/// Where ledgers live and how they are written
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StoreSettings {
    /// Workbook directory; defaults to `<base>/workbook`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workbook_dir: Option<PathBuf>,

    /// Deadline for a single store operation, in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Header and category vocabulary for newly written partitions
    #[serde(default)]
    pub dialect: SheetDialect,
}

impl StoreSettings {
    pub fn workbook_dir(&self, paths: &WealthflowPaths) -> PathBuf {
        self.workbook_dir
            .clone()
            .unwrap_or_else(|| paths.workbook_dir())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

/// User settings for WealthFlow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Login identifier -> partition name
    #[serde(default)]
    pub accounts: BTreeMap<String, String>,

    /// Balance carried in before the first recorded row
    #[serde(default)]
    pub starting_balance: Money,

    /// Currency symbol used for display
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Re-sort the ledger by date after every append
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_append_sort: Option<SortOrder>,

    #[serde(default)]
    pub store: StoreSettings,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "₩".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            accounts: BTreeMap::new(),
            starting_balance: Money::zero(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            post_append_sort: None,
            store: StoreSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &WealthflowPaths) -> Result<Self, LedgerError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| LedgerError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                LedgerError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &WealthflowPaths) -> Result<(), LedgerError> {
        paths.ensure_directories()?;
        crate::storage::write_json_atomic(paths.settings_file(), self)
    }

    /// Login directory built from `accounts`
    pub fn directory(&self) -> AccountDirectory {
        AccountDirectory::from_mapping(&self.accounts)
    }

    /// Register (or re-point) a login
    pub fn register_account(&mut self, login: &str, partition: &str) -> Result<(), LedgerError> {
        let login = normalize_login(login);
        let partition = partition.trim();
        if login.is_empty() || partition.is_empty() {
            return Err(LedgerError::Validation(
                "Login and partition must not be empty".into(),
            ));
        }
        self.accounts.insert(login, partition.to_string());
        Ok(())
    }

    /// Remove a login; returns whether it was registered
    pub fn unregister_account(&mut self, login: &str) -> bool {
        self.accounts.remove(&normalize_login(login)).is_some()
    }
}
