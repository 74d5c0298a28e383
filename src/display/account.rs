//! Account display formatting
//!
//! Formats the login-to-partition directory for terminal output.

use crate::models::{AccountDirectory, AccountId};

/// Format the account directory as a table
///
/// `existing` lists partitions the store currently holds; accounts whose
/// ledger has not been created yet are marked.
pub fn format_account_list(directory: &AccountDirectory, existing: &[AccountId]) -> String {
    if directory.is_empty() {
        return "No accounts registered.".to_string();
    }

    let login_width = directory
        .entries()
        .map(|(login, _)| login.chars().count())
        .max()
        .unwrap_or(5)
        .max(5);

    let partition_width = directory
        .entries()
        .map(|(_, id)| id.as_str().chars().count())
        .max()
        .unwrap_or(9)
        .max(9);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<login_width$}  {:<partition_width$}  {}\n",
        "Login",
        "Partition",
        "Ledger",
        login_width = login_width,
        partition_width = partition_width,
    ));

    output.push_str(&format!(
        "{:-<login_width$}  {:-<partition_width$}  {:-<9}\n",
        "",
        "",
        "",
        login_width = login_width,
        partition_width = partition_width,
    ));

    for (login, id) in directory.entries() {
        let status = if existing.contains(id) {
            "present"
        } else {
            "absent"
        };

        output.push_str(&format!(
            "{:<login_width$}  {:<partition_width$}  {}\n",
            login,
            id,
            status,
            login_width = login_width,
            partition_width = partition_width,
        ));
    }

    output
}
