//! Ledger Summary
//!
//! Scalar totals over a record set: income, expense, savings and the
//! resulting available balance.

use serde::{Deserialize, Serialize};

use crate::models::{Category, Money, TransactionRecord};

/// Category totals and available balance for a ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LedgerSummary {
    pub income: Money,
    pub expense: Money,
    /// Savings put into deposit plans
    pub savings_deposit: Money,
    /// Savings put into investments
    pub savings_investment: Money,
    /// Deposit plus investment
    pub savings: Money,
    pub starting_balance: Money,
    /// Starting balance + income - expense - savings
    pub available_balance: Money,
    /// Rows with an unknown or blank category, left out of every total
    pub unrecognized_count: usize,
}

impl LedgerSummary {
    /// Sum a record set
    ///
    /// Records with an unrecognized category are counted but not summed.
    pub fn from_records(records: &[TransactionRecord], starting_balance: Money) -> Self {
        let mut summary = Self {
            starting_balance,
            ..Self::default()
        };

        for record in records {
            match &record.category {
                Category::Income => summary.income += record.amount,
                Category::Expense => summary.expense += record.amount,
                Category::SavingsDeposit => summary.savings_deposit += record.amount,
                Category::SavingsInvestment => summary.savings_investment += record.amount,
                Category::Unrecognized(_) => summary.unrecognized_count += 1,
            }
        }

        summary.savings = summary.savings_deposit + summary.savings_investment;
        summary.available_balance =
            starting_balance + summary.income - summary.expense - summary.savings;
        summary
    }

    /// Format the summary for terminal display
    pub fn format_terminal(&self, symbol: &str) -> String {
        let mut output = String::new();
        let line = |label: &str, amount: Money| {
            format!("{:<22} {:>16}\n", label, amount.format_with_symbol(symbol))
        };

        output.push_str(&line("Income", self.income));
        output.push_str(&line("Expense", self.expense));
        output.push_str(&line("Savings", self.savings));
        output.push_str(&line("  deposit", self.savings_deposit));
        output.push_str(&line("  investment", self.savings_investment));
        output.push_str(&"-".repeat(39));
        output.push('\n');
        if !self.starting_balance.is_zero() {
            output.push_str(&line("Starting balance", self.starting_balance));
        }
        output.push_str(&line("Available balance", self.available_balance));

        if self.unrecognized_count > 0 {
            output.push_str(&format!(
                "\n{} row(s) with an unrecognized category were not counted.\n",
                self.unrecognized_count
            ));
        }

        output
    }
}
