//! Dashboard
//!
//! Everything the presentation layer shows for one ledger, computed in one
//! pass from a loaded ledger.

use serde::Serialize;

use crate::models::{AccountId, Ledger, Money, TransactionRecord};

use super::daily::{daily_net, DailyNet};
use super::items::ItemReport;
use super::summary::LedgerSummary;

/// Derived view of a ledger
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub account: AccountId,
    pub summary: LedgerSummary,
    pub daily: Vec<DailyNet>,
    pub items: ItemReport,
    /// Records newest first; undated rows last
    pub recent: Vec<TransactionRecord>,
}

impl Dashboard {
    pub fn build(ledger: &Ledger, starting_balance: Money) -> Self {
        let records = ledger.records();
        Self {
            account: ledger.account().clone(),
            summary: LedgerSummary::from_records(records, starting_balance),
            daily: daily_net(records),
            items: ItemReport::generate(records),
            recent: ledger.recent(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Revision};
    use chrono::NaiveDate;

    #[test]
    fn test_build_from_absent_ledger() {
        let ledger = Ledger::absent(AccountId::new("newbin"));
        let dashboard = Dashboard::build(&ledger, Money::zero());

        assert!(dashboard.summary.income.is_zero());
        assert!(dashboard.summary.available_balance.is_zero());
        assert!(dashboard.daily.is_empty());
        assert!(dashboard.items.items.is_empty());
        assert!(dashboard.recent.is_empty());
    }

    #[test]
    fn test_build_orders_recent_newest_first() {
        let date = |d| NaiveDate::from_ymd_opt(2025, 1, d).unwrap();
        let ledger = Ledger::present(
            AccountId::new("newbin"),
            vec![
                TransactionRecord::new(date(1), Category::Income, "salary", Money::from_units(100000), ""),
                TransactionRecord::new(date(9), Category::Expense, "lunch", Money::from_units(5000), ""),
                TransactionRecord::new(date(4), Category::SavingsDeposit, "plan A", Money::from_units(20000), ""),
            ],
            Revision::new(1),
        );

        let dashboard = Dashboard::build(&ledger, Money::from_units(1000));
        assert_eq!(dashboard.summary.available_balance, Money::from_units(76000));
        assert_eq!(dashboard.recent[0].item, "lunch");
        assert_eq!(dashboard.recent[2].item, "salary");
        assert_eq!(dashboard.daily.len(), 2);
        assert_eq!(dashboard.items.items[0].item, "lunch");
    }
}
