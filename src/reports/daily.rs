//! Daily net series
//!
//! Per-calendar-day income minus expense, oldest day first. Savings moves
//! money between pockets rather than in or out, so savings rows are left out
//! entirely; a day with only savings rows does not appear.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{Category, Money, TransactionRecord};

/// Totals for one day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyNet {
    pub date: NaiveDate,
    pub income: Money,
    pub expense: Money,
    /// income - expense
    pub net: Money,
}

/// Build the daily series, skipping undated and non income/expense rows
pub fn daily_net(records: &[TransactionRecord]) -> Vec<DailyNet> {
    let mut days: BTreeMap<NaiveDate, (Money, Money)> = BTreeMap::new();

    for record in records {
        let Some(date) = record.date else { continue };
        match record.category {
            Category::Income => days.entry(date).or_default().0 += record.amount,
            Category::Expense => days.entry(date).or_default().1 += record.amount,
            _ => {}
        }
    }

    days.into_iter()
        .map(|(date, (income, expense))| DailyNet {
            date,
            income,
            expense,
            net: income - expense,
        })
        .collect()
}
