//! Expense breakdown by item
//!
//! Generates per-item expense totals, largest first.

use std::collections::HashMap;
use std::io::Write;

use serde::Serialize;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Category, Money, TransactionRecord};

/// Expense totals for one item label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemExpense {
    pub item: String,
    pub total: Money,
    /// Number of expense rows with this item
    pub count: usize,
    /// Share of all expenses, 0-100
    pub percentage: f64,
}

/// Expense breakdown for a record set
#[derive(Debug, Clone, Default, Serialize)]
pub struct ItemReport {
    pub items: Vec<ItemExpense>,
    pub total_expense: Money,
}

impl ItemReport {
    /// Aggregate expense rows by item
    ///
    /// Items compare after trimming. Ties on total are broken by item name.
    pub fn generate(records: &[TransactionRecord]) -> Self {
        let mut by_item: HashMap<&str, (Money, usize)> = HashMap::new();
        let mut total_expense = Money::zero();

        for record in records.iter().filter(|r| r.category == Category::Expense) {
            let entry = by_item.entry(record.item.trim()).or_default();
            entry.0 += record.amount;
            entry.1 += 1;
            total_expense += record.amount;
        }

        let mut items: Vec<ItemExpense> = by_item
            .into_iter()
            .map(|(item, (total, count))| ItemExpense {
                item: item.to_string(),
                total,
                count,
                percentage: percentage_of(total, total_expense),
            })
            .collect();

        items.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.item.cmp(&b.item)));

        Self {
            items,
            total_expense,
        }
    }

    /// Largest `limit` items
    pub fn top(&self, limit: usize) -> &[ItemExpense] {
        &self.items[..limit.min(self.items.len())]
    }

    /// Export the breakdown to CSV format
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> LedgerResult<()> {
        let mut out = csv::Writer::from_writer(writer);
        out.write_record(["item", "total", "count", "percentage"])?;

        for item in &self.items {
            out.write_record([
                item.item.clone(),
                item.total.to_cell(),
                item.count.to_string(),
                format!("{:.2}", item.percentage),
            ])?;
        }

        out.flush()
            .map_err(|e| LedgerError::Export(e.to_string()))?;
        Ok(())
    }
}

fn percentage_of(part: Money, whole: Money) -> f64 {
    if whole.is_zero() {
        0.0
    } else {
        (part.cents() as f64 / whole.cents() as f64) * 100.0
    }
}
