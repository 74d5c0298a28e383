//! Ledger display formatting
//!
//! Record tables, the daily net series and the item breakdown for terminal
//! output.

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::models::TransactionRecord;
use crate::reports::{DailyNet, Dashboard, ItemReport};

use super::report::{format_bar, format_percentage, separator, truncate};

const BAR_WIDTH: usize = 20;

#[derive(Tabled)]
struct RecordRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Item")]
    item: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Memo")]
    memo: String,
}

impl RecordRow {
    fn new(record: &TransactionRecord, symbol: &str) -> Self {
        Self {
            date: record
                .date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "(no date)".to_string()),
            category: record.category.to_string(),
            item: truncate(&record.item, 30),
            amount: record.amount.format_with_symbol(symbol),
            memo: truncate(&record.memo, 30),
        }
    }
}

/// Format records as a table, in the order given
pub fn format_record_table(records: &[TransactionRecord], symbol: &str) -> String {
    if records.is_empty() {
        return "No records found.\n".to_string();
    }

    let rows = records.iter().map(|r| RecordRow::new(r, symbol));
    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Modify::new(Columns::new(3..4)).with(Alignment::right()));

    format!("{}\n", table)
}

/// Format the daily net series with a bar per day
pub fn format_daily_series(days: &[DailyNet], symbol: &str) -> String {
    if days.is_empty() {
        return "No dated income or expense records.\n".to_string();
    }

    let max = days
        .iter()
        .map(|d| d.net.abs().cents())
        .max()
        .unwrap_or(0) as f64;

    let mut output = String::new();
    output.push_str(&format!(
        "{:<10}  {:>14}  {:>14}  {:>14}  {}\n",
        "Date", "Income", "Expense", "Net", ""
    ));
    output.push_str(&separator(78));
    output.push('\n');

    for day in days {
        let sign = if day.net.is_negative() { '-' } else { '+' };
        output.push_str(&format!(
            "{:<10}  {:>14}  {:>14}  {:>14}  {}{}\n",
            day.date.format("%Y-%m-%d"),
            day.income.format_with_symbol(symbol),
            day.expense.format_with_symbol(symbol),
            day.net.format_with_symbol(symbol),
            sign,
            format_bar(day.net.abs().cents() as f64, max, BAR_WIDTH),
        ));
    }

    output
}

/// Format the largest `limit` expense items with their share of spending
pub fn format_item_breakdown(report: &ItemReport, symbol: &str, limit: usize) -> String {
    if report.items.is_empty() {
        return "No expense records.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<24}  {:>14}  {:>5}  {:>6}  {}\n",
        "Item", "Total", "Count", "%", ""
    ));
    output.push_str(&separator(78));
    output.push('\n');

    for item in report.top(limit) {
        output.push_str(&format!(
            "{:<24}  {:>14}  {:>5}  {:>6}  {}\n",
            truncate(&item.item, 24),
            item.total.format_with_symbol(symbol),
            item.count,
            format_percentage(item.percentage),
            format_bar(item.percentage, 100.0, BAR_WIDTH),
        ));
    }

    let hidden = report.items.len().saturating_sub(limit);
    if hidden > 0 {
        output.push_str(&format!("... and {} more\n", hidden));
    }

    output.push_str(&separator(78));
    output.push('\n');
    output.push_str(&format!(
        "{:<24}  {:>14}\n",
        "Total expense",
        report.total_expense.format_with_symbol(symbol)
    ));

    output
}

/// Format the full dashboard: totals, daily series, top items, recent rows
pub fn format_dashboard(dashboard: &Dashboard, symbol: &str, recent_limit: usize) -> String {
    let mut output = String::new();

    output.push_str(&format!("Ledger: {}\n\n", dashboard.account));
    output.push_str(&dashboard.summary.format_terminal(symbol));

    output.push_str("\nDaily net\n");
    output.push_str(&format_daily_series(&dashboard.daily, symbol));

    output.push_str("\nTop expense items\n");
    output.push_str(&format_item_breakdown(&dashboard.items, symbol, 5));

    output.push_str("\nRecent history\n");
    let shown = recent_limit.min(dashboard.recent.len());
    output.push_str(&format_record_table(&dashboard.recent[..shown], symbol));

    output
}
