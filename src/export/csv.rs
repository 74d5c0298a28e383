//! CSV Export functionality
//!
//! Writes a ledger in the same row layout the workbook store uses, so an
//! exported file can be edited and fed back through a bulk replace.

use std::io::Write;

use crate::error::{LedgerError, LedgerResult};
use crate::models::Ledger;
use crate::storage::rows;
use crate::storage::SheetDialect;

/// Export a ledger's records to CSV, header first
pub fn export_ledger_csv<W: Write>(
    ledger: &Ledger,
    dialect: SheetDialect,
    writer: &mut W,
) -> LedgerResult<()> {
    let bytes = rows::encode(ledger.records(), dialect)?;
    writer
        .write_all(&bytes)
        .map_err(|e| LedgerError::Export(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountId, Category, Money, Revision, TransactionRecord};
    use chrono::NaiveDate;

    fn ledger() -> Ledger {
        Ledger::present(
            AccountId::new("newbin"),
            vec![TransactionRecord::new(
                NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
                Category::SavingsDeposit,
                "plan A",
                Money::from_units(20000),
                "monthly, auto",
            )],
            Revision::new(2),
        )
    }

    #[test]
    fn test_export_english() {
        let mut out = Vec::new();
        export_ledger_csv(&ledger(), SheetDialect::English, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("date,category,item,amount,memo"));
        assert_eq!(
            lines.next(),
            Some("2025-01-15,savings-deposit,plan A,20000,\"monthly, auto\"")
        );
    }

    #[test]
    fn test_export_korean_reads_back() {
        let mut out = Vec::new();
        export_ledger_csv(&ledger(), SheetDialect::Korean, &mut out).unwrap();

        let text = String::from_utf8(out.clone()).unwrap();
        assert!(text.starts_with("날짜,구분,항목,금액,메모"));
        assert!(text.contains("저축-적금"));

        assert_eq!(rows::decode(&out).unwrap(), ledger().records());
    }
}
