//! Row codec for sheet-style partitions
//!
//! Converts between CSV rows and `TransactionRecord`s. Decoding is lenient:
//! columns are located by header name (English or Korean), missing columns
//! take their default, unparsable dates become `None`, unparsable or negative
//! amounts become zero and text cells that are not valid UTF-8 are decoded
//! lossily. Full encodes write the five canonical columns; single appended
//! rows follow the layout of the header already in the partition.

use std::borrow::Cow;

use csv::{ByteRecord, ReaderBuilder, StringRecord, WriterBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{parse_date, Category, Money, TransactionRecord};

pub const ENGLISH_HEADERS: [&str; 5] = ["date", "category", "item", "amount", "memo"];
pub const KOREAN_HEADERS: [&str; 5] = ["날짜", "구분", "항목", "금액", "메모"];

/// Vocabulary used for the header row and category cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SheetDialect {
    #[default]
    English,
    Korean,
}

impl SheetDialect {
    pub fn headers(&self) -> [&'static str; 5] {
        match self {
            SheetDialect::English => ENGLISH_HEADERS,
            SheetDialect::Korean => KOREAN_HEADERS,
        }
    }

    pub fn category_label<'a>(&self, category: &'a Category) -> &'a str {
        match self {
            SheetDialect::English => category.label(),
            SheetDialect::Korean => category.korean_label(),
        }
    }

    /// Guess the dialect of an existing header row
    pub fn detect(headers: &StringRecord) -> Option<Self> {
        let cells: Vec<String> = headers.iter().map(clean_header).collect();
        if cells.iter().any(|c| KOREAN_HEADERS.contains(&c.as_str())) {
            Some(SheetDialect::Korean)
        } else if cells.iter().any(|c| ENGLISH_HEADERS.contains(&c.as_str())) {
            Some(SheetDialect::English)
        } else {
            None
        }
    }
}

/// Position of each field in a decoded header
#[derive(Debug, Default)]
struct ColumnIndex {
    date: Option<usize>,
    category: Option<usize>,
    item: Option<usize>,
    amount: Option<usize>,
    memo: Option<usize>,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Self {
        let mut index = ColumnIndex::default();
        for (pos, cell) in headers.iter().enumerate() {
            let slot = match clean_header(cell).as_str() {
                "date" | "날짜" => &mut index.date,
                "category" | "구분" => &mut index.category,
                "item" | "항목" => &mut index.item,
                "amount" | "금액" => &mut index.amount,
                "memo" | "메모" => &mut index.memo,
                _ => continue,
            };
            // First matching column wins
            slot.get_or_insert(pos);
        }
        index
    }

    fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.category.is_none()
            && self.item.is_none()
            && self.amount.is_none()
            && self.memo.is_none()
    }
}

fn clean_header(cell: &str) -> String {
    cell.trim_start_matches('\u{feff}').trim().to_lowercase()
}

fn cell(row: &ByteRecord, column: Option<usize>) -> Cow<'_, str> {
    column
        .and_then(|c| row.get(c))
        .map(String::from_utf8_lossy)
        .unwrap_or(Cow::Borrowed(""))
}

fn lossy_record(row: &ByteRecord) -> StringRecord {
    row.iter()
        .map(|c| String::from_utf8_lossy(c).into_owned())
        .collect::<Vec<_>>()
        .into()
}

/// Header row of an encoded partition, if it has one
pub fn read_headers(bytes: &[u8]) -> LedgerResult<Option<StringRecord>> {
    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(None);
    }
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(bytes);
    Ok(Some(lossy_record(reader.byte_headers()?)))
}

/// Column layout of an existing partition
///
/// Used to append a row in the positions the partition's own header
/// declares, which need not be the canonical order.
#[derive(Debug)]
pub struct SheetLayout {
    index: ColumnIndex,
    width: usize,
    dialect: SheetDialect,
}

impl SheetLayout {
    /// Read the layout from a header row; `fallback` names the vocabulary
    /// when the header carries no recognizable column
    pub fn from_headers(headers: &StringRecord, fallback: SheetDialect) -> Self {
        Self {
            index: ColumnIndex::from_headers(headers),
            width: headers.len(),
            dialect: SheetDialect::detect(headers).unwrap_or(fallback),
        }
    }

    pub fn dialect(&self) -> SheetDialect {
        self.dialect
    }

    /// Whether every ledger column has a position in the header
    pub fn is_complete(&self) -> bool {
        self.index.date.is_some()
            && self.index.category.is_some()
            && self.index.item.is_some()
            && self.index.amount.is_some()
            && self.index.memo.is_some()
    }

    /// Encode one row in this layout
    ///
    /// Fields without a column are dropped and columns that are not ledger
    /// fields are left blank, so callers should check `is_complete` first.
    pub fn encode_row(&self, record: &TransactionRecord) -> LedgerResult<Vec<u8>> {
        let mut cells = vec![String::new(); self.width];
        let mut put = |column: Option<usize>, value: String| {
            if let Some(slot) = column.and_then(|c| cells.get_mut(c)) {
                *slot = value;
            }
        };

        put(self.index.date, format_date(record));
        put(
            self.index.category,
            self.dialect.category_label(&record.category).to_string(),
        );
        put(self.index.item, record.item.clone());
        put(self.index.amount, record.amount.to_cell());
        put(self.index.memo, record.memo.clone());

        let mut writer = WriterBuilder::new().from_writer(Vec::new());
        writer.write_record(&cells)?;
        writer
            .into_inner()
            .map_err(|e| LedgerError::Csv(format!("Failed to flush rows: {}", e)))
    }
}

fn format_date(record: &TransactionRecord) -> String {
    record
        .date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Decode a partition's bytes into records
///
/// An empty (or whitespace-only) partition decodes to zero records. Rows
/// whose cells are all blank are skipped.
pub fn decode(bytes: &[u8]) -> LedgerResult<Vec<TransactionRecord>> {
    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(Vec::new());
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers = lossy_record(reader.byte_headers()?);
    let index = ColumnIndex::from_headers(&headers);
    if index.is_empty() {
        return Err(LedgerError::Csv(format!(
            "header row has none of the ledger columns: {}",
            headers.iter().collect::<Vec<_>>().join(",")
        )));
    }

    let mut records = Vec::new();
    for row in reader.byte_records() {
        let row = row?;
        if row.iter().all(|c| c.iter().all(u8::is_ascii_whitespace)) {
            continue;
        }

        records.push(TransactionRecord {
            date: parse_date(&cell(&row, index.date)),
            category: Category::parse(&cell(&row, index.category)),
            item: cell(&row, index.item).into_owned(),
            amount: Money::parse_lenient(&cell(&row, index.amount)),
            memo: cell(&row, index.memo).into_owned(),
        });
    }

    Ok(records)
}

/// Encode records, optionally preceded by the header row
pub fn encode_rows(
    records: &[TransactionRecord],
    dialect: SheetDialect,
    with_header: bool,
) -> LedgerResult<Vec<u8>> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());

    if with_header {
        writer.write_record(dialect.headers())?;
    }

    for record in records {
        let date = format_date(record);
        writer.write_record([
            date.as_str(),
            dialect.category_label(&record.category),
            record.item.as_str(),
            record.amount.to_cell().as_str(),
            record.memo.as_str(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| LedgerError::Csv(format!("Failed to flush rows: {}", e)))
}

/// Encode a complete partition (header plus records)
pub fn encode(records: &[TransactionRecord], dialect: SheetDialect) -> LedgerResult<Vec<u8>> {
    encode_rows(records, dialect, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_decode_empty_partition() {
        assert!(decode(b"").unwrap().is_empty());
        assert!(decode(b"  \n").unwrap().is_empty());
        assert!(decode(b"date,category,item,amount,memo\n").unwrap().is_empty());
    }

    #[test]
    fn test_decode_korean_sheet_with_coercion() {
        let sheet = "날짜,구분,항목,금액,메모\n\
                     2025-01-03,지출,점심,\"5,000\",\n\
                     not a date,수익,월급,100000.0,1월\n\
                     2025-01-04,저축-적금,plan A,abc,\n";
        let records = decode(sheet.as_bytes()).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2025, 1, 3));
        assert_eq!(records[0].category, Category::Expense);
        assert_eq!(records[0].amount, Money::from_units(5000));
        assert_eq!(records[1].date, None);
        assert_eq!(records[1].amount, Money::from_units(100000));
        assert_eq!(records[1].memo, "1월");
        assert_eq!(records[2].category, Category::SavingsDeposit);
        assert_eq!(records[2].amount, Money::zero());
    }

    #[test]
    fn test_decode_reordered_and_missing_columns() {
        let sheet = "amount,item,date\n1000,lunch,2025-02-01\n";
        let records = decode(sheet.as_bytes()).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].item, "lunch");
        assert_eq!(records[0].amount, Money::from_units(1000));
        assert_eq!(records[0].category, Category::Unrecognized(String::new()));
        assert_eq!(records[0].memo, "");
    }

    #[test]
    fn test_decode_skips_blank_rows_and_short_rows() {
        let sheet = "\u{feff}date,category,item,amount,memo\n,,,,\n2025-02-01,expense,bus\n";
        let records = decode(sheet.as_bytes()).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].item, "bus");
        assert_eq!(records[0].amount, Money::zero());
    }

    #[test]
    fn test_decode_coerces_negative_amount() {
        let sheet = "date,category,item,amount,memo\n2025-02-01,expense,refund,-5000,\n";
        let records = decode(sheet.as_bytes()).unwrap();

        assert_eq!(records[0].amount, Money::zero());
        assert_eq!(records[0].item, "refund");
    }

    #[test]
    fn test_decode_invalid_utf8_cell_is_lossy() {
        let mut sheet = b"date,category,item,amount,memo\n2025-02-01,expense,".to_vec();
        sheet.extend([0xff, 0xfe]);
        sheet.extend(b",700,ok\n");

        let records = decode(&sheet).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].item, "\u{fffd}\u{fffd}");
        assert_eq!(records[0].amount, Money::from_units(700));
        assert_eq!(records[0].memo, "ok");
    }

    #[test]
    fn test_layout_encodes_in_header_order() {
        let headers =
            StringRecord::from(vec!["amount", "item", "date", "category", "memo", "note"]);
        let layout = SheetLayout::from_headers(&headers, SheetDialect::Korean);
        assert!(layout.is_complete());
        assert_eq!(layout.dialect(), SheetDialect::English);

        let record = TransactionRecord::new(
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            Category::Expense,
            "lunch",
            Money::from_units(1000),
            "",
        );
        let row = layout.encode_row(&record).unwrap();
        assert_eq!(String::from_utf8(row).unwrap(), "1000,lunch,2025-01-15,expense,,\n");

        let partial = SheetLayout::from_headers(
            &StringRecord::from(vec!["amount", "item"]),
            SheetDialect::English,
        );
        assert!(!partial.is_complete());
    }

    #[test]
    fn test_decode_rejects_unrelated_header() {
        let err = decode(b"foo,bar\n1,2\n").unwrap_err();
        assert!(matches!(err, LedgerError::Csv(_)));
    }

    #[test]
    fn test_encode_uses_dialect() {
        let record = TransactionRecord::new(
            NaiveDate::from_ymd_opt(2025, 1, 3).unwrap(),
            Category::SavingsInvestment,
            "ETF, monthly",
            Money::from_units(20000),
            "",
        );

        let english = String::from_utf8(encode(&[record.clone()], SheetDialect::English).unwrap()).unwrap();
        assert_eq!(
            english,
            "date,category,item,amount,memo\n2025-01-03,savings-investment,\"ETF, monthly\",20000,\n"
        );

        let korean = String::from_utf8(encode(&[record], SheetDialect::Korean).unwrap()).unwrap();
        assert!(korean.starts_with("날짜,구분,항목,금액,메모\n"));
        assert!(korean.contains("저축-투자"));
    }

    #[test]
    fn test_encode_undated_row_writes_empty_cell() {
        let mut record = TransactionRecord::new(
            NaiveDate::from_ymd_opt(2025, 1, 3).unwrap(),
            Category::Expense,
            "bus",
            Money::from_units(1200),
            "",
        );
        record.date = None;

        let body = encode_rows(&[record], SheetDialect::English, false).unwrap();
        assert_eq!(String::from_utf8(body).unwrap(), ",expense,bus,1200,\n");
    }

    #[test]
    fn test_detect_dialect() {
        let korean = StringRecord::from(vec!["날짜", "구분"]);
        let english = StringRecord::from(vec!["Date", "Amount"]);
        let other = StringRecord::from(vec!["x"]);

        assert_eq!(SheetDialect::detect(&korean), Some(SheetDialect::Korean));
        assert_eq!(SheetDialect::detect(&english), Some(SheetDialect::English));
        assert_eq!(SheetDialect::detect(&other), None);
    }
}
