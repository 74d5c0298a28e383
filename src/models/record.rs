//! Transaction record model
//!
//! One row of a ledger: date, category, item, amount and memo. Rows coming
//! back from a sheet are coerced rather than rejected, so the model keeps
//! room for values a write would refuse (missing dates, unrecognized
//! categories). `validate` is the gate every write goes through.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;

/// Kind of ledger entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Income,
    Expense,
    SavingsDeposit,
    SavingsInvestment,
    /// Anything a sheet contained that is not one of the four kinds above
    Unrecognized(String),
}

impl Category {
    /// The four categories a write may use
    pub const KNOWN: [Category; 4] = [
        Category::Income,
        Category::Expense,
        Category::SavingsDeposit,
        Category::SavingsInvestment,
    ];

    /// Parse a category label, accepting English and Korean sheet labels
    ///
    /// Never fails: unknown text is kept verbatim as `Unrecognized`.
    pub fn parse(label: &str) -> Self {
        let trimmed = label.trim();
        match trimmed.to_lowercase().replace(['_', ' '], "-").as_str() {
            "income" | "수익" => Self::Income,
            "expense" | "지출" => Self::Expense,
            "savings-deposit" | "saving-deposit" | "저축-적금" => Self::SavingsDeposit,
            "savings-investment" | "saving-investment" | "저축-투자" => Self::SavingsInvestment,
            _ => Self::Unrecognized(trimmed.to_string()),
        }
    }

    /// Canonical English label
    pub fn label(&self) -> &str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::SavingsDeposit => "savings-deposit",
            Self::SavingsInvestment => "savings-investment",
            Self::Unrecognized(raw) => raw,
        }
    }

    /// Korean label as used by the original household sheets
    pub fn korean_label(&self) -> &str {
        match self {
            Self::Income => "수익",
            Self::Expense => "지출",
            Self::SavingsDeposit => "저축-적금",
            Self::SavingsInvestment => "저축-투자",
            Self::Unrecognized(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }

    pub fn is_savings(&self) -> bool {
        matches!(self, Self::SavingsDeposit | Self::SavingsInvestment)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unrecognized(raw) if raw.is_empty() => write!(f, "(blank)"),
            other => write!(f, "{}", other.label()),
        }
    }
}

/// A single ledger row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Calendar date; `None` when the stored cell could not be parsed
    pub date: Option<NaiveDate>,

    pub category: Category,

    /// Free-text label ("lunch", "salary", ...)
    #[serde(default)]
    pub item: String,

    pub amount: Money,

    #[serde(default)]
    pub memo: String,
}

impl TransactionRecord {
    /// Create a new record
    pub fn new(
        date: NaiveDate,
        category: Category,
        item: impl Into<String>,
        amount: Money,
        memo: impl Into<String>,
    ) -> Self {
        Self {
            date: Some(date),
            category,
            item: item.into(),
            amount,
            memo: memo.into(),
        }
    }

    /// Trim surrounding whitespace from the text fields
    pub fn normalized(mut self) -> Self {
        self.item = self.item.trim().to_string();
        self.memo = self.memo.trim().to_string();
        self
    }

    /// Validate the record for writing
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        if self.date.is_none() {
            return Err(RecordValidationError::MissingDate);
        }

        if let Category::Unrecognized(raw) = &self.category {
            return Err(RecordValidationError::UnknownCategory(raw.clone()));
        }

        if self.item.trim().is_empty() {
            return Err(RecordValidationError::EmptyItem);
        }

        if !self.amount.is_positive() {
            return Err(RecordValidationError::NonPositiveAmount(self.amount));
        }

        Ok(())
    }
}

/// Why a record cannot be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    MissingDate,
    UnknownCategory(String),
    EmptyItem,
    NonPositiveAmount(Money),
}

impl fmt::Display for RecordValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingDate => write!(f, "date is missing or unparsable"),
            Self::UnknownCategory(raw) if raw.is_empty() => write!(f, "category is blank"),
            Self::UnknownCategory(raw) => write!(
                f,
                "category '{}' is not one of income, expense, savings-deposit, savings-investment",
                raw
            ),
            Self::EmptyItem => write!(f, "item must not be empty"),
            Self::NonPositiveAmount(amount) => {
                write!(f, "amount must be greater than zero (got {})", amount)
            }
        }
    }
}

impl std::error::Error for RecordValidationError {}

/// Parse a sheet date cell
///
/// Accepts `YYYY-MM-DD`, `YYYY/MM/DD`, `YYYY.MM.DD` and the timestamp forms
/// spreadsheet tools tend to write back. Returns `None` for anything else.
pub fn parse_date(cell: &str) -> Option<NaiveDate> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }

    for format in ["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(cell, format) {
            return Some(date);
        }
    }

    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(stamp) = NaiveDateTime::parse_from_str(cell, format) {
            return Some(stamp.date());
        }
    }

    DateTime::parse_from_rfc3339(cell)
        .ok()
        .map(|stamp| stamp.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_category_parse_english_and_korean() {
        assert_eq!(Category::parse("income"), Category::Income);
        assert_eq!(Category::parse("수익"), Category::Income);
        assert_eq!(Category::parse(" Expense "), Category::Expense);
        assert_eq!(Category::parse("지출"), Category::Expense);
        assert_eq!(Category::parse("savings_deposit"), Category::SavingsDeposit);
        assert_eq!(Category::parse("저축-적금"), Category::SavingsDeposit);
        assert_eq!(Category::parse("Savings Investment"), Category::SavingsInvestment);
        assert_eq!(Category::parse("저축-투자"), Category::SavingsInvestment);
    }

    #[test]
    fn test_category_parse_keeps_unknown_text() {
        assert_eq!(
            Category::parse("gift"),
            Category::Unrecognized("gift".to_string())
        );
        assert_eq!(Category::parse("  "), Category::Unrecognized(String::new()));
        assert!(!Category::parse("gift").is_known());
        assert_eq!(Category::parse("").to_string(), "(blank)");
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(Category::SavingsDeposit.label(), "savings-deposit");
        assert_eq!(Category::SavingsDeposit.korean_label(), "저축-적금");
        assert!(Category::SavingsInvestment.is_savings());
        assert!(!Category::Income.is_savings());
    }

    #[test]
    fn test_validate_accepts_complete_record() {
        let record = TransactionRecord::new(
            date(2025, 3, 1),
            Category::Expense,
            "lunch",
            Money::from_units(1000),
            "",
        );
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_validate_rejections() {
        let base = TransactionRecord::new(
            date(2025, 3, 1),
            Category::Expense,
            "lunch",
            Money::from_units(1000),
            "",
        );

        let mut zero = base.clone();
        zero.amount = Money::zero();
        assert_eq!(
            zero.validate(),
            Err(RecordValidationError::NonPositiveAmount(Money::zero()))
        );

        let mut blank_item = base.clone();
        blank_item.item = "   ".into();
        assert_eq!(blank_item.validate(), Err(RecordValidationError::EmptyItem));

        let mut no_date = base.clone();
        no_date.date = None;
        assert_eq!(no_date.validate(), Err(RecordValidationError::MissingDate));

        let mut unknown = base;
        unknown.category = Category::Unrecognized("gift".into());
        assert!(matches!(
            unknown.validate(),
            Err(RecordValidationError::UnknownCategory(_))
        ));
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("2025-01-15"), Some(date(2025, 1, 15)));
        assert_eq!(parse_date("2025/01/15"), Some(date(2025, 1, 15)));
        assert_eq!(parse_date("2025.01.15"), Some(date(2025, 1, 15)));
        assert_eq!(parse_date("2025-01-15 00:00:00"), Some(date(2025, 1, 15)));
        assert_eq!(
            parse_date("2025-01-15T09:30:00+09:00"),
            Some(date(2025, 1, 15))
        );
    }

    #[test]
    fn test_parse_date_coerces_garbage_to_none() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date("2025-13-40"), None);
    }

    #[test]
    fn test_normalized_trims_text() {
        let record = TransactionRecord::new(
            date(2025, 3, 1),
            Category::Income,
            "  salary ",
            Money::from_units(100),
            " march ",
        )
        .normalized();
        assert_eq!(record.item, "salary");
        assert_eq!(record.memo, "march");
    }
}
