use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::common::{RecordId, UserId};

/// Direction of a money movement.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
    Savings,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
            TransactionKind::Savings => "savings",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            "savings" => Ok(TransactionKind::Savings),
            other => Err(format!("unknown transaction kind `{other}`")),
        }
    }
}

/// A validated, immutable transaction as seen by the engine.
///
/// `date` is `None` when the stored date could not be parsed; such
/// transactions never land in a month or year bucket.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: RecordId,
    pub user_id: UserId,
    pub description: String,
    pub amount: f64,
    pub kind: TransactionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
}

impl Transaction {
    pub fn new(
        id: RecordId,
        kind: TransactionKind,
        amount: f64,
        category: Option<&str>,
        date: NaiveDate,
    ) -> Self {
        Self {
            id,
            user_id: 0,
            description: String::new(),
            amount,
            kind,
            category: category.map(str::to_string),
            date: Some(date),
        }
    }

    pub fn category_name(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn falls_in(&self, year: i32, month: u32) -> bool {
        use chrono::Datelike;
        self.date
            .map_or(false, |date| date.year() == year && date.month() == month)
    }
}

/// User submission for a new transaction, before the store assigns an id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewTransaction {
    pub description: String,
    pub amount: f64,
    pub kind: TransactionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

impl NewTransaction {
    pub fn new(description: impl Into<String>, amount: f64, kind: TransactionKind) -> Self {
        Self {
            description: description.into(),
            amount,
            kind,
            category: None,
            date: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }
}

/// Parses a stored date string into a timezone-naive calendar date.
///
/// Accepts `YYYY-MM-DD`, naive ISO datetimes (`2024-03-05T10:00:00`, with or
/// without fractional seconds or a space separator) and RFC 3339 timestamps.
/// For offset timestamps the calendar date as written is kept; no conversion to
/// the local timezone happens.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(stamp.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|stamp| stamp.date())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_plain_dates_and_naive_datetimes() {
        assert_eq!(parse_calendar_date("2024-03-05"), Some(date(2024, 3, 5)));
        assert_eq!(
            parse_calendar_date("2024-03-05T23:59:59.123456"),
            Some(date(2024, 3, 5))
        );
        assert_eq!(
            parse_calendar_date("2024-03-05 08:00:00"),
            Some(date(2024, 3, 5))
        );
    }

    #[test]
    fn offset_timestamps_keep_written_calendar_day() {
        assert_eq!(
            parse_calendar_date("2024-01-31T23:30:00-05:00"),
            Some(date(2024, 1, 31))
        );
        assert_eq!(
            parse_calendar_date("2024-02-01T00:15:00+09:00"),
            Some(date(2024, 2, 1))
        );
    }

    #[test]
    fn garbage_dates_are_rejected() {
        assert_eq!(parse_calendar_date(""), None);
        assert_eq!(parse_calendar_date("yesterday"), None);
        assert_eq!(parse_calendar_date("2024-13-01"), None);
    }

    #[test]
    fn kind_parsing_is_case_insensitive() {
        assert_eq!("Income".parse::<TransactionKind>(), Ok(TransactionKind::Income));
        assert_eq!(" savings ".parse::<TransactionKind>(), Ok(TransactionKind::Savings));
        assert!("refund".parse::<TransactionKind>().is_err());
    }

    #[test]
    fn falls_in_requires_a_date() {
        let mut txn = Transaction::new(1, TransactionKind::Expense, 10.0, None, date(2024, 5, 1));
        assert!(txn.falls_in(2024, 5));
        assert!(!txn.falls_in(2024, 6));
        txn.date = None;
        assert!(!txn.falls_in(2024, 5));
    }
}
