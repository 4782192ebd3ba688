use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::{CsvAmount, CsvDate};
use crate::types::{SkipReason, SkippedLine};

/// Linha como lida do CSV, com cabeçalhos já mapeados para
/// `title`/`amount`/`date`. Colunas ausentes no arquivo viram `None`.
#[derive(Debug, Deserialize)]
pub struct StatementRowRaw {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

/// Linha da fatura com título e valor utilizáveis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementLine {
    pub line: u64,
    pub title: String,
    pub amount: Decimal,
    /// `None` quando o arquivo não traz data ou ela não pôde ser lida.
    pub date: Option<NaiveDate>,
}

pub type RowResult = Result<StatementLine, SkippedLine>;

impl StatementLine {
    pub fn from_raw(line: u64, raw: StatementRowRaw) -> RowResult {
        let title = raw
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        let Some(title) = title else {
            return Err(SkippedLine::new(line, None, SkipReason::EmptyTitle));
        };

        let amount = match raw.amount.map(CsvAmount::from).map(|a| a.parse()) {
            Some(Ok(amount)) => amount,
            _ => return Err(SkippedLine::new(line, Some(title), SkipReason::InvalidAmount)),
        };

        let date = raw.date.and_then(|d| CsvDate::from(d).parse().ok());

        Ok(StatementLine {
            line,
            title,
            amount,
            date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn raw(title: Option<&str>, amount: Option<&str>, date: Option<&str>) -> StatementRowRaw {
        StatementRowRaw {
            title: title.map(str::to_string),
            amount: amount.map(str::to_string),
            date: date.map(str::to_string),
        }
    }

    #[test]
    fn test_valid_row() {
        let line = StatementLine::from_raw(2, raw(Some(" Amazon "), Some("100,00"), Some("2024-01-15")))
            .unwrap();

        assert_eq!(line.line, 2);
        assert_eq!(line.title, "Amazon");
        assert_eq!(line.amount, Decimal::from_str("100.00").unwrap());
        assert_eq!(line.date, NaiveDate::from_ymd_opt(2024, 1, 15));
    }

    #[test]
    fn test_bad_date_becomes_none() {
        let line = StatementLine::from_raw(3, raw(Some("Uber"), Some("12.30"), Some("ontem"))).unwrap();
        assert_eq!(line.date, None);

        let line = StatementLine::from_raw(3, raw(Some("Uber"), Some("12.30"), None)).unwrap();
        assert_eq!(line.date, None);
    }

    #[test]
    fn test_missing_title() {
        let skipped = StatementLine::from_raw(4, raw(Some("   "), Some("1.00"), None)).unwrap_err();
        assert_eq!(skipped.reason, SkipReason::EmptyTitle);
        assert_eq!(skipped.line, 4);
    }

    #[test]
    fn test_non_numeric_amount() {
        let skipped = StatementLine::from_raw(5, raw(Some("Padaria"), Some("abc"), None)).unwrap_err();
        assert_eq!(skipped.reason, SkipReason::InvalidAmount);
        assert_eq!(skipped.title.as_deref(), Some("Padaria"));

        let skipped = StatementLine::from_raw(6, raw(Some("Padaria"), None, None)).unwrap_err();
        assert_eq!(skipped.reason, SkipReason::InvalidAmount);
    }
}
