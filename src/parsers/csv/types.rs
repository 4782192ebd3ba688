use std::str::FromStr;

use crate::errors::ImportError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Representa uma data extraída de um arquivo CSV de fatura.
///
/// Normalmente as datas vêm em formatos como:
/// - YYYY-MM-DD
/// - DD/MM/YYYY
/// - MM/DD/YYYY (menos comum no Brasil, mas possível)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsvDate(String);

impl CsvDate {
    /// Tenta converter a string de data para `NaiveDate` aceitando os formatos mais comuns
    pub fn parse(&self) -> Result<NaiveDate, ImportError> {
        let s = self.0.trim();

        // Tentativas em ordem de probabilidade comum no Brasil e internacional
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(date);
        }
        if let Ok(date) = NaiveDate::parse_from_str(s, "%d/%m/%Y") {
            return Ok(date);
        }
        if let Ok(date) = NaiveDate::parse_from_str(s, "%m/%d/%Y") {
            return Ok(date);
        }

        Err(ImportError::CsvDateInvalidFormat)
    }
}

impl From<String> for CsvDate {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for CsvDate {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl TryFrom<CsvDate> for NaiveDate {
    type Error = ImportError;

    fn try_from(date: CsvDate) -> Result<Self, Self::Error> {
        date.parse()
    }
}

/// Valor monetário como aparece no CSV.
///
/// Aceita ponto ou vírgula como separador decimal. Quando os dois aparecem,
/// o último é o decimal e o outro é separador de milhar (`1.234,56`, `1,234.56`).
/// Com um só tipo de separador, ele é de milhar quando agrupa exatamente três
/// dígitos (`1,234`, `1.234.567`). Fora disso a vírgula é decimal (`100,50`)
/// e um ponto isolado é sempre decimal (`1.234`).
/// Símbolo de moeda no início (`R$`, `$`) é descartado.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsvAmount(String);

impl CsvAmount {
    pub fn parse(&self) -> Result<Decimal, ImportError> {
        let invalid = || ImportError::CsvAmountInvalid(self.0.clone());

        let compact: String = self.0.chars().filter(|c| !c.is_whitespace()).collect();
        let (negative, unsigned) = match compact.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, compact.as_str()),
        };
        let digits = unsigned
            .strip_prefix("R$")
            .or_else(|| unsigned.strip_prefix('$'))
            .unwrap_or(unsigned);

        if digits.is_empty() {
            return Err(invalid());
        }

        let normalized = match (digits.rfind('.'), digits.rfind(',')) {
            (Some(dot), Some(comma)) if comma > dot => digits.replace('.', "").replace(',', "."),
            (Some(_), Some(_)) => digits.replace(',', ""),
            (None, Some(_)) if is_thousands_grouping(digits, ',') => digits.replace(',', ""),
            (None, Some(_)) => digits.replace(',', "."),
            (Some(_), None) if digits.matches('.').count() > 1 && is_thousands_grouping(digits, '.') => {
                digits.replace('.', "")
            }
            _ => digits.to_string(),
        };

        let value = Decimal::from_str(&normalized).map_err(|_| invalid())?;
        Ok(if negative { -value } else { value })
    }
}

/// `1,234` ou `1,234,567`: primeiro grupo com 1 a 3 dígitos sem zero à
/// esquerda, os demais com exatamente três.
fn is_thousands_grouping(digits: &str, separator: char) -> bool {
    let mut groups = digits.split(separator);
    let head = groups.next().unwrap_or("");
    let is_digits = |g: &str| g.chars().all(|c| c.is_ascii_digit());

    (1..=3).contains(&head.len())
        && is_digits(head)
        && !head.starts_with('0')
        && groups.all(|g| g.len() == 3 && is_digits(g))
}

impl From<String> for CsvAmount {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for CsvAmount {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl TryFrom<CsvAmount> for Decimal {
    type Error = ImportError;

    fn try_from(amount: CsvAmount) -> Result<Self, Self::Error> {
        amount.parse()
    }
}

// -----------------------------------------------------------------------------
// Testes
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate};
    use rstest::rstest;

    #[rstest]
    #[case("2025-12-26", 2025, 12, 26)]
    #[case("26/12/2025", 2025, 12, 26)]
    #[case("12/26/2025", 2025, 12, 26)]
    #[case("2025-01-01", 2025, 1, 1)]
    #[case("  2024-01-15 ", 2024, 1, 15)]
    fn test_csv_date_valid_formats(
        #[case] input: &str,
        #[case] year: i32,
        #[case] month: u32,
        #[case] day: u32,
    ) {
        let date: NaiveDate = CsvDate::from(input).try_into().unwrap();
        assert_eq!(date.year(), year);
        assert_eq!(date.month(), month);
        assert_eq!(date.day(), day);
    }

    #[rstest]
    #[case("2025-13-01")]     // mês inválido
    #[case("2025-02-30")]     // fevereiro inválido
    #[case("26-12-2025")]     // formato diferente
    #[case("")]
    #[case("   ")]
    fn test_csv_date_invalid_formats(#[case] input: &str) {
        let result: Result<NaiveDate, _> = CsvDate::from(input).try_into();
        assert!(matches!(result, Err(ImportError::CsvDateInvalidFormat)));
    }

    #[rstest]
    #[case("100.00", "100.00")]
    #[case("100,50", "100.50")]
    #[case("-50.00", "-50.00")]
    #[case("1.234,56", "1234.56")]
    #[case("1,234.56", "1234.56")]
    #[case("R$ 99,90", "99.90")]
    #[case("-R$ 10,00", "-10.00")]
    #[case("$12.5", "12.5")]
    #[case(" 7 ", "7")]
    #[case("1,234", "1234")]              // milhar no formato americano
    #[case("1,234,567", "1234567")]
    #[case("1.234.567", "1234567")]
    #[case("1.234", "1.234")]              // ponto único continua decimal
    #[case("0,500", "0.500")]
    #[case("12,3456", "12.3456")]
    fn test_csv_amount_valid(#[case] input: &str, #[case] expected: &str) {
        let amount: Decimal = CsvAmount::from(input).try_into().unwrap();
        assert_eq!(amount, Decimal::from_str(expected).unwrap());
    }

    #[rstest]
    #[case("")]
    #[case("abc")]
    #[case("R$")]
    #[case("12abc")]
    #[case("-")]
    fn test_csv_amount_invalid(#[case] input: &str) {
        let result: Result<Decimal, _> = CsvAmount::from(input).try_into();
        assert!(matches!(result, Err(ImportError::CsvAmountInvalid(_))));
    }
}
