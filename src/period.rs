use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::{ImportError, ImportResult};

const PT_BR_MONTHS: [&str; 12] = [
    "janeiro", "fevereiro", "março", "abril", "maio", "junho",
    "julho", "agosto", "setembro", "outubro", "novembro", "dezembro",
];

const EN_MONTHS: [&str; 12] = [
    "january", "february", "march", "april", "may", "june",
    "july", "august", "september", "october", "november", "december",
];

/// Idioma dos nomes de mês no rótulo de referência.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MonthLocale {
    #[default]
    #[serde(rename = "pt-BR", alias = "pt", alias = "pt_BR")]
    PtBr,
    #[serde(rename = "en", alias = "en-US")]
    En,
}

impl MonthLocale {
    /// Nome do mês por extenso, em minúsculas, `month` em 1..=12.
    pub fn month_name(&self, month: u32) -> &'static str {
        let idx = (month.clamp(1, 12) - 1) as usize;
        match self {
            MonthLocale::PtBr => PT_BR_MONTHS[idx],
            MonthLocale::En => EN_MONTHS[idx],
        }
    }
}

/// Mês e ano em que um gasto é pago.
///
/// A ordem dos campos importa: o `Ord` derivado ordena por ano e depois mês.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "PaymentMonthRepr")]
pub struct PaymentMonth {
    year: i32,
    month: u32,
}

impl PaymentMonth {
    pub fn new(month: u32, year: i32) -> ImportResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(ImportError::InvalidMonth(format!("{}/{}", month, year)));
        }
        Ok(Self { year, month })
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Avança `months` meses, virando o ano quando preciso.
    pub fn plus_months(self, months: u32) -> Self {
        let index = self.year as i64 * 12 + (self.month as i64 - 1) + months as i64;
        Self {
            year: index.div_euclid(12) as i32,
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    /// Rótulo de referência como `fevereiro/2024`.
    pub fn label(&self, locale: MonthLocale) -> String {
        format!("{}/{}", locale.month_name(self.month), self.year)
    }
}

impl From<NaiveDate> for PaymentMonth {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for PaymentMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{}", self.month, self.year)
    }
}

impl FromStr for PaymentMonth {
    type Err = ImportError;

    /// Aceita `7/2024`, `07/2024`, `julho/2024`, `jul/2024` ou `july/2024`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ImportError::InvalidMonth(s.to_string());

        let (month, year) = s
            .trim()
            .split_once(&['/', '-'][..])
            .ok_or_else(invalid)?;

        let month = parse_month(month).ok_or_else(invalid)?;
        let year = year.trim().parse::<i32>().map_err(|_| invalid())?;

        PaymentMonth::new(month, year)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PaymentMonthRepr {
    Text(String),
    Parts { month: u32, year: i32 },
}

impl TryFrom<PaymentMonthRepr> for PaymentMonth {
    type Error = ImportError;

    fn try_from(repr: PaymentMonthRepr) -> Result<Self, Self::Error> {
        match repr {
            PaymentMonthRepr::Text(text) => text.parse(),
            PaymentMonthRepr::Parts { month, year } => PaymentMonth::new(month, year),
        }
    }
}

/// Número do mês a partir de `7`, `07` ou do nome em português/inglês, completo ou abreviado.
pub fn parse_month(raw: &str) -> Option<u32> {
    let s = fold_accents(raw.trim());

    if let Ok(n) = s.parse::<u32>() {
        return (1..=12).contains(&n).then_some(n);
    }

    let month = match s.as_str() {
        "jan" | "janeiro" | "january" => 1,
        "fev" | "fevereiro" | "feb" | "february" => 2,
        "mar" | "marco" | "march" => 3,
        "abr" | "abril" | "apr" | "april" => 4,
        "mai" | "maio" | "may" => 5,
        "jun" | "junho" | "june" => 6,
        "jul" | "julho" | "july" => 7,
        "ago" | "agosto" | "aug" | "august" => 8,
        "set" | "setembro" | "sep" | "sept" | "september" => 9,
        "out" | "outubro" | "oct" | "october" => 10,
        "nov" | "novembro" | "november" => 11,
        "dez" | "dezembro" | "dec" | "december" => 12,
        _ => return None,
    };
    Some(month)
}

fn fold_accents(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'ã' | 'â' => 'a',
            'é' | 'ê' => 'e',
            'í' => 'i',
            'ó' | 'ô' | 'õ' => 'o',
            'ú' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn pm(month: u32, year: i32) -> PaymentMonth {
        PaymentMonth::new(month, year).unwrap()
    }

    #[rstest]
    #[case(pm(1, 2024), 1, pm(2, 2024))]
    #[case(pm(12, 2024), 1, pm(1, 2025))]
    #[case(pm(11, 2024), 3, pm(2, 2025))]
    #[case(pm(6, 2024), 0, pm(6, 2024))]
    #[case(pm(1, 2024), 24, pm(1, 2026))]
    fn test_plus_months_rolls_over(
        #[case] start: PaymentMonth,
        #[case] months: u32,
        #[case] expected: PaymentMonth,
    ) {
        assert_eq!(start.plus_months(months), expected);
    }

    #[rstest]
    #[case(0)]
    #[case(13)]
    fn test_new_rejects_out_of_range(#[case] month: u32) {
        assert!(matches!(
            PaymentMonth::new(month, 2024),
            Err(ImportError::InvalidMonth(_))
        ));
    }

    #[test]
    fn test_label_per_locale() {
        assert_eq!(pm(2, 2024).label(MonthLocale::PtBr), "fevereiro/2024");
        assert_eq!(pm(3, 2024).label(MonthLocale::PtBr), "março/2024");
        assert_eq!(pm(2, 2024).label(MonthLocale::En), "february/2024");
    }

    #[rstest]
    #[case("7/2024", 7, 2024)]
    #[case("07/2024", 7, 2024)]
    #[case("julho/2024", 7, 2024)]
    #[case("Jul/2024", 7, 2024)]
    #[case("march/2025", 3, 2025)]
    #[case("Março/2025", 3, 2025)]
    #[case("dez-2023", 12, 2023)]
    fn test_from_str(#[case] input: &str, #[case] month: u32, #[case] year: i32) {
        let parsed: PaymentMonth = input.parse().unwrap();
        assert_eq!(parsed, pm(month, year));
    }

    #[rstest]
    #[case("2024")]
    #[case("13/2024")]
    #[case("foo/2024")]
    #[case("7/abcd")]
    fn test_from_str_invalid(#[case] input: &str) {
        assert!(input.parse::<PaymentMonth>().is_err());
    }

    #[test]
    fn test_ordering_is_chronological() {
        let mut months = vec![pm(3, 2025), pm(12, 2024), pm(1, 2025)];
        months.sort();
        assert_eq!(months, vec![pm(12, 2024), pm(1, 2025), pm(3, 2025)]);
    }

    #[test]
    fn test_deserialize_text_or_parts() {
        let a: PaymentMonth = serde_json::from_str(r#""agosto/2024""#).unwrap();
        let b: PaymentMonth = serde_json::from_str(r#"{"month": 8, "year": 2024}"#).unwrap();
        assert_eq!(a, b);

        let bad: Result<PaymentMonth, _> = serde_json::from_str(r#"{"month": 0, "year": 2024}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_from_date() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(PaymentMonth::from(date), pm(1, 2024));
    }
}
