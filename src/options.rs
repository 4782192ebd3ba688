use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::{ImportError, ImportResult};
use crate::period::{MonthLocale, PaymentMonth};

pub const DEFAULT_CATEGORY: &str = "Credit Card";

pub const DEFAULT_EXCLUSION_PHRASES: &[&str] = &[
    "payment received",
    "pagamento recebido",
    "encerramento de dívida",
    "encerramento de divida",
    "juros de dívida encerrada",
    "juros de divida encerrada",
];

/// Como a data da compra vira o mês de pagamento.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PaymentSchedule {
    /// A compra é paga com a renda do mês seguinte.
    #[default]
    NextMonth,
    /// Compras antes do dia de fechamento caem na fatura do mês,
    /// as demais na seguinte.
    ClosingDay(u32),
}

impl PaymentSchedule {
    pub fn payment_month(&self, date: NaiveDate) -> PaymentMonth {
        let month = PaymentMonth::from(date);
        match self {
            PaymentSchedule::NextMonth => month.plus_months(1),
            PaymentSchedule::ClosingDay(day) if date.day() < *day => month,
            PaymentSchedule::ClosingDay(_) => month.plus_months(1),
        }
    }
}

/// Configuração de uma importação ou pré-visualização.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImportOptions {
    /// Dia de fechamento do cartão (1-31). Seleciona [`PaymentSchedule::ClosingDay`].
    pub closing_day: Option<u32>,
    /// Força todos os candidatos para este mês de pagamento.
    pub anchor: Option<PaymentMonth>,
    /// Âncora em campos separados (`anchorMonth`/`anchorYear`); os dois são
    /// obrigatórios juntos. Ignorada quando `anchor` também vem preenchido.
    pub anchor_month: Option<u32>,
    pub anchor_year: Option<i32>,
    /// Mantém só a parcela atual de cada compra parcelada.
    pub statement_mode: bool,
    /// Gera todas as parcelas restantes; anula `anchor` e `statement_mode`.
    pub generate_future: bool,
    pub category: String,
    pub exclusion_phrases: Vec<String>,
    pub match_refunds: bool,
    pub locale: MonthLocale,
    /// Data usada nas linhas sem data válida. `None` usa a data local.
    pub today: Option<NaiveDate>,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            closing_day: None,
            anchor: None,
            anchor_month: None,
            anchor_year: None,
            statement_mode: false,
            generate_future: false,
            category: DEFAULT_CATEGORY.to_string(),
            exclusion_phrases: DEFAULT_EXCLUSION_PHRASES
                .iter()
                .map(|p| p.to_string())
                .collect(),
            match_refunds: true,
            locale: MonthLocale::default(),
            today: None,
        }
    }
}

impl ImportOptions {
    pub fn from_json(json: &str) -> ImportResult<Self> {
        let options: Self =
            serde_json::from_str(json).map_err(|e| ImportError::InvalidOptions(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> ImportResult<()> {
        if let Some(day) = self.closing_day {
            if !(1..=31).contains(&day) {
                return Err(ImportError::InvalidClosingDay(day));
            }
        }
        match (self.anchor_month, self.anchor_year) {
            (Some(month), Some(year)) => {
                PaymentMonth::new(month, year)?;
            }
            (None, None) => {}
            _ => {
                return Err(ImportError::InvalidOptions(
                    "anchorMonth and anchorYear must be given together".into(),
                ));
            }
        }
        if self.category.trim().is_empty() {
            return Err(ImportError::InvalidOptions("category must not be empty".into()));
        }
        Ok(())
    }

    pub fn schedule(&self) -> PaymentSchedule {
        self.closing_day
            .map(PaymentSchedule::ClosingDay)
            .unwrap_or_default()
    }

    /// Mês âncora em vigor, `None` quando `generate_future` está ligado.
    pub fn effective_anchor(&self) -> Option<PaymentMonth> {
        if self.generate_future {
            return None;
        }
        self.anchor.or_else(|| match (self.anchor_month, self.anchor_year) {
            (Some(month), Some(year)) => PaymentMonth::new(month, year).ok(),
            _ => None,
        })
    }

    pub fn collapses_installments(&self) -> bool {
        self.statement_mode && !self.generate_future
    }

    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn is_excluded(&self, title: &str) -> bool {
        let title = title.to_lowercase();
        self.exclusion_phrases
            .iter()
            .any(|phrase| title.contains(&phrase.to_lowercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn pm(month: u32, year: i32) -> PaymentMonth {
        PaymentMonth::new(month, year).unwrap()
    }

    #[rstest]
    #[case(PaymentSchedule::NextMonth, date(2024, 1, 15), pm(2, 2024))]
    #[case(PaymentSchedule::NextMonth, date(2024, 12, 31), pm(1, 2025))]
    #[case(PaymentSchedule::ClosingDay(3), date(2025, 7, 2), pm(7, 2025))]
    #[case(PaymentSchedule::ClosingDay(3), date(2025, 7, 3), pm(8, 2025))]
    #[case(PaymentSchedule::ClosingDay(10), date(2025, 12, 20), pm(1, 2026))]
    fn test_payment_month(
        #[case] schedule: PaymentSchedule,
        #[case] purchase: NaiveDate,
        #[case] expected: PaymentMonth,
    ) {
        assert_eq!(schedule.payment_month(purchase), expected);
    }

    #[test]
    fn test_defaults() {
        let options = ImportOptions::default();
        assert_eq!(options.category, "Credit Card");
        assert_eq!(options.schedule(), PaymentSchedule::NextMonth);
        assert!(options.match_refunds);
        assert!(options.is_excluded("PAYMENT RECEIVED - THANK YOU"));
        assert!(options.is_excluded("Pagamento recebido"));
        assert!(!options.is_excluded("Amazon"));
    }

    #[test]
    fn test_generate_future_overrides_anchor_and_statement_mode() {
        let options = ImportOptions {
            anchor: Some(pm(3, 2024)),
            statement_mode: true,
            generate_future: true,
            ..ImportOptions::default()
        };
        assert_eq!(options.effective_anchor(), None);
        assert!(!options.collapses_installments());
    }

    #[test]
    fn test_from_json() {
        let options = ImportOptions::from_json(
            r#"{"closingDay": 5, "anchor": "março/2024", "statementMode": true, "locale": "en"}"#,
        )
        .unwrap();

        assert_eq!(options.schedule(), PaymentSchedule::ClosingDay(5));
        assert_eq!(options.effective_anchor(), Some(pm(3, 2024)));
        assert!(options.collapses_installments());
        assert_eq!(options.locale, MonthLocale::En);
        assert_eq!(options.category, DEFAULT_CATEGORY);
    }

    #[rstest]
    #[case(r#"{"closingDay": 0}"#)]
    #[case(r#"{"closingDay": 32}"#)]
    #[case(r#"{"category": "  "}"#)]
    #[case(r#"{"anchor": "13/2024"}"#)]
    #[case(r#"{"anchorMonth": 3}"#)]
    #[case(r#"{"anchorYear": 2024}"#)]
    #[case(r#"{"anchorMonth": 13, "anchorYear": 2024}"#)]
    #[case("not json")]
    fn test_from_json_rejects(#[case] json: &str) {
        assert!(ImportOptions::from_json(json).is_err());
    }

    #[rstest]
    #[case(r#"{"anchorMonth": 3, "anchorYear": 2024}"#, Some(pm(3, 2024)))]
    #[case(r#"{"anchor": "julho/2025", "anchorMonth": 3, "anchorYear": 2024}"#, Some(pm(7, 2025)))]
    #[case(r#"{"anchorMonth": 3, "anchorYear": 2024, "generateFuture": true}"#, None)]
    fn test_anchor_from_month_and_year(#[case] json: &str, #[case] expected: Option<PaymentMonth>) {
        let options = ImportOptions::from_json(json).unwrap();
        assert_eq!(options.effective_anchor(), expected);
    }

    #[test]
    fn test_today_override() {
        let options = ImportOptions {
            today: Some(date(2024, 5, 1)),
            ..ImportOptions::default()
        };
        assert_eq!(options.today(), date(2024, 5, 1));
    }
}
