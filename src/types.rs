use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::period::{MonthLocale, PaymentMonth};

/// Gasto gerado a partir de uma linha da fatura, pronto para revisão ou envio.
///
/// Serializado com os nomes de campo que o backend de gastos espera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseCandidate {
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "valor")]
    pub amount: Decimal,
    #[serde(rename = "mesNumero")]
    pub payment_month: u32,
    #[serde(rename = "anoPagamento")]
    pub payment_year: i32,
    #[serde(rename = "referenteA")]
    pub reference: String,
    #[serde(rename = "pago")]
    pub paid: bool,
    #[serde(rename = "parcelaAtual")]
    pub installment: Option<u32>,
    #[serde(rename = "totalParcelas")]
    pub installment_total: Option<u32>,
}

impl ExpenseCandidate {
    pub fn period(&self) -> Option<PaymentMonth> {
        PaymentMonth::new(self.payment_month, self.payment_year).ok()
    }

    /// Move o candidato para outro mês de pagamento, atualizando o rótulo.
    pub fn set_period(&mut self, period: PaymentMonth, locale: MonthLocale) {
        self.payment_month = period.month();
        self.payment_year = period.year();
        self.reference = period.label(locale);
    }

    pub fn is_installment(&self) -> bool {
        self.installment.is_some() && self.installment_total.is_some()
    }
}

/// Por que uma linha da fatura não gerou candidato.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// O leitor de CSV não conseguiu ler o registro.
    MalformedRecord,
    EmptyTitle,
    InvalidAmount,
    NonPositiveAmount,
    /// Título contém uma das frases de exclusão (pagamentos, encerramento de dívida).
    ExcludedTitle,
    /// A própria linha é um estorno ou cancelamento.
    RefundLine,
    /// Um estorno em outra linha desfaz esta compra.
    Refunded,
    /// Marcador de parcela com número zero ou ilegível.
    InvalidInstallment,
    /// Marcador de parcela com a atual maior que o total.
    InvertedInstallment,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::MalformedRecord => "malformed record",
            SkipReason::EmptyTitle => "empty title",
            SkipReason::InvalidAmount => "invalid amount",
            SkipReason::NonPositiveAmount => "non-positive amount",
            SkipReason::ExcludedTitle => "excluded title",
            SkipReason::RefundLine => "refund line",
            SkipReason::Refunded => "refunded purchase",
            SkipReason::InvalidInstallment => "invalid installment marker",
            SkipReason::InvertedInstallment => "installment past its total",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedLine {
    /// Linha no arquivo, a partir de 1; o cabeçalho é a linha 1.
    pub line: u64,
    pub title: Option<String>,
    pub reason: SkipReason,
}

impl SkippedLine {
    pub fn new(line: u64, title: Option<String>, reason: SkipReason) -> Self {
        Self { line, title, reason }
    }
}

/// Resultado da transformação de um arquivo de fatura.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportOutcome {
    pub candidates: Vec<ExpenseCandidate>,
    pub lines_read: usize,
    pub ignored: usize,
    pub skipped: Vec<SkippedLine>,
}

impl ImportOutcome {
    pub fn produced(&self) -> usize {
        self.candidates.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn candidate() -> ExpenseCandidate {
        ExpenseCandidate {
            description: "Amazon".to_string(),
            category: "Credit Card".to_string(),
            amount: Decimal::from_str("100.00").unwrap(),
            payment_month: 2,
            payment_year: 2024,
            reference: "fevereiro/2024".to_string(),
            paid: true,
            installment: Some(1),
            installment_total: Some(3),
        }
    }

    #[test]
    fn test_candidate_serializes_backend_names() {
        let json = serde_json::to_value(candidate()).unwrap();

        assert_eq!(json["descricao"], "Amazon");
        assert_eq!(json["categoria"], "Credit Card");
        assert_eq!(json["mesNumero"], 2);
        assert_eq!(json["anoPagamento"], 2024);
        assert_eq!(json["referenteA"], "fevereiro/2024");
        assert_eq!(json["pago"], true);
        assert_eq!(json["parcelaAtual"], 1);
        assert_eq!(json["totalParcelas"], 3);
    }

    #[test]
    fn test_candidate_without_installments_serializes_null() {
        let mut single = candidate();
        single.installment = None;
        single.installment_total = None;

        let json = serde_json::to_value(&single).unwrap();
        assert!(json["parcelaAtual"].is_null());
        assert!(!single.is_installment());
    }

    #[test]
    fn test_set_period_updates_label() {
        let mut c = candidate();
        c.set_period(PaymentMonth::new(1, 2025).unwrap(), MonthLocale::En);

        assert_eq!(c.payment_month, 1);
        assert_eq!(c.payment_year, 2025);
        assert_eq!(c.reference, "january/2025");
        assert_eq!(c.period(), PaymentMonth::new(1, 2025).ok());
    }

    #[test]
    fn test_skip_reason_display() {
        assert_eq!(SkipReason::NonPositiveAmount.to_string(), "non-positive amount");
        let json = serde_json::to_string(&SkipReason::InvertedInstallment).unwrap();
        assert_eq!(json, "\"inverted_installment\"");
    }
}
