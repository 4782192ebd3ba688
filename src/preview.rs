//! Resumos exibidos antes de o usuário confirmar a importação e o relatório
//! devolvido depois dela.

use std::collections::{BTreeMap, HashMap};

use log::info;
use num_traits::Zero;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{ExpenseCandidate, ImportOutcome};

pub const DEFAULT_TOP_ITEMS: usize = 10;

const UNCATEGORIZED: &str = "Sem Categoria";

/// Totais de um mês de pagamento.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthSummary {
    #[serde(rename = "mesNumero")]
    pub month: u32,
    #[serde(rename = "anoPagamento")]
    pub year: i32,
    pub total: Decimal,
    #[serde(rename = "totalPago")]
    pub paid: Decimal,
    #[serde(rename = "totalAberto")]
    pub open: Decimal,
    #[serde(rename = "quantidade")]
    pub count: u64,
}

/// Totais de uma categoria, sem diferenciar maiúsculas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    #[serde(rename = "categoria")]
    pub category: String,
    pub total: Decimal,
    #[serde(rename = "totalPago")]
    pub paid: Decimal,
    #[serde(rename = "totalAberto")]
    pub open: Decimal,
    #[serde(rename = "quantidade")]
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewItem {
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "valor")]
    pub amount: Decimal,
    #[serde(rename = "mesNumero")]
    pub month: u32,
    #[serde(rename = "anoPagamento")]
    pub year: i32,
    #[serde(rename = "parcelaAtual")]
    pub installment: Option<u32>,
    #[serde(rename = "totalParcelas")]
    pub installment_total: Option<u32>,
}

impl From<&ExpenseCandidate> for PreviewItem {
    fn from(c: &ExpenseCandidate) -> Self {
        Self {
            description: c.description.clone(),
            category: c.category.clone(),
            amount: c.amount,
            month: c.payment_month,
            year: c.payment_year,
            installment: c.installment,
            installment_total: c.installment_total,
        }
    }
}

/// Contagens devolvidas depois do envio dos candidatos.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    /// Candidatos considerados na importação.
    #[serde(rename = "totalLidas")]
    pub lines_read: usize,
    #[serde(rename = "importadas")]
    pub imported: usize,
    /// Candidatos descartados por duplicarem gastos já existentes.
    #[serde(rename = "ignoradas")]
    pub ignored: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportPreview {
    #[serde(rename = "totalLidas")]
    pub lines_read: usize,
    #[serde(rename = "importadas")]
    pub imported: usize,
    #[serde(rename = "ignoradas")]
    pub ignored: usize,
    /// Linhas da fatura descartadas antes de virarem candidatos.
    #[serde(rename = "linhasDescartadas")]
    pub skipped_lines: usize,
    #[serde(rename = "resumoMeses")]
    pub month_totals: Vec<MonthSummary>,
    #[serde(rename = "resumoCategorias")]
    pub category_totals: Vec<CategorySummary>,
    #[serde(rename = "totalValor")]
    pub total_amount: Decimal,
    #[serde(rename = "qtdAvista")]
    pub single_count: u64,
    #[serde(rename = "qtdParcelados")]
    pub installment_count: u64,
    #[serde(rename = "topItens")]
    pub top_items: Vec<PreviewItem>,
    #[serde(rename = "itens")]
    pub items: Vec<ExpenseCandidate>,
}

/// Mesmo mês de pagamento, mesma descrição (sem diferenciar maiúsculas) e
/// mesma parcela. Candidatos sem dados de parcela nunca são duplicados.
pub fn is_duplicate(candidate: &ExpenseCandidate, existing: &ExpenseCandidate) -> bool {
    candidate.payment_month == existing.payment_month
        && candidate.payment_year == existing.payment_year
        && candidate.description.to_lowercase() == existing.description.to_lowercase()
        && existing.installment.is_some()
        && existing.installment == candidate.installment
        && existing.installment_total.is_some()
        && existing.installment_total == candidate.installment_total
}

/// Separa os candidatos que já existem em `existing`.
pub fn filter_duplicates(
    candidates: &[ExpenseCandidate],
    existing: &[ExpenseCandidate],
) -> (Vec<ExpenseCandidate>, usize) {
    let kept: Vec<ExpenseCandidate> = candidates
        .iter()
        .filter(|c| !existing.iter().any(|e| is_duplicate(c, e)))
        .cloned()
        .collect();
    let duplicates = candidates.len() - kept.len();
    (kept, duplicates)
}

impl ImportReport {
    pub fn new(lines_read: usize, imported: usize) -> Self {
        Self {
            lines_read,
            imported,
            ignored: lines_read.saturating_sub(imported),
        }
    }
}

#[derive(Default)]
struct Totals {
    total: Decimal,
    paid: Decimal,
    count: u64,
}

impl Totals {
    fn add(&mut self, candidate: &ExpenseCandidate) {
        self.total += candidate.amount;
        if candidate.paid {
            self.paid += candidate.amount;
        }
        self.count += 1;
    }

    fn open(&self) -> Decimal {
        self.total - self.paid
    }
}

impl ImportPreview {
    pub fn build(outcome: &ImportOutcome, existing: &[ExpenseCandidate], top_n: usize) -> Self {
        let (items, duplicates) = filter_duplicates(&outcome.candidates, existing);

        let mut by_month: BTreeMap<(i32, u32), Totals> = BTreeMap::new();
        let mut category_index: HashMap<String, usize> = HashMap::new();
        let mut by_category: Vec<(String, Totals)> = Vec::new();
        let mut total_amount = Decimal::zero();
        let mut installment_count = 0;

        for item in &items {
            by_month
                .entry((item.payment_year, item.payment_month))
                .or_default()
                .add(item);

            let name = if item.category.trim().is_empty() {
                UNCATEGORIZED
            } else {
                item.category.as_str()
            };
            let idx = *category_index.entry(name.to_lowercase()).or_insert_with(|| {
                by_category.push((name.to_string(), Totals::default()));
                by_category.len() - 1
            });
            by_category[idx].1.add(item);

            total_amount += item.amount;
            if item.is_installment() {
                installment_count += 1;
            }
        }

        let month_totals = by_month
            .into_iter()
            .map(|((year, month), t)| MonthSummary {
                month,
                year,
                total: t.total,
                paid: t.paid,
                open: t.open(),
                count: t.count,
            })
            .collect();

        let mut category_totals: Vec<CategorySummary> = by_category
            .into_iter()
            .map(|(category, t)| CategorySummary {
                category,
                total: t.total,
                paid: t.paid,
                open: t.open(),
                count: t.count,
            })
            .collect();
        category_totals.sort_by(|a, b| b.total.cmp(&a.total));

        let mut ranked: Vec<&ExpenseCandidate> = items.iter().collect();
        ranked.sort_by(|a, b| b.amount.cmp(&a.amount));
        let top_items = ranked.into_iter().take(top_n).map(PreviewItem::from).collect();

        let imported = items.len();
        info!(
            "preview built: {} candidates, {} duplicates, total {}",
            outcome.candidates.len(),
            duplicates,
            total_amount
        );

        Self {
            lines_read: outcome.candidates.len(),
            imported,
            ignored: duplicates,
            skipped_lines: outcome.ignored,
            month_totals,
            category_totals,
            total_amount,
            single_count: imported as u64 - installment_count,
            installment_count,
            top_items,
            items,
        }
    }

    pub fn report(&self) -> ImportReport {
        ImportReport::new(self.lines_read, self.imported)
    }
}
