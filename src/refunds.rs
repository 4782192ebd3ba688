//! Estornos e cancelamentos que desfazem uma compra da mesma fatura.
//!
//! Uma linha `Estorno de "Loja X"` de `-59,90` cancela uma compra `Loja X`
//! de `59,90`. Nenhuma das duas vira gasto.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use rust_decimal::Decimal;

use crate::installment::strip_marker;
use crate::parsers::prelude::StatementLine;

const REFUND_KEYWORDS: &[&str] = &[
    "estorno",
    "cancelamento",
    "cancelada",
    "cancelado",
    "reversao",
    "reversão",
    "refund",
    "reversal",
];

fn target_res() -> &'static [Regex] {
    static RES: OnceLock<Vec<Regex>> = OnceLock::new();
    RES.get_or_init(|| {
        [
            r#"(?i)(?:estorno|cancelamento|refund)\s+(?:de|of)\s+"([^"]+)""#,
            r#"(?i)(?:estorno|cancelamento|refund)\s+(?:de|of)\s+(.+)"#,
            r#"(?i)compra\s+cancelada\s*[:\-]?\s*(.+)"#,
        ]
        .iter()
        .map(|pattern| Regex::new(pattern).expect("invalid refund regex"))
        .collect()
    })
}

pub fn is_refund_title(title: &str) -> bool {
    let t = title.to_lowercase();
    REFUND_KEYWORDS.iter().any(|k| t.contains(k))
}

/// Descrição da compra estornada, quando o título a menciona.
fn refund_target(title: &str) -> Option<String> {
    target_res()
        .iter()
        .find_map(|re| re.captures(title))
        .map(|caps| caps[1].trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Chave usada para casar estorno e compra: sem marcador de parcela, em
/// minúsculas, sem aspas e com espaços colapsados.
pub fn normalize_description(title: &str) -> String {
    strip_marker(title)
        .to_lowercase()
        .replace(|c: char| c == '"' || c == '\'', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Valores de estorno ainda não usados, por descrição normalizada.
#[derive(Debug, Default)]
pub struct RefundLedger {
    pending: HashMap<String, Vec<Decimal>>,
}

impl RefundLedger {
    pub fn from_lines<'a, I>(lines: I) -> Self
    where
        I: IntoIterator<Item = &'a StatementLine>,
    {
        let mut ledger = Self::default();
        for line in lines {
            if !is_refund_title(&line.title) || line.amount.is_zero() {
                continue;
            }
            let target = refund_target(&line.title).unwrap_or_else(|| line.title.clone());
            ledger
                .pending
                .entry(normalize_description(&target))
                .or_default()
                .push(line.amount.abs());
        }
        ledger
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Consome um estorno com mesmo `title` e `amount` (tolerância de um centavo).
    /// Retorna `true` quando a compra foi desfeita.
    pub fn consume(&mut self, title: &str, amount: Decimal) -> bool {
        let key = normalize_description(title);
        let Some(amounts) = self.pending.get_mut(&key) else {
            return false;
        };

        let tolerance = Decimal::new(1, 2);
        let Some(idx) = amounts.iter().position(|a| (*a - amount).abs() <= tolerance) else {
            return false;
        };

        amounts.remove(idx);
        if amounts.is_empty() {
            self.pending.remove(&key);
        }
        true
    }
}
