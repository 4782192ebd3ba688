//! Marcadores `Parcela X/Y` que os emissores colocam nas compras parceladas.

use std::ops::RangeInclusive;
use std::sync::OnceLock;

use regex::Regex;

use crate::types::SkipReason;

/// Maior parcelamento aceito; totais acima disso são tratados como marcador corrompido.
pub const MAX_INSTALLMENTS: u32 = 999;

fn marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(?:\s*-\s*)?\bparcela\s*(\d+)\s*/\s*(\d+)\b")
            .expect("invalid installment regex")
    })
}

/// O que o título da linha diz sobre parcelamento.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Installments {
    Single,
    Plan(InstallmentPlan),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallmentPlan {
    /// Título sem o marcador.
    pub description: String,
    pub current: u32,
    pub total: u32,
}

impl InstallmentPlan {
    /// Parcelas ainda a pagar, `current..=total`. Vazio quando invertido.
    pub fn remaining(&self) -> RangeInclusive<u32> {
        self.current..=self.total
    }

    pub fn is_inverted(&self) -> bool {
        self.current > self.total
    }
}

/// Procura um marcador de parcela em `title`.
///
/// Marcador com número zero ou acima de [`MAX_INSTALLMENTS`] é rejeitado com
/// [`SkipReason::InvalidInstallment`].
pub fn parse_installments(title: &str) -> Result<Installments, SkipReason> {
    let Some(caps) = marker_re().captures(title) else {
        return Ok(Installments::Single);
    };

    let current = caps[1].parse::<u32>().map_err(|_| SkipReason::InvalidInstallment)?;
    let total = caps[2].parse::<u32>().map_err(|_| SkipReason::InvalidInstallment)?;
    if current == 0 || total == 0 || current > MAX_INSTALLMENTS || total > MAX_INSTALLMENTS {
        return Err(SkipReason::InvalidInstallment);
    }

    let whole = caps.get(0).map(|m| m.range()).unwrap_or(0..0);
    let description = squash(&format!("{} {}", &title[..whole.start], &title[whole.end..]));

    Ok(Installments::Plan(InstallmentPlan {
        description,
        current,
        total,
    }))
}

/// Título sem nenhum marcador de parcela.
pub fn strip_marker(title: &str) -> String {
    squash(&marker_re().replace_all(title, " "))
}

/// Espaços internos colapsados e bordas aparadas.
pub fn squash(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
