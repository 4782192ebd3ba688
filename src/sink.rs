//! Envio dos candidatos confirmados para onde os gastos são guardados.
//!
//! A biblioteca não fala com nenhum backend; quem usa implementa
//! [`ExpenseSink`] sobre o próprio cliente HTTP ou banco.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::preview::ImportReport;
use crate::types::{ExpenseCandidate, ImportOutcome};

/// Usuário autenticado dono dos gastos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: String,
    pub token: String,
}

impl Session {
    pub fn new(user_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            token: token.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Session rejected: {0}")]
    Unauthorized(String),

    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    #[error("Expense rejected: {0}")]
    Rejected(String),
}

pub trait ExpenseSink {
    /// Grava `candidates` para o usuário da sessão, pulando os que já existem.
    fn import(
        &self,
        session: &Session,
        candidates: &[ExpenseCandidate],
    ) -> Result<ImportReport, SinkError>;
}

/// Candidatos aguardando confirmação. Um envio com falha os mantém aqui, e o
/// usuário pode tentar de novo sem reenviar a fatura.
#[derive(Debug, Clone, Default)]
pub struct ImportBatch {
    candidates: Vec<ExpenseCandidate>,
}

impl ImportBatch {
    pub fn new(candidates: Vec<ExpenseCandidate>) -> Self {
        Self { candidates }
    }

    pub fn candidates(&self) -> &[ExpenseCandidate] {
        &self.candidates
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn submit<S: ExpenseSink + ?Sized>(
        &mut self,
        sink: &S,
        session: &Session,
    ) -> Result<ImportReport, SinkError> {
        if self.candidates.is_empty() {
            return Ok(ImportReport::default());
        }

        let report = sink
            .import(session, &self.candidates)
            .inspect_err(|e| {
                warn!(
                    "import of {} candidates for {} failed: {}",
                    self.candidates.len(),
                    session.user_id,
                    e
                )
            })?;

        info!(
            "imported {} of {} candidates for {} ({} ignored)",
            report.imported, report.lines_read, session.user_id, report.ignored
        );
        self.candidates.clear();
        Ok(report)
    }
}

impl From<ImportOutcome> for ImportBatch {
    fn from(outcome: ImportOutcome) -> Self {
        Self::new(outcome.candidates)
    }
}
