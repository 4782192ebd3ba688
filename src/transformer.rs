//! Linhas da fatura entram, candidatos a gasto saem.
//!
//! Puro e síncrono, sem I/O nem estado compartilhado. Linhas ruins são
//! descartadas e listadas em [`ImportOutcome::skipped`]; nunca abortam o lote.

use chrono::NaiveDate;
use log::{debug, info, warn};
use rust_decimal::Decimal;

use crate::errors::ImportResult;
use crate::installment::{parse_installments, squash, Installments};
use crate::options::{ImportOptions, PaymentSchedule};
use crate::parsers::prelude::*;
use crate::period::PaymentMonth;
use crate::refunds::{is_refund_title, RefundLedger};
use crate::types::{ExpenseCandidate, ImportOutcome, SkipReason, SkippedLine};

/// Lê `content` como CSV de fatura e o transforma.
///
/// Só falha quando o arquivo inteiro é inutilizável (coluna ausente, opções
/// inválidas); problemas de linha vão para o resultado.
pub fn transform_csv(content: &str, options: &ImportOptions) -> ImportResult<ImportOutcome> {
    options.validate()?;
    let rows = StatementCsvParser::parse(content).inspect_err(|e| warn!("statement rejected: {}", e))?;
    Ok(transform(rows, options))
}

pub fn transform(rows: Vec<RowResult>, options: &ImportOptions) -> ImportOutcome {
    let lines_read = rows.len();
    let mut lines = Vec::with_capacity(rows.len());
    let mut skipped = Vec::new();

    for row in rows {
        match row {
            Ok(line) => lines.push(line),
            Err(skip) => {
                debug!("line {} skipped: {}", skip.line, skip.reason);
                skipped.push(skip);
            }
        }
    }

    let mut refunds = if options.match_refunds {
        RefundLedger::from_lines(&lines)
    } else {
        RefundLedger::default()
    };
    if !refunds.is_empty() {
        debug!("refunds pending match: {:?}", refunds);
    }

    let context = LineContext {
        options,
        schedule: options.schedule(),
        today: options.today(),
    };

    let mut candidates = Vec::new();
    for line in lines {
        match context.expand(&line, &mut refunds) {
            Ok(expanded) => candidates.extend(expanded),
            Err(reason) => {
                debug!("line {} ({:?}) skipped: {}", line.line, line.title, reason);
                skipped.push(SkippedLine::new(line.line, Some(line.title), reason));
            }
        }
    }

    if let Some(anchor) = options.effective_anchor() {
        for candidate in &mut candidates {
            candidate.set_period(anchor, options.locale);
        }
    }

    skipped.sort_by_key(|s| s.line);

    info!(
        "statement transformed: {} lines read, {} candidates, {} ignored",
        lines_read,
        candidates.len(),
        skipped.len()
    );

    ImportOutcome {
        candidates,
        lines_read,
        ignored: skipped.len(),
        skipped,
    }
}

struct LineContext<'a> {
    options: &'a ImportOptions,
    schedule: PaymentSchedule,
    /// Data usada nas linhas sem data.
    today: NaiveDate,
}

impl LineContext<'_> {
    fn expand(
        &self,
        line: &StatementLine,
        refunds: &mut RefundLedger,
    ) -> Result<Vec<ExpenseCandidate>, SkipReason> {
        if self.options.is_excluded(&line.title) {
            return Err(SkipReason::ExcludedTitle);
        }
        if is_refund_title(&line.title) {
            return Err(SkipReason::RefundLine);
        }

        let amount = line.amount.round_dp(2);
        if amount <= Decimal::ZERO {
            return Err(SkipReason::NonPositiveAmount);
        }
        if refunds.consume(&line.title, line.amount) {
            return Err(SkipReason::Refunded);
        }

        let base = self.schedule.payment_month(line.date.unwrap_or(self.today));

        match parse_installments(&line.title)? {
            Installments::Single => Ok(vec![self.candidate(
                squash(&line.title),
                amount,
                base,
                false,
                None,
            )]),
            Installments::Plan(plan) => {
                if plan.is_inverted() {
                    return Err(SkipReason::InvertedInstallment);
                }

                // título que é só o marcador não tem descrição
                if plan.description.is_empty() {
                    return Err(SkipReason::EmptyTitle);
                }
                let description = plan.description.clone();

                let range = if self.options.collapses_installments() {
                    plan.current..=plan.current
                } else {
                    plan.remaining()
                };

                Ok(range
                    .map(|i| {
                        self.candidate(
                            description.clone(),
                            amount,
                            base.plus_months(i - plan.current),
                            i == plan.current,
                            Some((i, plan.total)),
                        )
                    })
                    .collect())
            }
        }
    }

    fn candidate(
        &self,
        description: String,
        amount: Decimal,
        period: PaymentMonth,
        paid: bool,
        installment: Option<(u32, u32)>,
    ) -> ExpenseCandidate {
        ExpenseCandidate {
            description,
            category: self.options.category.clone(),
            amount,
            payment_month: period.month(),
            payment_year: period.year(),
            reference: period.label(self.options.locale),
            paid,
            installment: installment.map(|(current, _)| current),
            installment_total: installment.map(|(_, total)| total),
        }
    }
}
