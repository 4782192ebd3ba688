//! Transforma faturas de cartão de crédito exportadas em registros de gastos.
//!
//! Cada linha do CSV vira um ou mais gastos. Compras parceladas (`Parcela 2/5`)
//! geram as parcelas restantes, pagamentos e estornos ficam de fora e todo
//! gasto recebe o mês em que será pago.
//!
//! ```rust,ignore
//! use controle_gastos::ImportBuilder;
//!
//! let preview = ImportBuilder::new()
//!     .filename("fatura.csv")
//!     .closing_day(3)
//!     .preview(&existing)?;
//! ```

mod builder;
mod installment;
mod options;
mod period;
mod preview;
mod refunds;
mod sink;
mod transformer;
mod types;

pub mod errors;
pub mod parsers;

pub use builder::{FileFormat, ImportBuilder};
pub use errors::{ImportError, ImportResult};
pub use installment::{parse_installments, InstallmentPlan, Installments, MAX_INSTALLMENTS};
pub use options::{ImportOptions, PaymentSchedule, DEFAULT_CATEGORY, DEFAULT_EXCLUSION_PHRASES};
pub use parsers::prelude::*;
pub use period::{parse_month, MonthLocale, PaymentMonth};
pub use preview::{
    filter_duplicates, is_duplicate, CategorySummary, ImportPreview, ImportReport, MonthSummary,
    PreviewItem, DEFAULT_TOP_ITEMS,
};
pub use refunds::{is_refund_title, normalize_description};
pub use sink::{ExpenseSink, ImportBatch, Session, SinkError};
pub use transformer::{transform, transform_csv};
pub use types::{ExpenseCandidate, ImportOutcome, SkipReason, SkippedLine};
