mod dto;
mod parser;
mod types;

pub mod prelude {
    pub use super::dto::{RowResult, StatementLine, StatementRowRaw};
    pub use super::parser::StatementCsvParser;
    pub use super::types::{CsvAmount, CsvDate};
}
