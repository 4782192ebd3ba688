use std::fs;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::{ImportError, ImportResult};
use crate::options::ImportOptions;
use crate::parsers::prelude::*;
use crate::period::{MonthLocale, PaymentMonth};
use crate::preview::{ImportPreview, DEFAULT_TOP_ITEMS};
use crate::transformer::transform;
use crate::types::{ExpenseCandidate, ImportOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileFormat {
    #[serde(rename = "csv")]
    Csv,
}

impl FileFormat {
    fn parse(&self, content: &str) -> ImportResult<Vec<RowResult>> {
        match self {
            FileFormat::Csv => StatementCsvParser::parse(content),
        }
    }

    fn detect(filename: Option<&str>, content: Option<&str>) -> ImportResult<Self> {
        if let Some(filename) = filename {
            return if StatementCsvParser::is_supported(Some(filename), content.unwrap_or("")) {
                Ok(FileFormat::Csv)
            } else {
                Err(ImportError::UnsupportedFormat)
            };
        }

        match content {
            Some(content) if StatementCsvParser::is_supported(None, content) => Ok(FileFormat::Csv),
            _ => Err(ImportError::UnsupportedFormat),
        }
    }
}

/// Ponto de entrada de uma importação: de onde vem a fatura e como ela vira
/// gastos.
#[derive(Default)]
pub struct ImportBuilder {
    content: Option<String>,
    filepath: Option<String>,
    format: Option<FileFormat>,
    options: ImportOptions,
}

impl ImportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(mut self, content: &str) -> Self {
        self.content = Some(content.to_string());
        self
    }

    pub fn filename(mut self, filename: &str) -> Self {
        self.filepath = Some(filename.to_string());
        self
    }

    pub fn format(mut self, format: FileFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn options(mut self, options: ImportOptions) -> Self {
        self.options = options;
        self
    }

    pub fn closing_day(mut self, day: u32) -> Self {
        self.options.closing_day = Some(day);
        self
    }

    pub fn anchor(mut self, anchor: PaymentMonth) -> Self {
        self.options.anchor = Some(anchor);
        self
    }

    pub fn statement_mode(mut self, enabled: bool) -> Self {
        self.options.statement_mode = enabled;
        self
    }

    pub fn generate_future(mut self, enabled: bool) -> Self {
        self.options.generate_future = enabled;
        self
    }

    pub fn category(mut self, category: &str) -> Self {
        self.options.category = category.to_string();
        self
    }

    pub fn match_refunds(mut self, enabled: bool) -> Self {
        self.options.match_refunds = enabled;
        self
    }

    pub fn locale(mut self, locale: MonthLocale) -> Self {
        self.options.locale = locale;
        self
    }

    pub fn today(mut self, today: NaiveDate) -> Self {
        self.options.today = Some(today);
        self
    }

    pub fn transform(self) -> ImportResult<ImportOutcome> {
        self.options.validate()?;

        let format = self
            .format
            .map(Ok)
            .unwrap_or_else(|| FileFormat::detect(self.filepath.as_deref(), self.content.as_deref()))?;

        let content = self.content.map(Ok).unwrap_or_else(|| {
            self.filepath
                .ok_or(ImportError::MissingContentAndFilepath)
                .and_then(|path| fs::read_to_string(path).map_err(Into::into))
        })?;

        let rows = format.parse(&content)?;
        Ok(transform(rows, &self.options))
    }

    /// Transforma e resume, deixando de fora os candidatos já presentes em `existing`.
    pub fn preview(self, existing: &[ExpenseCandidate]) -> ImportResult<ImportPreview> {
        let outcome = self.transform()?;
        Ok(ImportPreview::build(&outcome, existing, DEFAULT_TOP_ITEMS))
    }
}
