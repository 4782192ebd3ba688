use super::dto::{RowResult, StatementLine, StatementRowRaw};
use crate::errors::ImportError;
use crate::parsers::traits::Parser;
use crate::types::{SkipReason, SkippedLine};
use csv::{ReaderBuilder, StringRecord, Trim};

/// Exportação de fatura de cartão com colunas `title`, `amount` e `date`.
///
/// Cabeçalhos ignoram maiúsculas e aceitam os nomes em português usados
/// pelos emissores brasileiros (`titulo`, `descricao`, `valor`, `data`).
pub struct StatementCsvParser;

fn canonical_column(header: &str) -> Option<&'static str> {
    let name = header.trim().trim_start_matches('\u{feff}').to_lowercase();
    match name.as_str() {
        "title" | "titulo" | "título" | "descricao" | "descrição" | "description" => Some("title"),
        "amount" | "valor" | "value" => Some("amount"),
        "date" | "data" => Some("date"),
        _ => None,
    }
}

/// Renomeia cabeçalhos conhecidos para o nome canônico. Só o primeiro que
/// mapeia para cada coluna vale; os demais mantêm o próprio nome em minúsculas.
fn canonical_headers(headers: &StringRecord) -> Result<StringRecord, ImportError> {
    let mut seen: Vec<&'static str> = Vec::new();
    let mut out = StringRecord::new();

    for header in headers.iter() {
        match canonical_column(header) {
            Some(column) if !seen.contains(&column) => {
                seen.push(column);
                out.push_field(column);
            }
            _ => out.push_field(&header.trim().to_lowercase()),
        }
    }

    for required in ["title", "amount"] {
        if !seen.contains(&required) {
            return Err(ImportError::MissingColumn(required));
        }
    }

    Ok(out)
}

/// Exportações brasileiras costumam usar `;` e deixar `,` para os decimais.
fn detect_delimiter(content: &str) -> u8 {
    let header = content.lines().next().unwrap_or("");
    if header.matches(';').count() > header.matches(',').count() {
        b';'
    } else {
        b','
    }
}

impl Parser for StatementCsvParser {
    type Output = RowResult;

    fn is_supported(filename: Option<&str>, content: &str) -> bool {
        match filename {
            Some(name) => {
                let name = name.to_lowercase();
                name.ends_with(".csv") || name.ends_with(".txt")
            }
            None => {
                let first_line = content.lines().next().unwrap_or("");
                let columns: Vec<_> = first_line
                    .split(|c: char| c == ',' || c == ';')
                    .filter_map(|h| {
                        canonical_column(h.trim().trim_start_matches('\u{feff}').trim_matches('"'))
                    })
                    .collect();
                columns.contains(&"title") && columns.contains(&"amount")
            }
        }
    }

    fn parse(content: &str) -> Result<Vec<Self::Output>, ImportError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .delimiter(detect_delimiter(content))
            .from_reader(content.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| ImportError::ParseFailed(format!("CSV header error: {}", e)))?;
        let headers = canonical_headers(headers)?;

        let mut rows = Vec::new();
        let mut record = StringRecord::new();

        loop {
            match reader.read_record(&mut record) {
                Ok(true) => {
                    let line = record.position().map(|p| p.line()).unwrap_or_default();
                    let row = match record.deserialize::<StatementRowRaw>(Some(&headers)) {
                        Ok(raw) => StatementLine::from_raw(line, raw),
                        Err(_) => Err(SkippedLine::new(line, None, SkipReason::MalformedRecord)),
                    };
                    rows.push(row);
                }
                Ok(false) => break,
                Err(e) if e.is_io_error() => {
                    return Err(ImportError::ParseFailed(format!("CSV read error: {}", e)));
                }
                Err(e) => {
                    let line = e.position().map(|p| p.line()).unwrap_or_default();
                    rows.push(Err(SkippedLine::new(line, None, SkipReason::MalformedRecord)));
                }
            }
        }

        Ok(rows)
    }
}
