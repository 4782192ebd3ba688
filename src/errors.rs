use thiserror::Error;

/// Erros que abortam a importação do arquivo inteiro.
///
/// Problemas de uma linha isolada nunca viram erro: a linha é descartada e
/// registrada como [`SkipReason`](crate::SkipReason).
#[derive(Error, Debug)]
pub enum ImportError {
    /// Falha genérica durante o parsing do conteúdo (detalhe na mensagem)
    #[error("Parse failed: {0}")]
    ParseFailed(String),

    /// Formato do arquivo não é suportado pela biblioteca
    #[error("Unsupported file format")]
    UnsupportedFormat,

    /// Erro ao ler o conteúdo do arquivo do disco
    #[error("Failed to read file content: {0}")]
    ReadContentFailed(#[from] std::io::Error),

    /// O builder foi chamado sem fornecer conteúdo nem caminho de arquivo
    #[error("Content or filepath is required")]
    MissingContentAndFilepath,

    /// Cabeçalho do CSV sem uma coluna obrigatória (título ou valor)
    #[error("Missing required column in CSV: {0}")]
    MissingColumn(&'static str),

    /// Data do CSV inválida ou em formato não reconhecido
    #[error("Invalid CSV date format")]
    CsvDateInvalidFormat,

    /// Valor monetário do CSV que não pôde ser convertido
    #[error("Invalid amount format in CSV: {0}")]
    CsvAmountInvalid(String),

    /// Dia de fechamento da fatura fora do intervalo 1..=31
    #[error("Invalid closing day: {0} (expected 1-31)")]
    InvalidClosingDay(u32),

    /// Mês/ano que não pôde ser interpretado
    #[error("Invalid payment month: {0}")]
    InvalidMonth(String),

    /// Configuração de importação malformada
    #[error("Invalid import options: {0}")]
    InvalidOptions(String),
}

/// Alias conveniente para Result com nosso tipo de erro principal
pub type ImportResult<T> = Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_detail() {
        assert_eq!(
            ImportError::MissingColumn("amount").to_string(),
            "Missing required column in CSV: amount"
        );
        assert_eq!(
            ImportError::InvalidClosingDay(42).to_string(),
            "Invalid closing day: 42 (expected 1-31)"
        );
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: ImportError = io.into();
        assert!(matches!(err, ImportError::ReadContentFailed(_)));
    }
}
