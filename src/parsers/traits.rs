use crate::errors::ImportError;

pub trait Parser {
    type Output;

    fn parse(content: &str) -> Result<Vec<Self::Output>, ImportError>;

    fn is_supported(filename: Option<&str>, content: &str) -> bool;
}
