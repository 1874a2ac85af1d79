//! Parser error types

use crate::combinator::ParseError;
use thiserror::Error;

/// Error returned by the grammar entry points
#[derive(Error, Debug)]
pub enum GrammarError {
    /// The source text does not match the grammar
    #[error("Syntax error at {0}")]
    Syntax(#[from] ParseError),

    /// The source text is larger than the configured limit
    #[error("Input of {len} bytes exceeds the configured limit of {limit} bytes")]
    InputTooLarge { len: usize, limit: usize },

    /// Invalid parser configuration
    #[error("Invalid parser configuration: {0}")]
    InvalidConfig(String),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

impl GrammarError {
    /// The underlying parse failure, if this is a syntax error
    pub fn as_syntax(&self) -> Option<&ParseError> {
        match self {
            GrammarError::Syntax(err) => Some(err),
            _ => None,
        }
    }
}

/// Result type for parser operations
pub type Result<T> = std::result::Result<T, GrammarError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combinator::Input;

    #[test]
    fn test_syntax_error_display() {
        let input = Input::new("if x {").advance(6);
        let error: GrammarError = ParseError::expected(&input, "'}'").into_hard().into();
        assert_eq!(
            error.to_string(),
            "Syntax error at line 1 column 7: expected '}'"
        );
        assert!(error.as_syntax().unwrap().is_hard());
    }

    #[test]
    fn test_input_too_large_display() {
        let error = GrammarError::InputTooLarge { len: 10, limit: 4 };
        assert!(error.to_string().contains("10 bytes"));
        assert!(error.as_syntax().is_none());
    }
}
