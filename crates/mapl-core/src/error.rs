//! Error types for mapl Core

use thiserror::Error;

/// Core error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Invalid conditional chain: {0}")]
    InvalidChain(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
