//! Parser configuration

use crate::error::{GrammarError, Result};
use serde::{Deserialize, Serialize};

/// Limits applied by a `Grammar`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// How many blocks, parentheses or call argument lists may enclose a
    /// statement or expression. Deeper input is rejected with a hard error.
    pub max_nesting_depth: usize,

    /// Height limit for a single expression tree, counting every operator
    /// between the root and its deepest leaf. Longer operator chains are
    /// rejected with a hard error.
    pub max_expression_depth: usize,

    /// Maximum source size in bytes accepted by the entry points
    pub max_input_len: Option<usize>,
}

impl ParserConfig {
    /// Default nesting limit
    pub const DEFAULT_MAX_NESTING_DEPTH: usize = 64;

    /// Default expression height limit
    pub const DEFAULT_MAX_EXPRESSION_DEPTH: usize = 128;

    /// Create a configuration with default limits
    pub fn new() -> Self {
        Self {
            max_nesting_depth: Self::DEFAULT_MAX_NESTING_DEPTH,
            max_expression_depth: Self::DEFAULT_MAX_EXPRESSION_DEPTH,
            max_input_len: None,
        }
    }

    /// Set the nesting limit
    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    /// Set the expression height limit
    pub fn with_max_expression_depth(mut self, depth: usize) -> Self {
        self.max_expression_depth = depth;
        self
    }

    /// Set the input size limit
    pub fn with_max_input_len(mut self, len: usize) -> Self {
        self.max_input_len = Some(len);
        self
    }

    /// Load a configuration from YAML. Missing fields take their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: ParserConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the limits are usable
    pub fn validate(&self) -> Result<()> {
        if self.max_nesting_depth == 0 {
            return Err(GrammarError::InvalidConfig(
                "max_nesting_depth must be at least 1".to_string(),
            ));
        }
        if self.max_expression_depth == 0 {
            return Err(GrammarError::InvalidConfig(
                "max_expression_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self::new()
    }
}
