//! mapl Core - AST and value types for the mapl mapping language
//!
//! This crate provides the types shared between the parser and any
//! downstream evaluator:
//! - Value types for literals
//! - AST (Abstract Syntax Tree) definitions for conditions, statements
//!   and conditional chains
//! - Error types

pub mod ast;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use ast::{Branch, ConditionalChain, Expression, Mapping, Operator, Statement};
pub use error::CoreError;
pub use types::Value;
