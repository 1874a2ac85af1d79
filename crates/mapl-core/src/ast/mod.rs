//! Abstract Syntax Tree (AST) definitions for mapl
//!
//! This module contains the AST node definitions for:
//! - Expressions (conditions and assigned values)
//! - Statements (field mappings and nested conditionals)
//! - Conditional chains (`if` / `else if` / `else`)

pub mod conditional;
pub mod expression;
pub mod operator;
pub mod statement;

pub use conditional::{Branch, ChainBuilder, ConditionalChain};
pub use expression::{Expression, UnaryOperator};
pub use operator::Operator;
pub use statement::{Mapping, Statement};
