//! mapl Parser - combinator-based parser for mapl conditional mappings
//!
//! This crate provides:
//! - A small parser-combinator engine (`combinator`) with soft and hard
//!   failures, so a grammar can commit once it has seen enough input
//! - The condition, statement and `if` / `else if` / `else` grammars built
//!   on top of it, wired together by `Grammar`
//!
//! ```
//! use mapl_parser::Grammar;
//!
//! let grammar = Grammar::default();
//! let parsed = grammar
//!     .parse_conditional("if this.age >= 18 { tier = \"adult\" } else { tier = \"minor\" }")
//!     .unwrap();
//! assert_eq!(parsed.payload.branches().len(), 2);
//! ```

pub mod combinator;
pub mod config;
pub mod error;

mod condition_parser;
mod conditional_parser;
mod grammar;
mod mapping_parser;
mod statement_parser;

// Re-export main parser types
pub use combinator::{Input, ParseError, ParseResult, Parsed, Parser, Position, Severity};
pub use config::ParserConfig;
pub use error::{GrammarError, Result};
pub use grammar::Grammar;
