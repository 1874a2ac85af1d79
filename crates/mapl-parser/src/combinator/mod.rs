//! Combinator engine
//!
//! The substrate every grammar in this crate is built from:
//! - `Input`: immutable cursor into shared source text
//! - `ParseResult` / `ParseError`: success with remainder, or a soft/hard failure
//! - `Parser`: cloneable, thread-safe parsing function
//! - primitives (sequencing, optional, must-be, delimited repetition, ...)
//! - lexical leaves (whitespace, comments, identifiers, literals)

mod input;
mod lexical;
mod primitives;
mod result;

pub use input::{Input, Position};
pub use lexical::{
    identifier, newline_allow_comment, number, optional_spaces, quoted_string, spaces_and_tabs,
    whitespace_newline_comments,
};
pub use primitives::{
    delimited_pattern, discard, end_of_input, keyword, literal, many, must_be, nested, one_of,
    optional, sequence, Parser,
};
pub use result::{ParseError, ParseResult, Parsed, Severity};

pub(crate) use lexical::starts_with_keyword;
