//! Immutable parser input
//!
//! An `Input` is a shared view of the source text plus a byte offset.
//! Advancing returns a new `Input`; the source is never copied or mutated,
//! so any number of parsers can hold onto positions of the same text.

use std::fmt;
use std::sync::Arc;

/// A location in the source text. Lines and columns are 1-based and
/// columns count characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {} column {}", self.line, self.column)
    }
}

/// Source text and the current read position.
///
/// `depth` counts how many nested blocks or sub-expressions enclose the
/// position; it travels with the input so depth limits need no shared
/// state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input {
    source: Arc<str>,
    offset: usize,
    depth: usize,
}

impl Input {
    pub fn new(source: impl Into<Arc<str>>) -> Self {
        Self {
            source: source.into(),
            offset: 0,
            depth: 0,
        }
    }

    /// The unconsumed text
    pub fn as_str(&self) -> &str {
        self.source.get(self.offset..).unwrap_or("")
    }

    /// The full source text
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_empty(&self) -> bool {
        self.offset >= self.source.len()
    }

    pub fn peek(&self) -> Option<char> {
        self.as_str().chars().next()
    }

    /// Skip `bytes` bytes. Callers advance by the length of text they have
    /// matched, which keeps the offset on a character boundary.
    pub fn advance(&self, bytes: usize) -> Self {
        Self {
            source: Arc::clone(&self.source),
            offset: (self.offset + bytes).min(self.source.len()),
            depth: self.depth,
        }
    }

    pub(crate) fn descend(&self) -> Self {
        Self {
            depth: self.depth + 1,
            ..self.clone()
        }
    }

    pub(crate) fn ascend(&self) -> Self {
        Self {
            depth: self.depth.saturating_sub(1),
            ..self.clone()
        }
    }

    /// Line and column of the current offset
    pub fn position(&self) -> Position {
        let consumed = self.source.get(..self.offset).unwrap_or("");
        let line = consumed.matches('\n').count() + 1;
        let line_start = consumed.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = consumed[line_start..].chars().count() + 1;
        Position {
            offset: self.offset,
            line,
            column,
        }
    }
}

impl From<&str> for Input {
    fn from(source: &str) -> Self {
        Input::new(source)
    }
}
