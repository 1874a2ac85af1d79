//! Parse results and structured failures

use super::input::{Input, Position};
use std::fmt;

/// How a failure must be treated by the combinator that receives it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// This alternative did not match; the caller may try another one
    Soft,
    /// A keyword committed the parse; the caller must propagate
    Hard,
}

/// A failed parse attempt.
///
/// Only the failing `Input` is kept. Line and column are computed when
/// `position` or `Display` needs them.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    at: Input,
    expected: Vec<String>,
    message: Option<String>,
    severity: Severity,
}

impl ParseError {
    /// Soft failure expecting `what` at the input position
    pub fn expected(input: &Input, what: impl Into<String>) -> Self {
        Self {
            at: input.clone(),
            expected: vec![what.into()],
            message: None,
            severity: Severity::Soft,
        }
    }

    /// Soft failure with a free-form message at the input position
    pub fn message(input: &Input, message: impl Into<String>) -> Self {
        Self {
            at: input.clone(),
            expected: Vec::new(),
            message: Some(message.into()),
            severity: Severity::Soft,
        }
    }

    pub fn into_hard(mut self) -> Self {
        self.severity = Severity::Hard;
        self
    }

    pub fn position(&self) -> Position {
        self.at.position()
    }

    /// Byte offset of the failure
    pub fn offset(&self) -> usize {
        self.at.offset()
    }

    pub fn expected_tokens(&self) -> &[String] {
        &self.expected
    }

    pub fn message_text(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn is_hard(&self) -> bool {
        self.severity == Severity::Hard
    }

    pub fn is_soft(&self) -> bool {
        self.severity == Severity::Soft
    }

    /// Combine two failures of alternatives tried at the same input.
    ///
    /// The failure that got further wins. On a tie the expectations are
    /// unioned and the first message is kept. Hard beats soft.
    pub fn merge(self, other: ParseError) -> ParseError {
        let severity = if self.is_hard() || other.is_hard() {
            Severity::Hard
        } else {
            Severity::Soft
        };
        let mut merged = match self.offset().cmp(&other.offset()) {
            std::cmp::Ordering::Greater => self,
            std::cmp::Ordering::Less => other,
            std::cmp::Ordering::Equal => {
                let mut merged = self;
                for token in other.expected {
                    if !merged.expected.contains(&token) {
                        merged.expected.push(token);
                    }
                }
                merged.message = merged.message.or(other.message);
                merged
            }
        };
        merged.severity = severity;
        merged
    }

    pub(crate) fn relabel(mut self, what: &str) -> Self {
        self.expected = vec![what.to_string()];
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.position())?;
        if let Some(message) = &self.message {
            return write!(f, "{}", message);
        }
        match self.expected.as_slice() {
            [] => write!(f, "unexpected input"),
            [only] => write!(f, "expected {}", only),
            [init @ .., last] => write!(f, "expected {} or {}", init.join(", "), last),
        }
    }
}

impl std::error::Error for ParseError {}

/// A successful parse: the payload and the input left over
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed<T> {
    pub payload: T,
    pub remaining: Input,
}

impl<T> Parsed<T> {
    pub fn new(payload: T, remaining: Input) -> Self {
        Self { payload, remaining }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Parsed<U> {
        Parsed {
            payload: f(self.payload),
            remaining: self.remaining,
        }
    }
}

/// Outcome of running a combinator
pub type ParseResult<T> = Result<Parsed<T>, ParseError>;
