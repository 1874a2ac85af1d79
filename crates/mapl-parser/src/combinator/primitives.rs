//! Combinator primitives
//!
//! Every combinator is a pure function from an `Input` to a `ParseResult`.
//! Soft failures mean "this did not match" and may be recovered by
//! `optional`, `one_of` and `many`; hard failures always propagate.

use super::input::Input;
use super::lexical::starts_with_keyword;
use super::result::{ParseError, ParseResult, Parsed};
use std::sync::Arc;

type ParseFn<T> = dyn Fn(Input) -> ParseResult<T> + Send + Sync;

/// A reusable, thread-safe parsing function
pub struct Parser<T> {
    run: Arc<ParseFn<T>>,
}

impl<T> Clone for Parser<T> {
    fn clone(&self) -> Self {
        Self {
            run: Arc::clone(&self.run),
        }
    }
}

impl<T> std::fmt::Debug for Parser<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parser").finish_non_exhaustive()
    }
}

impl<T: 'static> Parser<T> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Input) -> ParseResult<T> + Send + Sync + 'static,
    {
        Self { run: Arc::new(f) }
    }

    pub fn parse(&self, input: Input) -> ParseResult<T> {
        (self.run)(input)
    }

    /// Parse from the start of `source`
    pub fn parse_str(&self, source: &str) -> ParseResult<T> {
        self.parse(Input::new(source))
    }

    /// Transform the payload
    pub fn map<U, F>(self, f: F) -> Parser<U>
    where
        U: 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        Parser::new(move |input: Input| self.parse(input).map(|parsed| parsed.map(&f)))
    }

    /// Run `self` then `next`, keeping both payloads
    pub fn then<U: 'static>(self, next: Parser<U>) -> Parser<(T, U)> {
        Parser::new(move |input: Input| {
            let first = self.parse(input)?;
            let second = next.parse(first.remaining)?;
            Ok(Parsed::new(
                (first.payload, second.payload),
                second.remaining,
            ))
        })
    }

    /// Run `self` then `next`, keeping the payload of `self`
    pub fn then_ignore<U: 'static>(self, next: Parser<U>) -> Parser<T> {
        self.then(next).map(|(kept, _)| kept)
    }

    /// Run `self` then `next`, keeping the payload of `next`
    pub fn ignore_then<U: 'static>(self, next: Parser<U>) -> Parser<U> {
        self.then(next).map(|(_, kept)| kept)
    }

    /// Report a soft failure that made no progress as expecting `what`
    pub fn expected(self, what: &'static str) -> Parser<T> {
        Parser::new(move |input: Input| {
            let start = input.offset();
            self.parse(input).map_err(|err| {
                if err.is_soft() && err.offset() == start {
                    err.relabel(what)
                } else {
                    err
                }
            })
        })
    }
}

/// Match `text` exactly
pub fn literal(text: &'static str) -> Parser<&'static str> {
    Parser::new(move |input: Input| {
        if input.as_str().starts_with(text) {
            Ok(Parsed::new(text, input.advance(text.len())))
        } else {
            Err(ParseError::expected(&input, format!("'{}'", text)))
        }
    })
}

/// Match `word` when it is not followed by an identifier character, so
/// `else` does not match the start of `elsewhere`
pub fn keyword(word: &'static str) -> Parser<&'static str> {
    Parser::new(move |input: Input| {
        if starts_with_keyword(input.as_str(), word) {
            Ok(Parsed::new(word, input.advance(word.len())))
        } else {
            Err(ParseError::expected(&input, format!("'{}'", word)))
        }
    })
}

/// Run each parser in order, collecting the payloads. The first failure
/// is returned unchanged.
pub fn sequence<T: 'static>(parsers: Vec<Parser<T>>) -> Parser<Vec<T>> {
    Parser::new(move |input: Input| {
        let mut payloads = Vec::with_capacity(parsers.len());
        let mut cursor = input;
        for parser in &parsers {
            let parsed = parser.parse(cursor)?;
            payloads.push(parsed.payload);
            cursor = parsed.remaining;
        }
        Ok(Parsed::new(payloads, cursor))
    })
}

/// `None` without consuming anything when `parser` fails softly. Hard
/// failures are never swallowed.
pub fn optional<T: 'static>(parser: Parser<T>) -> Parser<Option<T>> {
    Parser::new(move |input: Input| match parser.parse(input.clone()) {
        Ok(parsed) => Ok(parsed.map(Some)),
        Err(err) if err.is_hard() => Err(err),
        Err(_) => Ok(Parsed::new(None, input)),
    })
}

/// Drop the payload
pub fn discard<T: 'static>(parser: Parser<T>) -> Parser<()> {
    parser.map(|_| ())
}

/// Promote any failure of `parser` to a hard failure
pub fn must_be<T: 'static>(parser: Parser<T>) -> Parser<T> {
    Parser::new(move |input: Input| parser.parse(input).map_err(ParseError::into_hard))
}

/// Ordered choice. The first success wins; a hard failure stops the
/// search; soft failures are merged so the error names every alternative.
pub fn one_of<T: 'static>(alternatives: Vec<Parser<T>>) -> Parser<T> {
    Parser::new(move |input: Input| {
        let mut failure: Option<ParseError> = None;
        for alternative in &alternatives {
            match alternative.parse(input.clone()) {
                Ok(parsed) => return Ok(parsed),
                Err(err) if err.is_hard() => return Err(err),
                Err(err) => {
                    failure = Some(match failure {
                        Some(previous) => previous.merge(err),
                        None => err,
                    })
                }
            }
        }
        Err(failure.unwrap_or_else(|| ParseError::expected(&input, "an alternative")))
    })
}

/// Zero or more repetitions, stopping at the first soft failure or at a
/// repetition that consumed nothing
pub fn many<T: 'static>(parser: Parser<T>) -> Parser<Vec<T>> {
    Parser::new(move |input: Input| {
        let mut items = Vec::new();
        let mut cursor = input;
        loop {
            match parser.parse(cursor.clone()) {
                Ok(parsed) => {
                    let progressed = parsed.remaining.offset() > cursor.offset();
                    items.push(parsed.payload);
                    cursor = parsed.remaining;
                    if !progressed {
                        break;
                    }
                }
                Err(err) if err.is_hard() => return Err(err),
                Err(_) => break,
            }
        }
        Ok(Parsed::new(items, cursor))
    })
}

/// `open`, then zero or more `element`s separated by `separator`, then
/// `close`.
///
/// Once `open` has matched the pattern is committed: if neither an element
/// (or separator) nor `close` matches, the failure is hard. A separator
/// directly before `close` is accepted.
pub fn delimited_pattern<O, T, S, C>(
    open: Parser<O>,
    element: Parser<T>,
    separator: Parser<S>,
    close: Parser<C>,
) -> Parser<Vec<T>>
where
    O: 'static,
    T: 'static,
    S: 'static,
    C: 'static,
{
    Parser::new(move |input: Input| {
        let mut cursor = open.parse(input)?.remaining;
        let mut items = Vec::new();
        loop {
            match element.parse(cursor.clone()) {
                Ok(parsed) => {
                    items.push(parsed.payload);
                    cursor = parsed.remaining;
                }
                Err(err) if err.is_hard() => return Err(err),
                Err(err) => return close_or_fail(&close, cursor, items, err),
            }
            match separator.parse(cursor.clone()) {
                Ok(parsed) => cursor = parsed.remaining,
                Err(err) if err.is_hard() => return Err(err),
                Err(err) => return close_or_fail(&close, cursor, items, err),
            }
        }
    })
}

fn close_or_fail<C: 'static, T>(
    close: &Parser<C>,
    cursor: Input,
    items: Vec<T>,
    cause: ParseError,
) -> ParseResult<Vec<T>> {
    match close.parse(cursor) {
        Ok(closed) => Ok(Parsed::new(items, closed.remaining)),
        Err(err) => Err(cause.merge(err).into_hard()),
    }
}

/// Run `parser` one nesting level deeper, failing hard once the input is
/// already `max_depth` levels deep
pub fn nested<T: 'static>(parser: Parser<T>, max_depth: usize) -> Parser<T> {
    Parser::new(move |input: Input| {
        if input.depth() >= max_depth {
            log::warn!(
                "Rejecting input nested deeper than {} levels at {}",
                max_depth,
                input.position()
            );
            return Err(ParseError::message(
                &input,
                format!("nesting exceeds the maximum depth of {}", max_depth),
            )
            .into_hard());
        }
        let parsed = parser.parse(input.descend())?;
        let remaining = parsed.remaining.ascend();
        Ok(Parsed::new(parsed.payload, remaining))
    })
}

/// Succeeds only when no input is left
pub fn end_of_input() -> Parser<()> {
    Parser::new(|input: Input| {
        if input.is_empty() {
            Ok(Parsed::new((), input))
        } else {
            Err(ParseError::expected(&input, "end of input"))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combinator::result::Severity;

    fn fails_hard(what: &'static str) -> Parser<&'static str> {
        must_be(literal(what))
    }

    #[test]
    fn test_literal() {
        let parsed = literal("if").parse_str("if x").unwrap();
        assert_eq!(parsed.payload, "if");
        assert_eq!(parsed.remaining.as_str(), " x");

        let err = literal("if").parse_str("else").unwrap_err();
        assert_eq!(err.severity(), Severity::Soft);
        assert_eq!(err.expected_tokens(), ["'if'".to_string()]);
    }

    #[test]
    fn test_keyword_respects_word_boundary() {
        assert!(keyword("else").parse_str("else {").is_ok());
        assert!(keyword("else").parse_str("else").is_ok());
        assert!(keyword("else").parse_str("else{").is_ok());
        assert!(keyword("else").parse_str("elsewhere").is_err());
        assert!(keyword("if").parse_str("if_flag").is_err());
    }

    #[test]
    fn test_then_threads_remaining() {
        let parser = literal("a").then(literal("b"));
        let parsed = parser.parse_str("abc").unwrap();
        assert_eq!(parsed.payload, ("a", "b"));
        assert_eq!(parsed.remaining.as_str(), "c");
    }

    #[test]
    fn test_sequence_stops_at_first_failure() {
        let parser = sequence(vec![literal("a"), literal("b"), literal("c")]);
        assert_eq!(parser.parse_str("abc").unwrap().payload, vec!["a", "b", "c"]);

        let err = parser.parse_str("abx").unwrap_err();
        assert_eq!(err.position().offset, 2);
        assert!(err.is_soft());
    }

    #[test]
    fn test_sequence_propagates_hard() {
        let parser = sequence(vec![literal("a"), fails_hard("b")]);
        assert!(parser.parse_str("ax").unwrap_err().is_hard());
    }

    #[test]
    fn test_optional_soft_is_none_without_consuming() {
        let parsed = optional(literal("x")).parse_str("abc").unwrap();
        assert_eq!(parsed.payload, None);
        assert_eq!(parsed.remaining.offset(), 0);
    }

    #[test]
    fn test_optional_never_swallows_hard() {
        let parser = optional(literal("a").then(fails_hard("b")));
        let err = parser.parse_str("ax").unwrap_err();
        assert!(err.is_hard());
        assert_eq!(err.position().offset, 1);
    }

    #[test]
    fn test_discard() {
        let parsed = discard(literal("abc")).parse_str("abcd").unwrap();
        assert_eq!(parsed.remaining.as_str(), "d");
    }

    #[test]
    fn test_must_be_upgrades_soft() {
        let err = must_be(literal("a")).parse_str("b").unwrap_err();
        assert_eq!(err.severity(), Severity::Hard);
        assert!(must_be(literal("a")).parse_str("a").is_ok());
    }

    #[test]
    fn test_one_of_merges_soft_failures() {
        let parser = one_of(vec![literal("a"), literal("b")]);
        assert_eq!(parser.parse_str("b").unwrap().payload, "b");

        let err = parser.parse_str("c").unwrap_err();
        assert_eq!(err.expected_tokens(), ["'a'".to_string(), "'b'".to_string()]);
    }

    #[test]
    fn test_one_of_stops_at_hard() {
        let parser = one_of(vec![literal("a").then_ignore(fails_hard("b")), literal("ac")]);
        assert!(parser.parse_str("ac").unwrap_err().is_hard());
    }

    #[test]
    fn test_many() {
        let parsed = many(literal("ab")).parse_str("ababx").unwrap();
        assert_eq!(parsed.payload.len(), 2);
        assert_eq!(parsed.remaining.as_str(), "x");

        let parsed = many(literal("ab")).parse_str("x").unwrap();
        assert!(parsed.payload.is_empty());
    }

    #[test]
    fn test_many_stops_on_empty_match() {
        let parsed = many(optional(literal("a"))).parse_str("b").unwrap();
        assert_eq!(parsed.payload, vec![None]);
    }

    fn list() -> Parser<Vec<&'static str>> {
        delimited_pattern(literal("["), literal("x"), literal(","), literal("]"))
    }

    #[test]
    fn test_delimited_pattern() {
        assert_eq!(list().parse_str("[]").unwrap().payload.len(), 0);
        assert_eq!(list().parse_str("[x]").unwrap().payload, vec!["x"]);
        assert_eq!(list().parse_str("[x,x,x]").unwrap().payload.len(), 3);
        assert_eq!(list().parse_str("[x,]").unwrap().payload.len(), 1);
    }

    #[test]
    fn test_delimited_pattern_open_failure_is_soft() {
        assert!(list().parse_str("x]").unwrap_err().is_soft());
    }

    #[test]
    fn test_delimited_pattern_missing_close_is_hard() {
        let err = list().parse_str("[x").unwrap_err();
        assert!(err.is_hard());
        assert_eq!(err.position().offset, 2);
        assert_eq!(err.expected_tokens(), ["','".to_string(), "']'".to_string()]);

        assert!(list().parse_str("[").unwrap_err().is_hard());
        assert!(list().parse_str("[x x]").unwrap_err().is_hard());
    }

    #[test]
    fn test_nested_limits_depth() {
        let parser = nested(literal("a"), 1);
        let parsed = parser.parse_str("a").unwrap();
        assert_eq!(parsed.remaining.depth(), 0);

        let deep = Input::new("a").descend();
        let err = parser.parse(deep).unwrap_err();
        assert!(err.is_hard());
        assert!(err.to_string().contains("maximum depth of 1"));
    }

    #[test]
    fn test_expected_relabels_only_without_progress() {
        let parser = literal("a").then(literal("b")).expected("pair");
        let err = parser.parse_str("x").unwrap_err();
        assert_eq!(err.expected_tokens(), ["pair".to_string()]);

        let err = parser.parse_str("ax").unwrap_err();
        assert_eq!(err.expected_tokens(), ["'b'".to_string()]);
    }

    #[test]
    fn test_end_of_input() {
        assert!(end_of_input().parse_str("").is_ok());
        assert!(end_of_input().parse_str(" ").is_err());
    }
}
