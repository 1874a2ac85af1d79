//! Lexical leaf combinators: whitespace, comments, identifiers and literals
//!
//! Comments start with `#` and run to the end of the line.

use super::input::Input;
use super::primitives::Parser;
use super::result::{ParseError, Parsed};

pub(crate) fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// True when `text` starts with `word` and the word is not the prefix of a
/// longer identifier
pub(crate) fn starts_with_keyword(text: &str, word: &str) -> bool {
    text.starts_with(word)
        && !text[word.len()..]
            .chars()
            .next()
            .is_some_and(is_identifier_char)
}

fn scan(text: &str, pred: impl Fn(char) -> bool) -> usize {
    text.char_indices()
        .find(|(_, c)| !pred(*c))
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

fn is_space_or_tab(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// One or more spaces or tabs
pub fn spaces_and_tabs() -> Parser<()> {
    Parser::new(|input: Input| match scan(input.as_str(), is_space_or_tab) {
        0 => Err(ParseError::expected(&input, "whitespace")),
        len => Ok(Parsed::new((), input.advance(len))),
    })
}

/// Zero or more spaces or tabs
pub fn optional_spaces() -> Parser<()> {
    Parser::new(|input: Input| {
        let len = scan(input.as_str(), is_space_or_tab);
        Ok(Parsed::new((), input.advance(len)))
    })
}

/// Any run of spaces, tabs, line breaks and comments, including none
pub fn whitespace_newline_comments() -> Parser<()> {
    Parser::new(|input: Input| {
        let text = input.as_str();
        let mut pos = 0;
        loop {
            let rest = &text[pos..];
            let blank = scan(rest, char::is_whitespace);
            if blank > 0 {
                pos += blank;
            } else if rest.starts_with('#') {
                pos += rest.find('\n').unwrap_or(rest.len());
            } else {
                break;
            }
        }
        Ok(Parsed::new((), input.advance(pos)))
    })
}

/// A line break, optionally preceded by spaces and a comment
pub fn newline_allow_comment() -> Parser<()> {
    Parser::new(|input: Input| {
        let text = input.as_str();
        let mut pos = scan(text, is_space_or_tab);
        if text[pos..].starts_with('#') {
            pos += text[pos..].find('\n').unwrap_or(text.len() - pos);
        }
        let rest = &text[pos..];
        if rest.starts_with('\n') {
            Ok(Parsed::new((), input.advance(pos + 1)))
        } else if rest.starts_with("\r\n") {
            Ok(Parsed::new((), input.advance(pos + 2)))
        } else {
            Err(ParseError::expected(&input.advance(pos), "newline"))
        }
    })
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub fn identifier() -> Parser<String> {
    Parser::new(|input: Input| {
        let text = input.as_str();
        match text.chars().next() {
            Some(c) if is_identifier_start(c) => {
                let len = scan(text, is_identifier_char);
                Ok(Parsed::new(text[..len].to_string(), input.advance(len)))
            }
            _ => Err(ParseError::expected(&input, "identifier")),
        }
    })
}

/// Digits with an optional fractional part. Signs are handled by the
/// unary operators of the condition grammar.
pub fn number() -> Parser<f64> {
    Parser::new(|input: Input| {
        let text = input.as_str();
        let mut len = scan(text, |c| c.is_ascii_digit());
        if len == 0 {
            return Err(ParseError::expected(&input, "number"));
        }
        if text[len..].starts_with('.') {
            let fraction = scan(&text[len + 1..], |c| c.is_ascii_digit());
            if fraction > 0 {
                len += 1 + fraction;
            }
        }
        match text[..len].parse::<f64>() {
            Ok(value) => Ok(Parsed::new(value, input.advance(len))),
            Err(_) => Err(ParseError::expected(&input, "number")),
        }
    })
}

/// A double-quoted string with `\"`, `\\`, `\n`, `\r` and `\t` escapes.
/// Once the opening quote has matched, a malformed string is a hard
/// failure.
pub fn quoted_string() -> Parser<String> {
    Parser::new(|input: Input| {
        let text = input.as_str();
        if !text.starts_with('"') {
            return Err(ParseError::expected(&input, "string"));
        }
        let mut value = String::new();
        let mut chars = text.char_indices().skip(1);
        while let Some((i, c)) = chars.next() {
            match c {
                '"' => return Ok(Parsed::new(value, input.advance(i + 1))),
                '\\' => match chars.next() {
                    Some((_, '"')) => value.push('"'),
                    Some((_, '\\')) => value.push('\\'),
                    Some((_, 'n')) => value.push('\n'),
                    Some((_, 'r')) => value.push('\r'),
                    Some((_, 't')) => value.push('\t'),
                    Some((j, other)) => {
                        return Err(ParseError::message(
                            &input.advance(j),
                            format!("unknown escape sequence '\\{}'", other),
                        )
                        .into_hard())
                    }
                    None => break,
                },
                '\n' => break,
                _ => value.push(c),
            }
        }
        Err(ParseError::message(&input, "unterminated string literal").into_hard())
    })
}
