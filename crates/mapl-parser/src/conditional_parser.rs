//! Conditional chain grammar
//!
//! ```text
//! conditional := "if" SPACES condition block
//!                ("else if" SPACES condition block)*
//!                ("else" block)?
//! block       := "{" (statement (NEWLINE statement)*)? "}"
//! ```
//!
//! Whitespace, blank lines and `#` comments are insignificant between a
//! head and its block and between blocks. The `if` and `else if` keywords
//! commit the parse: a missing or malformed condition or block after them
//! is a hard error. The `else` keyword commits to its block the same way.
//! Statements inside a block are parsed with directives disallowed.

use crate::combinator::{
    delimited_pattern, discard, end_of_input, keyword, literal, must_be, nested,
    newline_allow_comment, one_of, optional, optional_spaces, sequence, spaces_and_tabs,
    whitespace_newline_comments, Input, Parsed, Parser,
};
use crate::grammar::GrammarRefs;
use mapl_core::ast::{ConditionalChain, Expression, Statement};

/// A parsed `if` or `else if` head with its block
struct GuardedBlock {
    condition: Expression,
    body: Vec<Statement>,
}

/// `{`, newline separated statements, `}`
fn block_pattern(refs: &GrammarRefs) -> Parser<Vec<Statement>> {
    let element = nested(refs.statement(false), refs.config().max_nesting_depth);
    delimited_pattern(
        literal("{").then_ignore(whitespace_newline_comments()),
        element,
        discard(sequence(vec![
            optional_spaces(),
            newline_allow_comment(),
            whitespace_newline_comments(),
        ])),
        whitespace_newline_comments().ignore_then(literal("}")),
    )
}

/// Spaces or tabs between a head keyword and its condition. The gap may be
/// empty only at the end of input, where the missing condition is reported.
fn condition_gap() -> Parser<()> {
    must_be(one_of(vec![spaces_and_tabs(), end_of_input()]).expected("whitespace"))
}

fn guarded_block(
    head: Parser<&'static str>,
    condition: Parser<Expression>,
    block: Parser<Vec<Statement>>,
) -> Parser<GuardedBlock> {
    head.ignore_then(condition_gap())
        .ignore_then(must_be(condition))
        .then_ignore(whitespace_newline_comments())
        .then(must_be(block))
        .map(|(condition, body)| GuardedBlock { condition, body })
}

fn else_if_keyword() -> Parser<&'static str> {
    keyword("else")
        .then_ignore(spaces_and_tabs())
        .then_ignore(keyword("if"))
        .map(|_| "else if")
}

pub(crate) fn conditional_parser(refs: &GrammarRefs) -> Parser<ConditionalChain> {
    let block = block_pattern(refs);

    let if_head = guarded_block(keyword("if"), refs.condition(), block.clone());

    let else_if_head = optional(
        whitespace_newline_comments()
            .ignore_then(guarded_block(else_if_keyword(), refs.condition(), block.clone())),
    );

    let else_tail = optional(
        whitespace_newline_comments()
            .ignore_then(keyword("else"))
            .ignore_then(whitespace_newline_comments())
            .ignore_then(must_be(block)),
    );

    Parser::new(move |input: Input| {
        let head = if_head.parse(input)?;
        let mut chain = ConditionalChain::builder(head.payload.condition, head.payload.body);
        let mut cursor = head.remaining;

        loop {
            let next = else_if_head.parse(cursor)?;
            cursor = next.remaining;
            match next.payload {
                Some(branch) => {
                    log::trace!("Parsed else-if branch at {}", cursor.position());
                    chain.else_if(branch.condition, branch.body);
                }
                None => break,
            }
        }

        let tail = else_tail.parse(cursor)?;
        let chain = match tail.payload {
            Some(body) => chain.build_with_else(body),
            None => chain.build(),
        };
        Ok(Parsed::new(chain, tail.remaining))
    })
}
