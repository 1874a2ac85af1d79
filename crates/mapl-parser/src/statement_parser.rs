//! Statement grammar
//!
//! ```text
//! statement  := conditional
//!             | "let" IDENT "=" condition
//!             | target "=" condition
//! target     := "root" ("." IDENT)* | IDENT ("." IDENT)*
//! ```
//!
//! The root of a mapping also accepts `import`, `map` and `meta`
//! directives. Those belong to the enclosing language and are not parsed
//! here, but inside conditional blocks they are screened out up front so
//! the failure says why the statement was refused.

use crate::combinator::{
    identifier, keyword, literal, must_be, one_of, optional_spaces, spaces_and_tabs,
    starts_with_keyword, Input, ParseError, Parser,
};
use crate::condition_parser::path_segments;
use crate::grammar::GrammarRefs;
use mapl_core::ast::Statement;

const DIRECTIVE_KEYWORDS: &[&str] = &["import", "map", "meta"];

pub(crate) fn statement_parser(refs: &GrammarRefs, allow_directives: bool) -> Parser<Statement> {
    let conditional = refs.conditional().map(Statement::Conditional);

    let let_binding = keyword("let")
        .ignore_then(must_be(spaces_and_tabs()))
        .ignore_then(must_be(identifier()))
        .then_ignore(optional_spaces())
        .then_ignore(must_be(literal("=")))
        .then_ignore(optional_spaces())
        .then(must_be(refs.condition()))
        .map(|(name, value)| Statement::let_binding(name, value));

    let target = one_of(vec![
        keyword("root").ignore_then(path_segments()),
        identifier().then(path_segments()).map(|(head, mut tail)| {
            tail.insert(0, head);
            tail
        }),
    ]);

    let assignment = target
        .then_ignore(optional_spaces())
        .then_ignore(must_be(literal("=")))
        .then_ignore(optional_spaces())
        .then(must_be(refs.condition()))
        .map(|(target, value)| Statement::assign(target, value));

    let statement = one_of(vec![conditional, let_binding, assignment]).expected("statement");

    if allow_directives {
        return statement;
    }

    Parser::new(move |input: Input| {
        if let Some(directive) = leading_directive(input.as_str()) {
            return Err(ParseError::message(
                &input,
                format!(
                    "{} statements are not permitted inside a conditional block",
                    directive
                ),
            ));
        }
        statement.parse(input)
    })
}

fn leading_directive(text: &str) -> Option<&'static str> {
    DIRECTIVE_KEYWORDS
        .iter()
        .copied()
        .find(|word| starts_with_keyword(text, word))
}
