//! Condition grammar
//!
//! Conditions are the expressions tested by `if` and `else if` heads and
//! assigned by statements. Binary operators bind in this order, loosest
//! first:
//!
//! | Level | Operators                  |
//! |-------|----------------------------|
//! | 1     | `\|\|`                     |
//! | 2     | `&&`                       |
//! | 3     | `==` `!=` `>=` `<=` `>` `<` |
//! | 4     | `+` `-`                    |
//! | 5     | `*` `/` `%`                |
//! | 6     | unary `!` `-`              |
//!
//! All binary levels are left associative. Operators and their operands
//! must share a line; a condition never spans a line break outside of
//! parentheses or call arguments.

use crate::combinator::{
    delimited_pattern, discard, identifier, keyword, literal, many, must_be, nested, number,
    one_of, optional, optional_spaces, quoted_string, sequence, whitespace_newline_comments,
    Input, ParseError, Parsed, Parser,
};
use crate::grammar::GrammarRefs;
use mapl_core::ast::{Expression, Operator, UnaryOperator};
use mapl_core::Value;

pub(crate) fn condition_parser(refs: &GrammarRefs) -> Parser<Expression> {
    let max_depth = refs.config().max_expression_depth;
    let primary = primary_parser(refs);
    let measured = Parser::new(move |input: Input| {
        let parsed = primary.parse(input.clone())?;
        let depth = parsed.payload.depth();
        if depth > max_depth {
            return Err(too_deep(&input, max_depth));
        }
        Ok(parsed.map(|expr| Measured { expr, depth }))
    });
    let unary = unary_parser(measured, max_depth);
    (1..=Operator::MAX_PRECEDENCE)
        .rev()
        .fold(unary, |operand, precedence| {
            binary_level(operand, precedence, max_depth)
        })
        .map(|measured| measured.expr)
        .expected("condition")
}

/// An expression and the height of its tree
struct Measured {
    expr: Expression,
    depth: usize,
}

fn too_deep(input: &Input, max_depth: usize) -> ParseError {
    log::warn!(
        "Rejecting expression deeper than {} levels at {}",
        max_depth,
        input.position()
    );
    ParseError::message(
        input,
        format!("expression nesting exceeds the maximum depth of {}", max_depth),
    )
    .into_hard()
}

fn operator_parser(precedence: u8) -> Parser<Operator> {
    let mut operators: Vec<Operator> = Operator::ALL
        .into_iter()
        .filter(|op| op.precedence() == precedence)
        .collect();
    // `>=` must be tried before `>`
    operators.sort_by_key(|op| std::cmp::Reverse(op.symbol().len()));
    one_of(
        operators
            .into_iter()
            .map(|op| literal(op.symbol()).map(move |_| op))
            .collect(),
    )
}

/// `operand (op operand)*`, folded to the left
fn binary_level(operand: Parser<Measured>, precedence: u8, max_depth: usize) -> Parser<Measured> {
    let step = optional_spaces()
        .ignore_then(operator_parser(precedence))
        .then_ignore(optional_spaces())
        .then(must_be(operand.clone()));

    Parser::new(move |input: Input| {
        let first = operand.parse(input)?;
        let mut left = first.payload;
        let mut cursor = first.remaining;
        loop {
            let next = match step.parse(cursor.clone()) {
                Ok(next) => next,
                Err(err) if err.is_soft() => return Ok(Parsed::new(left, cursor)),
                Err(err) => return Err(err),
            };
            let (op, right) = next.payload;
            let depth = left.depth.max(right.depth) + 1;
            if depth > max_depth {
                return Err(too_deep(&cursor, max_depth));
            }
            left = Measured {
                expr: Expression::binary(left.expr, op, right.expr),
                depth,
            };
            cursor = next.remaining;
        }
    })
}

fn unary_parser(primary: Parser<Measured>, max_depth: usize) -> Parser<Measured> {
    let prefix = one_of(vec![
        literal("!").map(|_| UnaryOperator::Not),
        literal("-").map(|_| UnaryOperator::Negate),
    ])
    .then_ignore(optional_spaces());
    let prefixes = many(prefix);
    let committed = must_be(primary.clone());

    Parser::new(move |input: Input| {
        let ops = prefixes.parse(input.clone())?;
        if ops.payload.is_empty() {
            return primary.parse(ops.remaining);
        }
        let operand = committed.parse(ops.remaining)?;
        let mut measured = operand.payload;
        for op in ops.payload.into_iter().rev() {
            let expr = apply_unary(measured.expr, op);
            let depth = if matches!(expr, Expression::Unary { .. }) {
                measured.depth + 1
            } else {
                measured.depth
            };
            if depth > max_depth {
                return Err(too_deep(&input, max_depth));
            }
            measured = Measured { expr, depth };
        }
        Ok(Parsed::new(measured, operand.remaining))
    })
}

fn apply_unary(operand: Expression, op: UnaryOperator) -> Expression {
    match (op, operand) {
        (UnaryOperator::Negate, Expression::Literal(Value::Number(n))) => {
            Expression::literal(Value::Number(-n))
        }
        (op, operand) => Expression::unary(op, operand),
    }
}

fn primary_parser(refs: &GrammarRefs) -> Parser<Expression> {
    let max_depth = refs.config().max_nesting_depth;

    let constant = one_of(vec![
        keyword("true").map(|_| Value::Bool(true)),
        keyword("false").map(|_| Value::Bool(false)),
        keyword("null").map(|_| Value::Null),
        number().map(Value::Number),
        quoted_string().map(Value::String),
    ])
    .map(Expression::literal);

    let group = literal("(").ignore_then(nested(
        whitespace_newline_comments()
            .ignore_then(must_be(refs.condition()))
            .then_ignore(whitespace_newline_comments())
            .then_ignore(must_be(literal(")"))),
        max_depth,
    ));

    let variable = literal("$")
        .ignore_then(must_be(identifier()))
        .map(Expression::Variable);

    let metadata = literal("@")
        .ignore_then(optional(identifier()))
        .map(|key| Expression::Metadata(key.unwrap_or_default()));

    let this_path = keyword("this")
        .ignore_then(path_segments())
        .map(Expression::field_access);

    let call = identifier()
        .then(delimited_pattern(
            literal("(").then_ignore(whitespace_newline_comments()),
            nested(refs.condition(), max_depth),
            discard(sequence(vec![
                whitespace_newline_comments(),
                discard(literal(",")),
                whitespace_newline_comments(),
            ])),
            whitespace_newline_comments().ignore_then(literal(")")),
        ))
        .map(|(name, args)| Expression::function_call(name, args));

    let path = identifier()
        .then(path_segments())
        .map(|(head, mut tail)| {
            tail.insert(0, head);
            Expression::field_access(tail)
        });

    one_of(vec![constant, group, variable, metadata, this_path, call, path])
}

/// Zero or more `.identifier` segments
pub(crate) fn path_segments() -> Parser<Vec<String>> {
    many(literal(".").ignore_then(must_be(identifier())))
}
