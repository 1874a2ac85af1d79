//! Root statement list
//!
//! ```text
//! mapping := (statement (NEWLINE statement)*)? EOF
//! ```
//!
//! Blank lines and comments may appear anywhere between statements. Unlike
//! a conditional, a mapping must consume the whole input.

use crate::combinator::{
    discard, end_of_input, newline_allow_comment, optional_spaces, sequence,
    whitespace_newline_comments, Input, Parsed, Parser,
};
use crate::grammar::GrammarRefs;
use mapl_core::ast::Mapping;

pub(crate) fn mapping_parser(refs: &GrammarRefs) -> Parser<Mapping> {
    let statement = refs.statement(true);
    let separator = discard(sequence(vec![
        optional_spaces(),
        newline_allow_comment(),
        whitespace_newline_comments(),
    ]));
    let end = whitespace_newline_comments().ignore_then(end_of_input());

    Parser::new(move |input: Input| {
        let mut statements = Vec::new();
        let mut cursor = input;

        loop {
            if let Ok(done) = end.parse(cursor.clone()) {
                return Ok(Parsed::new(Mapping::new(statements), done.remaining));
            }
            if statements.is_empty() {
                cursor = whitespace_newline_comments().parse(cursor)?.remaining;
            }

            let parsed = statement.parse(cursor)?;
            statements.push(parsed.payload);
            cursor = parsed.remaining;

            match separator.parse(cursor.clone()) {
                Ok(parsed) => cursor = parsed.remaining,
                Err(err) if err.is_hard() => return Err(err),
                Err(err) => {
                    return match end.parse(cursor) {
                        Ok(done) => Ok(Parsed::new(Mapping::new(statements), done.remaining)),
                        Err(trailing) => Err(err.merge(trailing)),
                    };
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use crate::grammar::Grammar;
    use mapl_core::ast::Statement;

    #[test]
    fn test_empty_mapping() {
        let grammar = Grammar::default();
        assert!(grammar.parse_mapping("").unwrap().statements.is_empty());
        assert!(grammar
            .parse_mapping("\n# only a comment\n\n")
            .unwrap()
            .statements
            .is_empty());
    }

    #[test]
    fn test_statements_and_conditionals() {
        let grammar = Grammar::default();
        let source = r#"
# map the user
root.id = this.id
let tier = "basic"
if this.score > 90 {
  tier = "gold"
} else if this.score > 50 {
  tier = "silver"
}
root.tier = $tier
"#;
        let mapping = grammar.parse_mapping(source).unwrap();
        assert_eq!(mapping.statements.len(), 4);
        assert!(matches!(mapping.statements[1], Statement::Let { .. }));
        assert_eq!(mapping.conditionals().len(), 1);
        assert_eq!(mapping.conditionals()[0].branches().len(), 2);
    }

    #[test]
    fn test_else_on_next_line_continues_chain() {
        let grammar = Grammar::default();
        let mapping = grammar
            .parse_mapping("if x { a = 1 }\nelse { a = 2 }\nb = 3")
            .unwrap();
        assert_eq!(mapping.statements.len(), 2);
        assert!(mapping.conditionals()[0].terminal().is_some());
    }

    #[test]
    fn test_trailing_garbage_is_rejected() {
        let grammar = Grammar::default();
        let err = grammar.parse_mapping("a = 1 b = 2").unwrap_err();
        let err = err.as_syntax().unwrap();
        assert_eq!(err.position().offset, 6);
        assert!(err.expected_tokens().contains(&"end of input".to_string()));

        assert!(grammar
            .parse_mapping("if x { a = 1 } else { } else { b = 2 }")
            .is_err());
    }

    #[test]
    fn test_directives_in_blocks_are_rejected() {
        let grammar = Grammar::default();
        let err = grammar
            .parse_mapping("if x {\n  meta foo = \"bar\"\n}")
            .unwrap_err();
        assert!(err.to_string().contains("not permitted inside a conditional block"));
    }
}
