//! Statement AST nodes
//!
//! Statements are the field-mapping operations that make up a mapping and
//! the bodies of conditional branches.

use super::conditional::ConditionalChain;
use super::expression::Expression;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Statement AST node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    /// Assign a value to a path of the output document. An empty target is
    /// the document root.
    Assignment {
        target: Vec<String>,
        value: Expression,
    },

    /// Bind a variable (`let name = value`)
    Let { name: String, value: Expression },

    /// Nested `if` / `else if` / `else` chain
    Conditional(ConditionalChain),
}

impl Statement {
    /// Create an assignment statement
    pub fn assign(target: Vec<String>, value: Expression) -> Self {
        Statement::Assignment { target, value }
    }

    /// Create a variable binding statement
    pub fn let_binding(name: String, value: Expression) -> Self {
        Statement::Let { name, value }
    }

    /// Returns the chain if this statement is a conditional
    pub fn as_conditional(&self) -> Option<&ConditionalChain> {
        match self {
            Statement::Conditional(chain) => Some(chain),
            _ => None,
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Assignment { target, value } if target.is_empty() => {
                write!(f, "root = {}", value)
            }
            Statement::Assignment { target, value } => {
                write!(f, "{} = {}", target.join("."), value)
            }
            Statement::Let { name, value } => write!(f, "let {} = {}", name, value),
            Statement::Conditional(chain) => write!(f, "{}", chain),
        }
    }
}

/// A parsed mapping: the top-level statement list
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Mapping {
    pub statements: Vec<Statement>,
}

impl Mapping {
    /// Create a mapping from its statements
    pub fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }

    /// Iterate over every conditional chain, including nested ones, in
    /// source order
    pub fn conditionals(&self) -> Vec<&ConditionalChain> {
        let mut found = Vec::new();
        collect_conditionals(&self.statements, &mut found);
        found
    }
}

fn collect_conditionals<'a>(statements: &'a [Statement], found: &mut Vec<&'a ConditionalChain>) {
    for statement in statements {
        if let Statement::Conditional(chain) = statement {
            found.push(chain);
            for branch in chain.branches() {
                collect_conditionals(&branch.body, found);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Value;

    #[test]
    fn test_display_assignment() {
        let stmt = Statement::assign(
            vec!["a".to_string(), "b".to_string()],
            Expression::literal(Value::Number(1.0)),
        );
        assert_eq!(stmt.to_string(), "a.b = 1");
    }

    #[test]
    fn test_display_root_assignment() {
        let stmt = Statement::assign(vec![], Expression::FieldAccess(vec![]));
        assert_eq!(stmt.to_string(), "root = this");
    }

    #[test]
    fn test_display_let() {
        let stmt = Statement::let_binding("n".to_string(), Expression::field("count"));
        assert_eq!(stmt.to_string(), "let n = count");
    }

    #[test]
    fn test_mapping_conditionals_walks_nested_chains() {
        let inner = ConditionalChain::builder(Expression::field("y"), vec![]).build();
        let outer = ConditionalChain::builder(
            Expression::field("x"),
            vec![Statement::Conditional(inner.clone())],
        )
        .build();
        let mapping = Mapping::new(vec![
            Statement::assign(vec!["a".to_string()], Expression::field("b")),
            Statement::Conditional(outer.clone()),
        ]);

        assert_eq!(mapping.conditionals(), vec![&outer, &inner]);
    }
}
