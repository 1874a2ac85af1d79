//! Conditional chain AST nodes
//!
//! A `ConditionalChain` is the value produced by one `if ... else if ...
//! else ...` construct. Branches are kept in source order and an evaluator
//! must run only the body of the first branch whose condition holds, or the
//! terminal (`else`) branch when none do.
//!
//! The chain is never empty, its first branch always carries a condition,
//! and a terminal branch, if any, is the last one. The parser guarantees
//! this through `ChainBuilder`; deserialization re-checks it.

use super::expression::Expression;
use super::statement::Statement;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One condition-guarded (or terminal) block of a chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    /// `None` for the terminal `else` branch
    pub condition: Option<Expression>,
    pub body: Vec<Statement>,
}

impl Branch {
    /// Create a guarded branch
    pub fn guarded(condition: Expression, body: Vec<Statement>) -> Self {
        Self {
            condition: Some(condition),
            body,
        }
    }

    /// Create a terminal branch
    pub fn terminal(body: Vec<Statement>) -> Self {
        Self {
            condition: None,
            body,
        }
    }

    /// Returns true for the `else` branch
    pub fn is_terminal(&self) -> bool {
        self.condition.is_none()
    }
}

/// Ordered branches of an `if` / `else if` / `else` construct
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Branch>", into = "Vec<Branch>")]
pub struct ConditionalChain {
    branches: Vec<Branch>,
}

impl ConditionalChain {
    /// Start a chain from its `if` head
    pub fn builder(condition: Expression, body: Vec<Statement>) -> ChainBuilder {
        ChainBuilder {
            branches: vec![Branch::guarded(condition, body)],
        }
    }

    /// All branches in evaluation order
    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    /// Body of the terminal `else` branch, if the chain has one
    pub fn terminal(&self) -> Option<&[Statement]> {
        self.branches
            .last()
            .filter(|branch| branch.is_terminal())
            .map(|branch| branch.body.as_slice())
    }

    /// Pick the branch to execute.
    ///
    /// Conditions are tested strictly in order and testing stops at the
    /// first one `test` reports true. When none hold the terminal branch is
    /// returned, or `None` if the chain has no `else`. Errors from `test`
    /// abort the selection.
    pub fn select<E, F>(&self, mut test: F) -> Result<Option<&Branch>, E>
    where
        F: FnMut(&Expression) -> Result<bool, E>,
    {
        for branch in &self.branches {
            match &branch.condition {
                Some(condition) => {
                    if test(condition)? {
                        return Ok(Some(branch));
                    }
                }
                None => return Ok(Some(branch)),
            }
        }
        Ok(None)
    }
}

impl TryFrom<Vec<Branch>> for ConditionalChain {
    type Error = CoreError;

    fn try_from(branches: Vec<Branch>) -> Result<Self, Self::Error> {
        match branches.first() {
            None => {
                return Err(CoreError::InvalidChain(
                    "a chain needs at least one branch".to_string(),
                ))
            }
            Some(first) if first.is_terminal() => {
                return Err(CoreError::InvalidChain(
                    "the first branch must carry a condition".to_string(),
                ))
            }
            Some(_) => {}
        }

        let last = branches.len() - 1;
        if let Some(index) = branches[..last].iter().position(Branch::is_terminal) {
            return Err(CoreError::InvalidChain(format!(
                "terminal branch at position {} is not the last branch",
                index
            )));
        }

        Ok(Self { branches })
    }
}

impl From<ConditionalChain> for Vec<Branch> {
    fn from(chain: ConditionalChain) -> Self {
        chain.branches
    }
}

/// Assembles a `ConditionalChain` in source order.
///
/// `build_with_else` consumes the builder, so a chain can gain at most one
/// terminal branch and nothing can follow it.
#[derive(Debug, Clone)]
pub struct ChainBuilder {
    branches: Vec<Branch>,
}

impl ChainBuilder {
    /// Append an `else if` branch
    pub fn else_if(&mut self, condition: Expression, body: Vec<Statement>) -> &mut Self {
        self.branches.push(Branch::guarded(condition, body));
        self
    }

    /// Finish without a terminal branch
    pub fn build(self) -> ConditionalChain {
        ConditionalChain {
            branches: self.branches,
        }
    }

    /// Finish with a terminal `else` branch
    pub fn build_with_else(mut self, body: Vec<Statement>) -> ConditionalChain {
        self.branches.push(Branch::terminal(body));
        ConditionalChain {
            branches: self.branches,
        }
    }
}

fn fmt_body(f: &mut fmt::Formatter<'_>, body: &[Statement]) -> fmt::Result {
    write!(f, "{{ ")?;
    for (i, statement) in body.iter().enumerate() {
        if i > 0 {
            writeln!(f)?;
        }
        write!(f, "{}", statement)?;
    }
    if !body.is_empty() {
        write!(f, " ")?;
    }
    write!(f, "}}")
}

impl fmt::Display for ConditionalChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, branch) in self.branches.iter().enumerate() {
            match (&branch.condition, i) {
                (Some(condition), 0) => write!(f, "if {} ", condition)?,
                (Some(condition), _) => write!(f, " else if {} ", condition)?,
                (None, _) => write!(f, " else ")?,
            }
            fmt_body(f, &branch.body)?;
        }
        Ok(())
    }
}
