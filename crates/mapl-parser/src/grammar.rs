//! Grammar context
//!
//! The condition, statement and conditional grammars refer to each other:
//! a block contains statements, a statement may be a conditional, and a
//! condition may contain parenthesised conditions. `Grammar::new` wires
//! these references once with `Arc::new_cyclic`. Each grammar builder gets
//! a `GrammarRefs` whose deferred parsers hold a `Weak` handle to the
//! registry and look the entry point up when they run, so construction has
//! no ordering problem and the registry owns no cycle.
//!
//! After construction a `Grammar` is read-only. It is `Send + Sync` and can
//! parse independent inputs from many threads at once.

use crate::combinator::{Input, ParseError, Parsed, Parser};
use crate::condition_parser::condition_parser;
use crate::conditional_parser::conditional_parser;
use crate::config::ParserConfig;
use crate::error::{GrammarError, Result};
use crate::mapping_parser::mapping_parser;
use crate::statement_parser::statement_parser;
use mapl_core::ast::{ConditionalChain, Expression, Mapping, Statement};
use std::sync::{Arc, Weak};

#[derive(Debug)]
struct Registry {
    config: ParserConfig,
    condition: Parser<Expression>,
    statement: Parser<Statement>,
    block_statement: Parser<Statement>,
    conditional: Parser<ConditionalChain>,
    mapping: Parser<Mapping>,
}

impl Registry {
    fn condition(&self) -> &Parser<Expression> {
        &self.condition
    }

    fn statement(&self) -> &Parser<Statement> {
        &self.statement
    }

    fn block_statement(&self) -> &Parser<Statement> {
        &self.block_statement
    }

    fn conditional(&self) -> &Parser<ConditionalChain> {
        &self.conditional
    }
}

/// Handles to the registry entry points, used while building grammars
#[derive(Clone)]
pub(crate) struct GrammarRefs {
    registry: Weak<Registry>,
    config: ParserConfig,
}

impl GrammarRefs {
    pub(crate) fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub(crate) fn condition(&self) -> Parser<Expression> {
        self.deferred(Registry::condition)
    }

    /// The statement grammar; `allow_directives = false` is the variant used
    /// inside conditional blocks
    pub(crate) fn statement(&self, allow_directives: bool) -> Parser<Statement> {
        if allow_directives {
            self.deferred(Registry::statement)
        } else {
            self.deferred(Registry::block_statement)
        }
    }

    pub(crate) fn conditional(&self) -> Parser<ConditionalChain> {
        self.deferred(Registry::conditional)
    }

    fn deferred<T: 'static>(&self, entry: fn(&Registry) -> &Parser<T>) -> Parser<T> {
        let registry = self.registry.clone();
        Parser::new(move |input: Input| match registry.upgrade() {
            Some(registry) => entry(&registry).parse(input),
            None => Err(ParseError::message(&input, "grammar context has been dropped").into_hard()),
        })
    }
}

/// A constructed set of mapl grammars sharing one configuration
#[derive(Debug, Clone)]
pub struct Grammar {
    registry: Arc<Registry>,
}

impl Grammar {
    /// Build the grammars after validating `config`
    pub fn new(config: ParserConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: ParserConfig) -> Self {
        log::debug!(
            "Building grammar (max_nesting_depth={}, max_expression_depth={}, max_input_len={:?})",
            config.max_nesting_depth,
            config.max_expression_depth,
            config.max_input_len
        );
        let registry = Arc::new_cyclic(|weak: &Weak<Registry>| {
            let refs = GrammarRefs {
                registry: weak.clone(),
                config: config.clone(),
            };
            Registry {
                condition: condition_parser(&refs),
                statement: statement_parser(&refs, true),
                block_statement: statement_parser(&refs, false),
                conditional: conditional_parser(&refs),
                mapping: mapping_parser(&refs),
                config,
            }
        });
        Self { registry }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.registry.config
    }

    // The accessors below hand out clones of the registered parsers. They
    // resolve their recursive references through this grammar, so they
    // fail with a hard error once every `Grammar` clone has been dropped.

    /// The condition (expression) grammar
    pub fn condition(&self) -> Parser<Expression> {
        self.registry.condition.clone()
    }

    /// The statement grammar as used at the top level of a mapping
    pub fn statement(&self) -> Parser<Statement> {
        self.registry.statement.clone()
    }

    /// The statement grammar as used inside conditional blocks
    pub fn block_statement(&self) -> Parser<Statement> {
        self.registry.block_statement.clone()
    }

    /// The `if` / `else if` / `else` grammar
    pub fn conditional(&self) -> Parser<ConditionalChain> {
        self.registry.conditional.clone()
    }

    /// Parse one conditional chain from the start of `source`. Text after
    /// the chain is returned as the remainder, not rejected.
    pub fn parse_conditional(&self, source: &str) -> Result<Parsed<ConditionalChain>> {
        let input = self.input(source)?;
        let parsed = self.registry.conditional.parse(input)?;
        log::debug!(
            "Parsed conditional chain with {} branches",
            parsed.payload.branches().len()
        );
        Ok(parsed)
    }

    /// Parse a complete mapping; all of `source` must be consumed
    pub fn parse_mapping(&self, source: &str) -> Result<Mapping> {
        let input = self.input(source)?;
        let parsed = self.registry.mapping.parse(input)?;
        log::debug!(
            "Parsed mapping with {} top-level statements",
            parsed.payload.statements.len()
        );
        Ok(parsed.payload)
    }

    fn input(&self, source: &str) -> Result<Input> {
        if let Some(limit) = self.registry.config.max_input_len {
            if source.len() > limit {
                return Err(GrammarError::InputTooLarge {
                    len: source.len(),
                    limit,
                });
            }
        }
        Ok(Input::new(source))
    }
}

impl Default for Grammar {
    fn default() -> Self {
        Self::build(ParserConfig::default())
    }
}
