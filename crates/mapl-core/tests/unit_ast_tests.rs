//! Unit tests for AST (Abstract Syntax Tree) types
//!
//! Tests the conditional chain invariants, branch selection order and the
//! serde representation shared with downstream evaluators

use mapl_core::ast::*;
use mapl_core::types::Value;
use mapl_core::CoreError;
use std::collections::HashMap;

fn assign(field: &str, n: f64) -> Statement {
    Statement::assign(vec![field.to_string()], Expression::literal(Value::Number(n)))
}

fn three_way_chain() -> ConditionalChain {
    let mut builder = ConditionalChain::builder(Expression::field("x"), vec![assign("a", 1.0)]);
    builder.else_if(Expression::field("y"), vec![assign("b", 2.0)]);
    builder.build_with_else(vec![assign("c", 3.0)])
}

// =============================================================================
// Chain Construction Tests
// =============================================================================

#[test]
fn test_builder_preserves_source_order() {
    let chain = three_way_chain();
    let branches = chain.branches();

    assert_eq!(branches.len(), 3);
    assert_eq!(branches[0].condition, Some(Expression::field("x")));
    assert_eq!(branches[1].condition, Some(Expression::field("y")));
    assert!(branches[2].is_terminal());
    assert_eq!(chain.terminal(), Some(&[assign("c", 3.0)][..]));
}

#[test]
fn test_chain_without_else() {
    let chain = ConditionalChain::builder(Expression::field("x"), vec![]).build();
    assert_eq!(chain.branches().len(), 1);
    assert!(chain.terminal().is_none());
}

#[test]
fn test_chain_display() {
    assert_eq!(
        three_way_chain().to_string(),
        "if x { a = 1 } else if y { b = 2 } else { c = 3 }"
    );
}

// =============================================================================
// Branch Selection Tests
// =============================================================================

#[test]
fn test_select_stops_at_first_true_condition() {
    let chain = three_way_chain();
    let mut tested = Vec::new();

    let selected = chain
        .select(|condition| -> Result<bool, ()> {
            tested.push(condition.to_string());
            Ok(true)
        })
        .unwrap()
        .unwrap();

    assert_eq!(selected.body, vec![assign("a", 1.0)]);
    assert_eq!(tested, vec!["x".to_string()]);
}

#[test]
fn test_select_falls_through_to_terminal() {
    let chain = three_way_chain();
    let mut tested = 0;

    let selected = chain
        .select(|_| -> Result<bool, ()> {
            tested += 1;
            Ok(false)
        })
        .unwrap()
        .unwrap();

    assert!(selected.is_terminal());
    assert_eq!(tested, 2);
}

#[test]
fn test_select_without_terminal_selects_nothing() {
    let chain = ConditionalChain::builder(Expression::field("x"), vec![]).build();
    let selected = chain.select(|_| -> Result<bool, ()> { Ok(false) }).unwrap();
    assert!(selected.is_none());
}

#[test]
fn test_select_propagates_errors() {
    let chain = three_way_chain();
    let result = chain.select(|_| Err("boom"));
    assert_eq!(result.unwrap_err(), "boom");
}

// =============================================================================
// Serialization Tests
// =============================================================================

#[test]
fn test_chain_serializes_as_branch_list() -> anyhow::Result<()> {
    let json = serde_json::to_value(three_way_chain())?;
    let branches = json
        .as_array()
        .ok_or_else(|| anyhow::anyhow!("chain did not serialize as an array"))?;

    assert_eq!(branches.len(), 3);
    assert!(branches[2]["condition"].is_null());

    let back: ConditionalChain = serde_json::from_value(json)?;
    assert_eq!(back, three_way_chain());
    Ok(())
}

#[test]
fn test_deserialize_rejects_empty_chain() {
    let result: Result<ConditionalChain, _> = serde_json::from_str("[]");
    assert!(result.is_err());
}

#[test]
fn test_try_from_rejects_misplaced_terminal() {
    let branches = vec![
        Branch::guarded(Expression::field("x"), vec![]),
        Branch::terminal(vec![]),
        Branch::guarded(Expression::field("y"), vec![]),
    ];
    let result = ConditionalChain::try_from(branches);
    assert!(matches!(result, Err(CoreError::InvalidChain(_))));
}

#[test]
fn test_try_from_rejects_leading_terminal() {
    let result = ConditionalChain::try_from(vec![Branch::terminal(vec![])]);
    assert!(matches!(result, Err(CoreError::InvalidChain(_))));
}

// =============================================================================
// Mapping Tests
// =============================================================================

#[test]
fn test_mapping_collects_nested_conditionals() {
    let inner = ConditionalChain::builder(Expression::field("z"), vec![assign("d", 4.0)]).build();
    let outer = ConditionalChain::builder(
        Expression::field("x"),
        vec![Statement::Conditional(inner.clone())],
    )
    .build();
    let mapping = Mapping::new(vec![assign("a", 1.0), Statement::Conditional(outer.clone())]);

    let found = mapping.conditionals();
    assert_eq!(found.len(), 2);
    assert_eq!(found[0], &outer);
    assert_eq!(found[1], &inner);
}

// =============================================================================
// Value Tests
// =============================================================================

#[test]
fn test_value_object_roundtrips_through_json() {
    let mut fields = HashMap::new();
    fields.insert("tier".to_string(), Value::String("gold".to_string()));
    let value = Value::Object(fields);

    let json = serde_json::to_string(&value).unwrap();
    let back: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(back, value);
}
