// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::location::EvalError;
use indexmap::IndexMap;

fn map(pairs: Vec<(&str, Value)>) -> Value {
    let mut m = IndexMap::new();
    for (k, v) in pairs {
        m.insert(k.to_string(), v);
    }
    Value::Map(m)
}

#[test]
fn always_condition_is_true() {
    assert!(Condition::always().evaluate(&map(vec![])).unwrap());
}

#[test]
fn single_expression_condition() {
    let c = Condition::parse_one("a == 1").unwrap();
    let ctx = map(vec![("a", Value::Int(1))]);
    assert!(c.evaluate(&ctx).unwrap());
}

#[test]
fn many_expressions_and_together() {
    let c = Condition::parse_many(["a == 1", "b == 2"]).unwrap();
    let ctx = map(vec![("a", Value::Int(1)), ("b", Value::Int(2))]);
    assert!(c.evaluate(&ctx).unwrap());

    let ctx_fail = map(vec![("a", Value::Int(1)), ("b", Value::Int(3))]);
    assert!(!c.evaluate(&ctx_fail).unwrap());
}

#[test]
fn short_circuits_before_undefined_clause() {
    let c = Condition::parse_many(["false", "missing == 1"]).unwrap();
    assert_eq!(c.evaluate(&map(vec![])).unwrap(), false);
}

#[test]
fn later_undefined_clause_surfaces_when_earlier_is_true() {
    let c = Condition::parse_many(["true", "missing == 1"]).unwrap();
    let err = c.evaluate(&map(vec![])).unwrap_err();
    assert!(matches!(
        err,
        ConditionEvalError::Expr(crate::expr::ExprEvalError::Eval(EvalError::Undefined(_)))
    ));
}

#[test]
fn and_combines_two_conditions() {
    let a = Condition::parse_one("a").unwrap();
    let b = Condition::parse_one("b").unwrap();
    let combined = a.and(b);
    let ctx = map(vec![("a", Value::Bool(true)), ("b", Value::Bool(false))]);
    assert!(!combined.evaluate(&ctx).unwrap());
}

#[test]
fn serializes_single_expression_as_string() {
    let c = Condition::parse_one("a == 1").unwrap();
    let json = serde_json::to_string(&c).unwrap();
    assert_eq!(json, "\"a == 1\"");
}

#[test]
fn serializes_multiple_expressions_as_list() {
    let c = Condition::parse_many(["a", "b"]).unwrap();
    let json = serde_json::to_string(&c).unwrap();
    assert_eq!(json, "[\"a\",\"b\"]");
}

#[test]
fn deserializes_from_single_string_or_list() {
    let from_str: Condition = serde_json::from_str("\"a == 1\"").unwrap();
    assert_eq!(from_str, Condition::parse_one("a == 1").unwrap());

    let from_list: Condition = serde_json::from_str("[\"a\", \"b\"]").unwrap();
    assert_eq!(from_list, Condition::parse_many(["a", "b"]).unwrap());
}
