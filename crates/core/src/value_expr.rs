// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ValueOrExpression`: the type `Step::Set.value` and `Step::Eval.eval`
//! carry (spec §3, §4.6).
//!
//! A YAML/JSON **string** scalar is always parsed as an [`Expr`] in the
//! sandboxed expression grammar (so a literal string must be written as a
//! quoted expression, e.g. `value: '"done"'`); any other scalar, list, or
//! map is a literal [`Value`] with no further evaluation. This mirrors the
//! source interview engine's `structure_value_or_expression`, which always
//! routes `str` through the expression parser and everything else through
//! a pass-through literal constructor.

use crate::expr::{self, Expr, ExprEvalError, ExprParseError};
use crate::value::Value;
use indexmap::IndexMap;
use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum ValueExpr {
    Literal(Value),
    Expr(Expr),
}

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ValueExprError {
    #[error(transparent)]
    Parse(#[from] ExprParseError),
}

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ValueExprEvalError {
    #[error(transparent)]
    Expr(#[from] ExprEvalError),
}

impl ValueExpr {
    pub fn evaluate(&self, ctx: &Value) -> Result<Value, ValueExprEvalError> {
        match self {
            ValueExpr::Literal(v) => Ok(v.clone()),
            ValueExpr::Expr(e) => Ok(expr::eval(e, ctx)?),
        }
    }
}

impl Serialize for ValueExpr {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ValueExpr::Literal(v) => v.serialize(serializer),
            ValueExpr::Expr(_) => {
                // Expr has no canonical re-rendering of its source text kept
                // around (unlike Template/Condition); round-tripping through
                // the config layer always goes through the original YAML.
                serializer.serialize_str("<expr>")
            }
        }
    }
}

struct ValueExprVisitor;

impl<'de> Visitor<'de> for ValueExprVisitor {
    type Value = ValueExpr;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a literal value or an expression string")
    }

    fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E> {
        Ok(ValueExpr::Literal(Value::Bool(v)))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E> {
        Ok(ValueExpr::Literal(Value::Int(v)))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E> {
        Ok(ValueExpr::Literal(Value::Int(v as i64)))
    }

    fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E> {
        Ok(ValueExpr::Literal(Value::Float(v)))
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        let expr = expr::parse(v).map_err(de::Error::custom)?;
        Ok(ValueExpr::Expr(expr))
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E> {
        Ok(ValueExpr::Literal(Value::Null))
    }

    fn visit_none<E>(self) -> Result<Self::Value, E> {
        Ok(ValueExpr::Literal(Value::Null))
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::new();
        while let Some(item) = seq.next_element::<Value>()? {
            items.push(item);
        }
        Ok(ValueExpr::Literal(Value::List(items)))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut out = IndexMap::new();
        while let Some((k, v)) = map.next_entry::<String, Value>()? {
            out.insert(k, v);
        }
        Ok(ValueExpr::Literal(Value::Map(out)))
    }
}

impl<'de> Deserialize<'de> for ValueExpr {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ValueExprVisitor)
    }
}

/// `Step::Eval.eval`: either one `ValueOrExpression`, or a sequence of them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ValueExprList {
    One(ValueExpr),
    Many(Vec<ValueExpr>),
}

impl<'de> Deserialize<'de> for ValueExprList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ListVisitor;
        impl<'de> Visitor<'de> for ListVisitor {
            type Value = ValueExprList;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "a value/expression, or a list of them")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut items = Vec::new();
                while let Some(item) = seq.next_element::<ValueExpr>()? {
                    items.push(item);
                }
                Ok(ValueExprList::Many(items))
            }

            fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E> {
                Ok(ValueExprList::One(ValueExpr::Literal(Value::Bool(v))))
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E> {
                Ok(ValueExprList::One(ValueExpr::Literal(Value::Int(v))))
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E> {
                Ok(ValueExprList::One(ValueExpr::Literal(Value::Int(v as i64))))
            }

            fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E> {
                Ok(ValueExprList::One(ValueExpr::Literal(Value::Float(v))))
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                let expr = expr::parse(v).map_err(de::Error::custom)?;
                Ok(ValueExprList::One(ValueExpr::Expr(expr)))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(ValueExprList::One(ValueExpr::Literal(Value::Null)))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut out = IndexMap::new();
                while let Some((k, v)) = map.next_entry::<String, Value>()? {
                    out.insert(k, v);
                }
                Ok(ValueExprList::One(ValueExpr::Literal(Value::Map(out))))
            }
        }
        deserializer.deserialize_any(ListVisitor)
    }
}

impl ValueExprList {
    pub fn items(&self) -> &[ValueExpr] {
        match self {
            ValueExprList::One(v) => std::slice::from_ref(v),
            ValueExprList::Many(items) => items,
        }
    }
}
