// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime value type shared by Location evaluation, template rendering,
//! and field coercion.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A value living in interview data, context, or an evaluated expression.
///
/// `Map` uses `IndexMap` (not `HashMap`) so iteration order matches
/// declaration order, which the state codec's canonical form depends on
/// before it re-sorts keys for serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Map(IndexMap<String, Value>),
}

/// The restricted key type an evaluated index may take (spec §3: "index
/// terms evaluate to `int` or `str` only").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConstValue {
    Int(i64),
    Str(String),
}

impl fmt::Display for ConstValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstValue::Int(i) => write!(f, "{i}"),
            ConstValue::Str(s) => write!(f, "{s}"),
        }
    }
}

impl TryFrom<Value> for ConstValue {
    type Error = Value;

    fn try_from(v: Value) -> Result<Self, Value> {
        match v {
            Value::Int(i) => Ok(ConstValue::Int(i)),
            Value::Str(s) => Ok(ConstValue::Str(s)),
            other => Err(other),
        }
    }
}

impl From<ConstValue> for Value {
    fn from(c: ConstValue) -> Self {
        match c {
            ConstValue::Int(i) => Value::Int(i),
            ConstValue::Str(s) => Value::Str(s),
        }
    }
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Truthiness used by Condition evaluation: only `bool` coerces. A
    /// non-bool expression result is a validation error in the caller, not
    /// silently truthy/falsy — the no-cast rule (spec §4.3) applies here too.
    pub fn is_truthy(&self) -> Option<bool> {
        self.as_bool()
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut IndexMap<String, Value>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    /// Render for template interpolation. No implicit numeric formatting
    /// surprises: floats print with their natural `Display`.
    pub fn display_string(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Str(s) => s.clone(),
            Value::List(_) | Value::Map(_) => {
                serde_json::to_string(self).unwrap_or_default()
            }
        }
    }

    /// The two casts spec §4.3 allows universally: `int -> float`,
    /// `bool -> int`. Everything else (in particular `str <-> int`) is a
    /// hard failure for callers that need a specific kind.
    pub fn widen_to_float(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn widen_to_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Bool(b) => Some(*b as i64),
            _ => None,
        }
    }
}
