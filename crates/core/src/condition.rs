// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Conditions: one expression, or several ANDed together, gating a Step or
//! Question (spec §3 `when`, §4.2).
//!
//! Evaluation short-circuits like `all()`: the scan stops at the first
//! `false`, so a later clause's `Undefined` never surfaces if an earlier
//! clause already settled the condition to `false`. This is documented,
//! deliberate behavior, not an incidental side effect of iteration order.

use crate::expr::{self, Expr, ExprEvalError, ExprParseError};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
enum RawCondition {
    One(String),
    Many(Vec<String>),
}

/// One or more boolean expressions ANDed together.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    exprs: Vec<Expr>,
    sources: Vec<String>,
}

impl Serialize for Condition {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self.sources.as_slice() {
            [one] => serializer.serialize_str(one),
            many => many.serialize(serializer),
        }
    }
}

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConditionParseError {
    #[error(transparent)]
    Expr(#[from] ExprParseError),
}

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConditionEvalError {
    #[error(transparent)]
    Expr(#[from] ExprEvalError),
}

impl Condition {
    /// The always-true condition used when a `when` clause is absent.
    pub fn always() -> Self {
        Condition {
            exprs: Vec::new(),
            sources: Vec::new(),
        }
    }

    pub fn parse_one(source: &str) -> Result<Self, ConditionParseError> {
        Ok(Condition {
            exprs: vec![expr::parse(source)?],
            sources: vec![source.to_string()],
        })
    }

    pub fn parse_many<I, S>(sources: I) -> Result<Self, ConditionParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let sources: Vec<String> = sources.into_iter().map(|s| s.as_ref().to_string()).collect();
        let exprs = sources
            .iter()
            .map(|s| expr::parse(s))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Condition { exprs, sources })
    }

    /// Conjunction of `self` and `other`, used when flattening Blocks (spec
    /// §4.6): the emitted step's `when` is the enclosing Block's `when`
    /// ANDed with the step's own.
    pub fn and(mut self, other: Condition) -> Condition {
        self.exprs.extend(other.exprs);
        self.sources.extend(other.sources);
        self
    }

    /// Evaluate with `all()`-style short-circuiting: stop at the first
    /// `false` clause.
    pub fn evaluate(&self, ctx: &Value) -> Result<bool, ConditionEvalError> {
        for e in &self.exprs {
            let v = expr::eval(e, ctx)?;
            let b = v.as_bool().ok_or(ExprEvalError::NotBool)?;
            if !b {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl<'de> Deserialize<'de> for Condition {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = RawCondition::deserialize(deserializer)?;
        match raw {
            RawCondition::One(s) => {
                Condition::parse_one(&s).map_err(serde::de::Error::custom)
            }
            RawCondition::Many(items) => {
                Condition::parse_many(items).map_err(serde::de::Error::custom)
            }
        }
    }
}

#[cfg(test)]
#[path = "condition_tests.rs"]
mod tests;
