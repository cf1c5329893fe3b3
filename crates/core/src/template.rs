// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Templates: literal text interleaved with `{{ expr }}` interpolations,
//! rendered against the template context `{...data, ...context}` (spec
//! §3, §4.2).

use crate::expr::{self, Expr, ExprEvalError, ExprParseError};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Text(String),
    Expr(Expr),
}

/// A parsed template. Serializes back to its original source string.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Serialize for Template {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.source)
    }
}

impl<'de> Deserialize<'de> for Template {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Template::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Error, PartialEq, Clone)]
pub enum TemplateParseError {
    #[error("unterminated {{{{ interpolation")]
    Unterminated,
    #[error("empty interpolation {{{{}}}}")]
    EmptyExpr,
    #[error("invalid expression in interpolation: {0}")]
    Expr(#[from] ExprParseError),
}

#[derive(Debug, Error, PartialEq, Clone)]
pub enum TemplateRenderError {
    #[error(transparent)]
    Expr(#[from] ExprEvalError),
}

impl Template {
    pub fn parse(source: &str) -> Result<Self, TemplateParseError> {
        let mut segments = Vec::new();
        let mut rest = source;
        loop {
            match rest.find("{{") {
                None => {
                    if !rest.is_empty() {
                        segments.push(Segment::Text(rest.to_string()));
                    }
                    break;
                }
                Some(start) => {
                    if start > 0 {
                        segments.push(Segment::Text(rest[..start].to_string()));
                    }
                    let after_open = &rest[start + 2..];
                    let end = after_open
                        .find("}}")
                        .ok_or(TemplateParseError::Unterminated)?;
                    let raw_expr = after_open[..end].trim();
                    if raw_expr.is_empty() {
                        return Err(TemplateParseError::EmptyExpr);
                    }
                    let expr = expr::parse(raw_expr)?;
                    segments.push(Segment::Expr(expr));
                    rest = &after_open[end + 2..];
                }
            }
        }
        Ok(Template {
            source: source.to_string(),
            segments,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether this template contains no interpolations (a literal string).
    pub fn is_literal(&self) -> bool {
        !self.segments.iter().any(|s| matches!(s, Segment::Expr(_)))
    }

    pub fn render(&self, ctx: &Value) -> Result<String, TemplateRenderError> {
        let mut out = String::new();
        for seg in &self.segments {
            match seg {
                Segment::Text(t) => out.push_str(t),
                Segment::Expr(e) => {
                    let v = expr::eval(e, ctx)?;
                    out.push_str(&v.display_string());
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
