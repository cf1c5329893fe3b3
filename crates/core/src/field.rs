// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed fields: the two-stage coerce-then-validate contract shared by all
//! six field kinds (spec §4.3).
//!
//! Coercion normalizes raw input (trim strings, empty string becomes null
//! when the field is optional, the `"today"` sentinel resolves against a
//! clock); validation enforces the kind's constraints. Neither stage
//! silently casts across primitive kinds beyond the universal `int->float`
//! and `bool->int` widenings (spec §4.3) — `str<->int` is always a hard
//! failure, here and in the state codec.

use crate::location::Location;
use crate::template::Template;
use crate::value::Value;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{reason}")]
pub struct FieldError {
    pub reason: String,
}

impl FieldError {
    fn new(reason: impl Into<String>) -> Self {
        FieldError {
            reason: reason.into(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_one() -> usize {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectOption {
    pub label: Template,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DateBound {
    Literal(NaiveDate),
    Today,
}

impl Serialize for DateBound {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            DateBound::Today => serializer.serialize_str("today"),
            DateBound::Literal(d) => serializer.serialize_str(&d.format("%Y-%m-%d").to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for DateBound {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        if s == "today" {
            return Ok(DateBound::Today);
        }
        NaiveDate::parse_from_str(&s, "%Y-%m-%d")
            .map(DateBound::Literal)
            .map_err(serde::de::Error::custom)
    }
}

impl DateBound {
    pub fn resolve(&self, today: NaiveDate) -> NaiveDate {
        match self {
            DateBound::Today => today,
            DateBound::Literal(d) => *d,
        }
    }
}

impl std::fmt::Display for DateBound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateBound::Today => write!(f, "today"),
            DateBound::Literal(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Bool,
    Date {
        #[serde(default)]
        min: Option<DateBound>,
        #[serde(default)]
        max: Option<DateBound>,
    },
    Email {
        #[serde(default = "default_true")]
        check_public_suffix: bool,
    },
    Number {
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
        #[serde(default)]
        integer: bool,
    },
    Select {
        options: Vec<SelectOption>,
        #[serde(default = "default_one")]
        min: usize,
        #[serde(default = "default_one")]
        max: usize,
    },
    Text {
        #[serde(default)]
        min: Option<usize>,
        #[serde(default)]
        max: Option<usize>,
        #[serde(default)]
        regex: Option<String>,
        #[serde(default)]
        regex_js: Option<String>,
    },
}

/// A typed field: coerces and validates one slot of a Question's response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Field {
    #[serde(default)]
    pub set: Option<Location>,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub default: Option<Value>,
    #[serde(default)]
    pub label: Option<Template>,
    #[serde(default)]
    pub require_value: Option<Value>,
    #[serde(default)]
    pub require_value_message: Option<String>,
    #[serde(flatten)]
    pub kind: FieldKind,
}

impl Field {
    /// Coerce raw input, then validate it against this field's constraints.
    /// `today` resolves the `"today"` date-bound sentinel.
    pub fn coerce_and_validate(&self, raw: &Value, today: NaiveDate) -> Result<Value, FieldError> {
        let coerced = self.coerce(raw, today)?;
        self.validate(&coerced, today)?;
        if let Some(required) = &self.require_value {
            if !require_value_matches(&coerced, required) {
                let msg = self
                    .require_value_message
                    .clone()
                    .unwrap_or_else(|| "value does not match the required value".to_string());
                return Err(FieldError::new(msg));
            }
        }
        Ok(coerced)
    }

    fn coerce(&self, raw: &Value, today: NaiveDate) -> Result<Value, FieldError> {
        match &self.kind {
            FieldKind::Bool => coerce_bool(raw, self.optional),
            FieldKind::Date { .. } => coerce_date(raw, self.optional, today),
            FieldKind::Email { .. } => coerce_trimmed_string(raw, self.optional),
            FieldKind::Number { integer, .. } => coerce_number(raw, self.optional, *integer),
            FieldKind::Select { options, max, .. } => coerce_select(raw, self.optional, options, *max),
            FieldKind::Text { .. } => coerce_trimmed_string(raw, self.optional),
        }
    }

    fn validate(&self, value: &Value, today: NaiveDate) -> Result<(), FieldError> {
        if matches!(value, Value::Null) {
            if self.optional {
                return Ok(());
            }
            return Err(FieldError::new("value is required"));
        }
        match &self.kind {
            FieldKind::Bool => Ok(()),
            FieldKind::Date { min, max } => validate_date(value, min, max, today),
            FieldKind::Email { check_public_suffix } => {
                validate_email(value, *check_public_suffix)
            }
            FieldKind::Number { min, max, integer } => validate_number(value, *min, *max, *integer),
            FieldKind::Select { options, min, max } => validate_select(value, options, *min, *max),
            FieldKind::Text { min, max, regex, .. } => {
                validate_text(value, *min, *max, regex.as_deref())
            }
        }
    }
}

fn require_value_matches(value: &Value, required: &Value) -> bool {
    match (value, required) {
        (Value::List(vs), Value::List(rs)) => {
            let mut a: Vec<String> = vs.iter().map(Value::display_string).collect();
            let mut b: Vec<String> = rs.iter().map(Value::display_string).collect();
            a.sort();
            b.sort();
            a == b
        }
        _ => value == required,
    }
}

fn coerce_bool(raw: &Value, optional: bool) -> Result<Value, FieldError> {
    match raw {
        Value::Null if optional => Ok(Value::Null),
        Value::Bool(b) => Ok(Value::Bool(*b)),
        _ => Err(FieldError::new("expected a boolean")),
    }
}

fn coerce_trimmed_string(raw: &Value, optional: bool) -> Result<Value, FieldError> {
    match raw {
        Value::Null if optional => Ok(Value::Null),
        Value::Str(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                if optional {
                    Ok(Value::Null)
                } else {
                    Err(FieldError::new("value is required"))
                }
            } else {
                Ok(Value::Str(trimmed.to_string()))
            }
        }
        _ => Err(FieldError::new("expected a string")),
    }
}

fn coerce_date(raw: &Value, optional: bool, today: NaiveDate) -> Result<Value, FieldError> {
    match raw {
        Value::Null if optional => Ok(Value::Null),
        Value::Str(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return if optional {
                    Ok(Value::Null)
                } else {
                    Err(FieldError::new("value is required"))
                };
            }
            if trimmed == "today" {
                return Ok(Value::Str(today.format("%Y-%m-%d").to_string()));
            }
            let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .map_err(|_| FieldError::new("expected an RFC 3339 date"))?;
            Ok(Value::Str(date.format("%Y-%m-%d").to_string()))
        }
        _ => Err(FieldError::new("expected a date string")),
    }
}

fn coerce_number(raw: &Value, optional: bool, integer: bool) -> Result<Value, FieldError> {
    match raw {
        Value::Null if optional => Ok(Value::Null),
        Value::Int(i) => Ok(Value::Int(*i)),
        Value::Float(f) => {
            if integer {
                Err(FieldError::new("expected an integer"))
            } else {
                Ok(Value::Float(*f))
            }
        }
        _ => Err(FieldError::new("expected a number")),
    }
}

#[allow(clippy::expect_used)]
fn coerce_select(
    raw: &Value,
    optional: bool,
    options: &[SelectOption],
    max: usize,
) -> Result<Value, FieldError> {
    let indices: Vec<i64> = match raw {
        Value::Null if optional => return Ok(Value::Null),
        Value::Int(i) => vec![*i],
        Value::List(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::Int(i) => out.push(*i),
                    _ => return Err(FieldError::new("expected a list of indices")),
                }
            }
            out
        }
        _ => return Err(FieldError::new("expected an index or a list of indices")),
    };
    if indices.is_empty() {
        return if optional {
            Ok(Value::Null)
        } else {
            Err(FieldError::new("value is required"))
        };
    }
    let mut seen = std::collections::HashSet::new();
    let mut values = Vec::with_capacity(indices.len());
    for idx in &indices {
        if !seen.insert(*idx) {
            return Err(FieldError::new("duplicate selection index"));
        }
        let pos = usize::try_from(*idx - 1)
            .ok()
            .filter(|p| *p < options.len())
            .ok_or_else(|| FieldError::new("selection index out of range"))?;
        values.push(options[pos].value.clone());
    }
    if max == 1 {
        Ok(values.into_iter().next().expect("checked non-empty"))
    } else {
        Ok(Value::List(values))
    }
}

fn validate_date(
    value: &Value,
    min: &Option<DateBound>,
    max: &Option<DateBound>,
    today: NaiveDate,
) -> Result<(), FieldError> {
    let s = value.as_str().ok_or_else(|| FieldError::new("expected a date"))?;
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| FieldError::new("expected an RFC 3339 date"))?;
    if let Some(min) = min {
        if date < min.resolve(today) {
            return Err(FieldError::new("date is before the minimum"));
        }
    }
    if let Some(max) = max {
        if date > max.resolve(today) {
            return Err(FieldError::new("date is after the maximum"));
        }
    }
    Ok(())
}

fn validate_email(value: &Value, check_public_suffix: bool) -> Result<(), FieldError> {
    use validator::ValidateEmail;
    let s = value.as_str().ok_or_else(|| FieldError::new("expected an email"))?;
    if !s.validate_email() {
        return Err(FieldError::new("invalid email address"));
    }
    if check_public_suffix {
        let domain = s
            .rsplit_once('@')
            .map(|(_, d)| d)
            .ok_or_else(|| FieldError::new("invalid email address"))?;
        addr::parse_domain_name(domain)
            .map_err(|_| FieldError::new("email domain has no recognized public suffix"))?;
    }
    Ok(())
}

fn validate_number(value: &Value, min: Option<f64>, max: Option<f64>, integer: bool) -> Result<(), FieldError> {
    if integer && !matches!(value, Value::Int(_)) {
        return Err(FieldError::new("expected an integer"));
    }
    let n = value.widen_to_float().ok_or_else(|| FieldError::new("expected a number"))?;
    if let Some(min) = min {
        if n < min {
            return Err(FieldError::new("value is below the minimum"));
        }
    }
    if let Some(max) = max {
        if n > max {
            return Err(FieldError::new("value is above the maximum"));
        }
    }
    Ok(())
}

fn validate_select(value: &Value, options: &[SelectOption], min: usize, max: usize) -> Result<(), FieldError> {
    let count = match value {
        Value::List(items) => items.len(),
        _ => 1,
    };
    if count < min {
        return Err(FieldError::new("too few selections"));
    }
    if count > max {
        return Err(FieldError::new("too many selections"));
    }
    let values_ok = |v: &Value| options.iter().any(|o| &o.value == v);
    let ok = match value {
        Value::List(items) => items.iter().all(values_ok),
        other => values_ok(other),
    };
    if !ok {
        return Err(FieldError::new("selected value is not one of the options"));
    }
    Ok(())
}

fn validate_text(
    value: &Value,
    min: Option<usize>,
    max: Option<usize>,
    regex: Option<&str>,
) -> Result<(), FieldError> {
    let s = value.as_str().ok_or_else(|| FieldError::new("expected a string"))?;
    let len = s.chars().count();
    if let Some(min) = min {
        if len < min {
            return Err(FieldError::new("value is too short"));
        }
    }
    if let Some(max) = max {
        if len > max {
            return Err(FieldError::new("value is too long"));
        }
    }
    if let Some(pattern) = regex {
        let re = regex::Regex::new(pattern).map_err(|_| FieldError::new("invalid server regex"))?;
        if !re.is_match(s) {
            return Err(FieldError::new("value does not match the required pattern"));
        }
    }
    Ok(())
}

/// The client-facing rendering of a field: only constraints safe to expose
/// (e.g. the JS regex variant, never the server-authoritative `regex`).
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AskField {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub label: Option<String>,
    pub optional: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regex_js: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<AskSelectOption>>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AskSelectOption {
    pub label: String,
    pub value: Value,
}

impl Field {
    /// Render the client-facing view of this field against the template
    /// context. Only non-authoritative, display-oriented constraints cross
    /// this boundary.
    pub fn render(&self, ctx: &Value) -> Result<AskField, crate::template::TemplateRenderError> {
        let label = self.label.as_ref().map(|t| t.render(ctx)).transpose()?;
        let (kind, min, max, regex_js, options) = match &self.kind {
            FieldKind::Bool => ("bool", None, None, None, None),
            FieldKind::Date { min, max } => (
                "date",
                min.as_ref().map(|b| serde_json::json!(b.to_string())),
                max.as_ref().map(|b| serde_json::json!(b.to_string())),
                None,
                None,
            ),
            FieldKind::Email { .. } => ("email", None, None, None, None),
            FieldKind::Number { min, max, .. } => (
                "number",
                min.map(|m| serde_json::json!(m)),
                max.map(|m| serde_json::json!(m)),
                None,
                None,
            ),
            FieldKind::Select { options, min, max } => {
                let mut rendered = Vec::with_capacity(options.len());
                for opt in options {
                    rendered.push(AskSelectOption {
                        label: opt.label.render(ctx)?,
                        value: opt.value.clone(),
                    });
                }
                (
                    "select",
                    Some(serde_json::json!(min)),
                    Some(serde_json::json!(max)),
                    None,
                    Some(rendered),
                )
            }
            FieldKind::Text { min, max, regex_js, .. } => (
                "text",
                min.map(|m| serde_json::json!(m)),
                max.map(|m| serde_json::json!(m)),
                regex_js.clone(),
                None,
            ),
        };
        Ok(AskField {
            kind,
            label,
            optional: self.optional,
            min,
            max,
            regex_js,
            options,
        })
    }
}

#[cfg(test)]
#[path = "field_tests.rs"]
mod tests;
