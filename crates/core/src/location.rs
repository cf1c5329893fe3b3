// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The variable-location language: `a.b[c]` paths over nested maps and lists.
//!
//! Grammar (whitespace permitted between tokens):
//! ```text
//! name          := [A-Za-z][A-Za-z0-9_]*
//! number        := 0 | [1-9][0-9]*
//! location      := name ( "." name | "[" (number | location) "]" )*
//! ```

use crate::value::{ConstValue, Value};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A parsed path expression naming a position in the interview data tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Location {
    Name(String),
    IndexAccess {
        target: Box<Location>,
        index: Box<Location>,
    },
    AttributeAccess {
        target: Box<Location>,
        name: String,
    },
    /// Only appears as an evaluated index literal (spec §3).
    Const(ConstValue),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Name(n) => write!(f, "{n}"),
            Location::AttributeAccess { target, name } => write!(f, "{target}.{name}"),
            Location::IndexAccess { target, index } => write!(f, "{target}[{index}]"),
            Location::Const(ConstValue::Int(i)) => write!(f, "{i}"),
            Location::Const(ConstValue::Str(s)) => write!(f, "{s}"),
        }
    }
}

impl Serialize for Location {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Location {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse(&s).map_err(serde::de::Error::custom)
    }
}

impl Location {
    /// The root identifier a location ultimately traverses from.
    pub fn root_name(&self) -> Option<&str> {
        match self {
            Location::Name(n) => Some(n),
            Location::IndexAccess { target, .. } | Location::AttributeAccess { target, .. } => {
                target.root_name()
            }
            Location::Const(_) => None,
        }
    }

    /// Build a location by appending an attribute step onto `self`.
    pub fn attr(self, name: impl Into<String>) -> Location {
        Location::AttributeAccess {
            target: Box::new(self),
            name: name.into(),
        }
    }

    /// Build a location by appending an index step onto `self`.
    pub fn index(self, index: Location) -> Location {
        Location::IndexAccess {
            target: Box::new(self),
            index: Box::new(index),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum LocationParseError {
    #[error("unexpected end of input while parsing location")]
    UnexpectedEof,
    #[error("unexpected character '{0}' at position {1}")]
    UnexpectedChar(char, usize),
    #[error("trailing input after location: {0:?}")]
    TrailingInput(String),
    #[error("empty location")]
    Empty,
}

/// The deepest-defined prefix plus the first missing step (spec §4.1).
/// This, not the full original location, is what the stepper uses to find
/// a question that can provide the missing piece.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[error("undefined location: {0}")]
pub struct UndefinedError(pub Location);

#[derive(Debug, Error, PartialEq, Clone)]
pub enum EvalError {
    #[error(transparent)]
    Undefined(#[from] UndefinedError),
    #[error("index must evaluate to an int or string, got a different kind")]
    InvalidIndexType,
    #[error("cannot index into a non-list/non-map value at {0}")]
    NotIndexable(Location),
    #[error("index {0} out of range for list of length {1}")]
    IndexOutOfRange(i64, usize),
    #[error("attribute access on a non-map value at {0}")]
    NotAMap(Location),
}

#[derive(Debug, Error, PartialEq, Clone)]
pub enum AssignError {
    #[error(transparent)]
    Eval(#[from] EvalError),
    #[error("assignment target must not be a bare Const location")]
    ConstRoot,
    #[error("assignment target parent does not exist as a map/list: {0}")]
    MissingParent(Location),
    #[error("index {0} out of range for list of length {1}")]
    IndexOutOfRange(i64, usize),
}

/// Parse a Location string, erroring on trailing input or grammar violations.
pub fn parse(input: &str) -> Result<Location, LocationParseError> {
    let mut p = Parser::new(input);
    let loc = p.parse_location()?;
    p.skip_ws();
    if !p.at_end() {
        return Err(LocationParseError::TrailingInput(p.rest().to_string()));
    }
    Ok(loc)
}

struct Parser<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
    }

    fn parse_name(&mut self) -> Result<String, LocationParseError> {
        self.skip_ws();
        let start = self.pos;
        match self.peek() {
            Some(c) if c.is_ascii_alphabetic() => self.pos += 1,
            Some(c) => return Err(LocationParseError::UnexpectedChar(c, self.pos)),
            None => return Err(LocationParseError::UnexpectedEof),
        }
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        Ok(self.input[start..self.pos].to_string())
    }

    fn parse_number(&mut self) -> Result<i64, LocationParseError> {
        self.skip_ws();
        let start = self.pos;
        match self.peek() {
            Some(c) if c.is_ascii_digit() => self.pos += 1,
            Some(c) => return Err(LocationParseError::UnexpectedChar(c, self.pos)),
            None => return Err(LocationParseError::UnexpectedEof),
        }
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.pos += 1;
            } else {
                break;
            }
        }
        self.input[start..self.pos]
            .parse()
            .map_err(|_| LocationParseError::UnexpectedChar('0', start))
    }

    fn parse_location(&mut self) -> Result<Location, LocationParseError> {
        self.skip_ws();
        if self.at_end() {
            return Err(LocationParseError::Empty);
        }
        let mut loc = Location::Name(self.parse_name()?);
        loop {
            self.skip_ws();
            match self.peek() {
                Some('.') => {
                    self.pos += 1;
                    let name = self.parse_name()?;
                    loc = loc.attr(name);
                }
                Some('[') => {
                    self.pos += 1;
                    self.skip_ws();
                    let index = if matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                        Location::Const(ConstValue::Int(self.parse_number()?))
                    } else {
                        self.parse_location()?
                    };
                    self.skip_ws();
                    match self.peek() {
                        Some(']') => self.pos += 1,
                        Some(c) => return Err(LocationParseError::UnexpectedChar(c, self.pos)),
                        None => return Err(LocationParseError::UnexpectedEof),
                    }
                    loc = loc.index(index);
                }
                _ => break,
            }
        }
        Ok(loc)
    }
}

/// Evaluate a location against a context, raising `UndefinedError` with the
/// deepest-defined prefix plus the first missing step on any missing key.
pub fn evaluate(loc: &Location, ctx: &Value) -> Result<Value, EvalError> {
    evaluate_from(loc, ctx)
}

fn evaluate_from(loc: &Location, ctx: &Value) -> Result<Value, EvalError> {
    match loc {
        Location::Name(name) => {
            let map = ctx.as_map().ok_or_else(|| EvalError::NotAMap(loc.clone()))?;
            map.get(name)
                .cloned()
                .ok_or_else(|| UndefinedError(loc.clone()).into())
        }
        Location::Const(c) => Ok(c.clone().into()),
        Location::AttributeAccess { target, name } => {
            let target_val = evaluate_from(target, ctx)?;
            let map = target_val
                .as_map()
                .ok_or_else(|| EvalError::NotAMap((**target).clone()))?;
            map.get(name).cloned().ok_or_else(|| {
                UndefinedError(Location::AttributeAccess {
                    target: target.clone(),
                    name: name.clone(),
                })
                .into()
            })
        }
        Location::IndexAccess { target, index } => {
            let target_val = evaluate_from(target, ctx)?;
            let index_val = evaluate_from(index, ctx)?;
            index_into(loc, target, &target_val, &index_val)
        }
    }
}

fn index_into(
    full: &Location,
    target: &Location,
    target_val: &Value,
    index_val: &Value,
) -> Result<Value, EvalError> {
    match index_val {
        Value::Int(i) => match target_val {
            Value::List(list) => {
                let idx = *i;
                if idx < 0 || idx as usize >= list.len() {
                    return Err(UndefinedError(full.clone()).into());
                }
                Ok(list[idx as usize].clone())
            }
            Value::Map(map) => map
                .get(&i.to_string())
                .cloned()
                .ok_or_else(|| UndefinedError(full.clone()).into()),
            _ => Err(EvalError::NotIndexable((*target).clone())),
        },
        Value::Str(key) => {
            let map = target_val
                .as_map()
                .ok_or_else(|| EvalError::NotIndexable((*target).clone()))?;
            map.get(key)
                .cloned()
                .ok_or_else(|| UndefinedError(full.clone()).into())
        }
        _ => Err(EvalError::InvalidIndexType),
    }
}

/// Rewrite all non-const index terms into `Const(value)` using evaluation,
/// for normalizing a location before comparison/lookup (spec §4.1).
pub fn evaluate_indexes(loc: &Location, ctx: &Value) -> Result<Location, EvalError> {
    match loc {
        Location::Name(_) | Location::Const(_) => Ok(loc.clone()),
        Location::AttributeAccess { target, name } => Ok(Location::AttributeAccess {
            target: Box::new(evaluate_indexes(target, ctx)?),
            name: name.clone(),
        }),
        Location::IndexAccess { target, index } => {
            let new_target = evaluate_indexes(target, ctx)?;
            let new_index = match index.as_ref() {
                Location::Const(c) => Location::Const(c.clone()),
                other => {
                    let val = evaluate_from(other, ctx)?;
                    let c: ConstValue = val.try_into().map_err(|_| EvalError::InvalidIndexType)?;
                    Location::Const(c)
                }
            };
            Ok(Location::IndexAccess {
                target: Box::new(new_target),
                index: Box::new(new_index),
            })
        }
    }
}

/// Assign `value` at `loc` in `ctx`. The root form `Name(k)` creates or
/// overwrites `ctx[k]`; for non-root forms the parent must already exist as
/// a map/list, and list indices must be in range.
pub fn assign(loc: &Location, value: Value, ctx: &mut Value) -> Result<(), AssignError> {
    match loc {
        Location::Const(_) => Err(AssignError::ConstRoot),
        Location::Name(name) => {
            let map = ctx
                .as_map_mut()
                .ok_or_else(|| AssignError::MissingParent(loc.clone()))?;
            map.insert(name.clone(), value);
            Ok(())
        }
        Location::AttributeAccess { target, name } => {
            let parent = resolve_parent_mut(target, ctx)?;
            let map = parent
                .as_map_mut()
                .ok_or_else(|| AssignError::MissingParent((**target).clone()))?;
            map.insert(name.clone(), value);
            Ok(())
        }
        Location::IndexAccess { target, index } => {
            let index_val = evaluate(index, ctx)?;
            let parent = resolve_parent_mut(target, ctx)?;
            match &index_val {
                Value::Int(i) => {
                    let list = parent
                        .as_list_mut()
                        .ok_or_else(|| AssignError::MissingParent((**target).clone()))?;
                    let idx = *i;
                    if idx < 0 || idx as usize >= list.len() {
                        return Err(AssignError::IndexOutOfRange(idx, list.len()));
                    }
                    list[idx as usize] = value;
                    Ok(())
                }
                Value::Str(key) => {
                    let map = parent
                        .as_map_mut()
                        .ok_or_else(|| AssignError::MissingParent((**target).clone()))?;
                    map.insert(key.clone(), value);
                    Ok(())
                }
                _ => Err(EvalError::InvalidIndexType.into()),
            }
        }
    }
}

#[allow(clippy::expect_used)]
fn resolve_parent_mut<'a>(
    target: &Location,
    ctx: &'a mut Value,
) -> Result<&'a mut Value, AssignError> {
    match target {
        Location::Name(name) => {
            let map = ctx
                .as_map_mut()
                .ok_or_else(|| AssignError::MissingParent(target.clone()))?;
            if !map.contains_key(name) {
                return Err(AssignError::MissingParent(target.clone()));
            }
            Ok(map.get_mut(name).expect("checked above"))
        }
        Location::AttributeAccess { target: inner, name } => {
            let parent = resolve_parent_mut(inner, ctx)?;
            let map = parent
                .as_map_mut()
                .ok_or_else(|| AssignError::MissingParent((**inner).clone()))?;
            if !map.contains_key(name) {
                return Err(AssignError::MissingParent(target.clone()));
            }
            Ok(map.get_mut(name).expect("checked above"))
        }
        Location::IndexAccess { target: inner, index } => {
            let index_val = evaluate(index, ctx)?;
            let parent = resolve_parent_mut(inner, ctx)?;
            match index_val {
                Value::Int(i) => {
                    let list = parent
                        .as_list_mut()
                        .ok_or_else(|| AssignError::MissingParent((**inner).clone()))?;
                    if i < 0 || i as usize >= list.len() {
                        return Err(AssignError::IndexOutOfRange(i, list.len()));
                    }
                    Ok(&mut list[i as usize])
                }
                Value::Str(key) => {
                    let map = parent
                        .as_map_mut()
                        .ok_or_else(|| AssignError::MissingParent((**inner).clone()))?;
                    if !map.contains_key(&key) {
                        return Err(AssignError::MissingParent(target.clone()));
                    }
                    Ok(map.get_mut(&key).expect("checked above"))
                }
                _ => Err(EvalError::InvalidIndexType.into()),
            }
        }
        Location::Const(_) => Err(AssignError::ConstRoot),
    }
}

#[cfg(test)]
#[path = "location_tests.rs"]
mod tests;
