// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The sandboxed expression grammar shared by Template interpolation and
//! Condition evaluation (spec §4.2).
//!
//! Scoped to exactly what templates/conditions need: literals, Location
//! references, unary `!`, the comparison/logical operators, and
//! parenthesization. No function calls, no loops, no attribute access
//! beyond what `Location` already grants — the "sandboxed, no host calls"
//! invariant holds by construction, not by denylisting.

use crate::location::{self, EvalError, Location, LocationParseError};
use crate::value::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Value),
    Loc(Location),
    Not(Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ExprParseError {
    #[error("unexpected end of expression")]
    UnexpectedEof,
    #[error("unexpected token {0:?}")]
    UnexpectedToken(String),
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error(transparent)]
    Location(#[from] LocationParseError),
    #[error("trailing input after expression: {0:?}")]
    TrailingInput(String),
}

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ExprEvalError {
    #[error(transparent)]
    Eval(#[from] EvalError),
    #[error("operator {op} requires operands of a comparable kind")]
    Incomparable { op: &'static str },
    #[error("logical operator requires bool operands")]
    NotBool,
}

pub fn parse(input: &str) -> Result<Expr, ExprParseError> {
    let tokens = tokenize(input)?;
    let mut p = TokenParser {
        tokens: &tokens,
        pos: 0,
    };
    let expr = p.parse_or()?;
    if p.pos != tokens.len() {
        return Err(ExprParseError::TrailingInput(format!("{:?}", &tokens[p.pos..])));
    }
    Ok(expr)
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    True,
    False,
    Int(i64),
    Float(f64),
    Str(String),
    Ident(String),
    Dot,
    LBracket,
    RBracket,
    LParen,
    RParen,
    Bang,
    EqEq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    AndAnd,
    OrOr,
}

#[allow(clippy::unwrap_used)]
fn tokenize(input: &str) -> Result<Vec<Token>, ExprParseError> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = input.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }
        match c {
            '.' => {
                tokens.push(Token::Dot);
                i += 1;
            }
            '[' => {
                tokens.push(Token::LBracket);
                i += 1;
            }
            ']' => {
                tokens.push(Token::RBracket);
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            '!' => {
                if chars.get(i + 1) == Some(&'=') {
                    tokens.push(Token::NotEq);
                    i += 2;
                } else {
                    tokens.push(Token::Bang);
                    i += 1;
                }
            }
            '=' if chars.get(i + 1) == Some(&'=') => {
                tokens.push(Token::EqEq);
                i += 2;
            }
            '<' => {
                if chars.get(i + 1) == Some(&'=') {
                    tokens.push(Token::Le);
                    i += 2;
                } else {
                    tokens.push(Token::Lt);
                    i += 1;
                }
            }
            '>' => {
                if chars.get(i + 1) == Some(&'=') {
                    tokens.push(Token::Ge);
                    i += 2;
                } else {
                    tokens.push(Token::Gt);
                    i += 1;
                }
            }
            '&' if chars.get(i + 1) == Some(&'&') => {
                tokens.push(Token::AndAnd);
                i += 2;
            }
            '|' if chars.get(i + 1) == Some(&'|') => {
                tokens.push(Token::OrOr);
                i += 2;
            }
            '\'' | '"' => {
                let quote = c;
                let mut s = String::new();
                i += 1;
                loop {
                    match chars.get(i) {
                        None => return Err(ExprParseError::UnterminatedString),
                        Some(&q) if q == quote => {
                            i += 1;
                            break;
                        }
                        Some(&ch) => {
                            s.push(ch);
                            i += 1;
                        }
                    }
                }
                tokens.push(Token::Str(s));
            }
            c if c.is_ascii_digit() => {
                let start = i;
                while chars.get(i).is_some_and(|c| c.is_ascii_digit()) {
                    i += 1;
                }
                let mut is_float = false;
                if chars.get(i) == Some(&'.') && chars.get(i + 1).is_some_and(|c| c.is_ascii_digit())
                {
                    is_float = true;
                    i += 1;
                    while chars.get(i).is_some_and(|c| c.is_ascii_digit()) {
                        i += 1;
                    }
                }
                let text: String = chars[start..i].iter().collect();
                if is_float {
                    tokens.push(Token::Float(text.parse().unwrap()));
                } else {
                    tokens.push(Token::Int(text.parse().unwrap()));
                }
            }
            c if c.is_ascii_alphabetic() => {
                let start = i;
                while chars.get(i).is_some_and(|c| c.is_ascii_alphanumeric() || *c == '_') {
                    i += 1;
                }
                let text: String = chars[start..i].iter().collect();
                match text.as_str() {
                    "true" => tokens.push(Token::True),
                    "false" => tokens.push(Token::False),
                    _ => tokens.push(Token::Ident(text)),
                }
            }
            other => return Err(ExprParseError::UnexpectedToken(other.to_string())),
        }
    }
    Ok(tokens)
}

struct TokenParser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> TokenParser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&Token> {
        let t = self.tokens.get(self.pos);
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    fn parse_or(&mut self) -> Result<Expr, ExprParseError> {
        let mut lhs = self.parse_and()?;
        while matches!(self.peek(), Some(Token::OrOr)) {
            self.advance();
            let rhs = self.parse_and()?;
            lhs = Expr::Binary(BinOp::Or, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> Result<Expr, ExprParseError> {
        let mut lhs = self.parse_eq()?;
        while matches!(self.peek(), Some(Token::AndAnd)) {
            self.advance();
            let rhs = self.parse_eq()?;
            lhs = Expr::Binary(BinOp::And, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_eq(&mut self) -> Result<Expr, ExprParseError> {
        let lhs = self.parse_rel()?;
        let op = match self.peek() {
            Some(Token::EqEq) => Some(BinOp::Eq),
            Some(Token::NotEq) => Some(BinOp::Ne),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let rhs = self.parse_rel()?;
            return Ok(Expr::Binary(op, Box::new(lhs), Box::new(rhs)));
        }
        Ok(lhs)
    }

    fn parse_rel(&mut self) -> Result<Expr, ExprParseError> {
        let lhs = self.parse_unary()?;
        let op = match self.peek() {
            Some(Token::Lt) => Some(BinOp::Lt),
            Some(Token::Le) => Some(BinOp::Le),
            Some(Token::Gt) => Some(BinOp::Gt),
            Some(Token::Ge) => Some(BinOp::Ge),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let rhs = self.parse_unary()?;
            return Ok(Expr::Binary(op, Box::new(lhs), Box::new(rhs)));
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr, ExprParseError> {
        if matches!(self.peek(), Some(Token::Bang)) {
            self.advance();
            let inner = self.parse_unary()?;
            return Ok(Expr::Not(Box::new(inner)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, ExprParseError> {
        match self.advance().cloned() {
            Some(Token::True) => Ok(Expr::Literal(Value::Bool(true))),
            Some(Token::False) => Ok(Expr::Literal(Value::Bool(false))),
            Some(Token::Int(i)) => Ok(Expr::Literal(Value::Int(i))),
            Some(Token::Float(f)) => Ok(Expr::Literal(Value::Float(f))),
            Some(Token::Str(s)) => Ok(Expr::Literal(Value::Str(s))),
            Some(Token::LParen) => {
                let inner = self.parse_or()?;
                match self.advance() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err(ExprParseError::UnexpectedEof),
                }
            }
            Some(Token::Ident(name)) => {
                let loc = self.parse_location_suffix(Location::Name(name))?;
                Ok(Expr::Loc(loc))
            }
            Some(other) => Err(ExprParseError::UnexpectedToken(format!("{other:?}"))),
            None => Err(ExprParseError::UnexpectedEof),
        }
    }

    fn parse_location_suffix(&mut self, mut loc: Location) -> Result<Location, ExprParseError> {
        loop {
            match self.peek() {
                Some(Token::Dot) => {
                    self.advance();
                    match self.advance().cloned() {
                        Some(Token::Ident(name)) => loc = loc.attr(name),
                        _ => return Err(ExprParseError::UnexpectedEof),
                    }
                }
                Some(Token::LBracket) => {
                    self.advance();
                    let index = match self.advance().cloned() {
                        Some(Token::Int(i)) => {
                            Location::Const(crate::value::ConstValue::Int(i))
                        }
                        Some(Token::Ident(name)) => {
                            self.parse_location_suffix(Location::Name(name))?
                        }
                        _ => return Err(ExprParseError::UnexpectedEof),
                    };
                    match self.advance() {
                        Some(Token::RBracket) => {}
                        _ => return Err(ExprParseError::UnexpectedEof),
                    }
                    loc = loc.index(index);
                }
                _ => break,
            }
        }
        Ok(loc)
    }
}

/// Evaluate an expression, reading Locations through `location::evaluate` so
/// an undefined reference raises `UndefinedError` scoped to the offending
/// access, not a generic error.
pub fn eval(expr: &Expr, ctx: &Value) -> Result<Value, ExprEvalError> {
    match expr {
        Expr::Literal(v) => Ok(v.clone()),
        Expr::Loc(loc) => Ok(location::evaluate(loc, ctx)?),
        Expr::Not(inner) => {
            let v = eval(inner, ctx)?;
            let b = v.as_bool().ok_or(ExprEvalError::NotBool)?;
            Ok(Value::Bool(!b))
        }
        Expr::Binary(BinOp::And, lhs, rhs) => {
            let l = eval(lhs, ctx)?;
            let lb = l.as_bool().ok_or(ExprEvalError::NotBool)?;
            if !lb {
                return Ok(Value::Bool(false));
            }
            let r = eval(rhs, ctx)?;
            let rb = r.as_bool().ok_or(ExprEvalError::NotBool)?;
            Ok(Value::Bool(rb))
        }
        Expr::Binary(BinOp::Or, lhs, rhs) => {
            let l = eval(lhs, ctx)?;
            let lb = l.as_bool().ok_or(ExprEvalError::NotBool)?;
            if lb {
                return Ok(Value::Bool(true));
            }
            let r = eval(rhs, ctx)?;
            let rb = r.as_bool().ok_or(ExprEvalError::NotBool)?;
            Ok(Value::Bool(rb))
        }
        Expr::Binary(op @ (BinOp::Eq | BinOp::Ne), lhs, rhs) => {
            let l = eval(lhs, ctx)?;
            let r = eval(rhs, ctx)?;
            let equal = values_equal(&l, &r);
            Ok(Value::Bool(if *op == BinOp::Eq { equal } else { !equal }))
        }
        Expr::Binary(op, lhs, rhs) => {
            let l = eval(lhs, ctx)?;
            let r = eval(rhs, ctx)?;
            let lf = l
                .widen_to_float()
                .ok_or(ExprEvalError::Incomparable { op: op_name(*op) })?;
            let rf = r
                .widen_to_float()
                .ok_or(ExprEvalError::Incomparable { op: op_name(*op) })?;
            let result = match op {
                BinOp::Lt => lf < rf,
                BinOp::Le => lf <= rf,
                BinOp::Gt => lf > rf,
                BinOp::Ge => lf >= rf,
                _ => unreachable!("and/or/eq/ne handled above"),
            };
            Ok(Value::Bool(result))
        }
    }
}

fn op_name(op: BinOp) -> &'static str {
    match op {
        BinOp::Eq => "==",
        BinOp::Ne => "!=",
        BinOp::Lt => "<",
        BinOp::Le => "<=",
        BinOp::Gt => ">",
        BinOp::Ge => ">=",
        BinOp::And => "&&",
        BinOp::Or => "||",
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            a.widen_to_float() == b.widen_to_float()
        }
        _ => a == b,
    }
}

#[cfg(test)]
#[path = "expr_tests.rs"]
mod tests;
