// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Question: fields plus optional buttons, bundled with a `when` guard
//! (spec §4.4).

use crate::condition::Condition;
use crate::field::{AskField, Field, FieldError};
use crate::id::QuestionId;
use crate::location::Location;
use crate::template::{Template, TemplateRenderError};
use crate::value::Value;
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Button {
    pub label: Template,
    pub value: Value,
    #[serde(default)]
    pub primary: bool,
    #[serde(default)]
    pub default: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Question {
    pub id: QuestionId,
    #[serde(default)]
    pub title: Option<Template>,
    #[serde(default)]
    pub description: Option<Template>,
    pub fields: Vec<Field>,
    #[serde(default)]
    pub buttons: Option<Vec<Button>>,
    #[serde(default)]
    pub buttons_set: Option<Location>,
    #[serde(default = "Condition::always")]
    pub when: Condition,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum QuestionError {
    #[error("field_{index}: {source}")]
    Field { index: usize, source: FieldError },
    #[error("a button selection is required")]
    ButtonRequired,
    #[error("button index {0} is out of range")]
    ButtonOutOfRange(i64),
    #[error("response for field_{0} is missing")]
    MissingFieldResponse(usize),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AskResultError {
    #[error(transparent)]
    Render(#[from] TemplateRenderError),
}

/// A rendered question, ready to present to the client.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AskResult {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub fields: IndexMap<String, AskField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buttons: Option<Vec<RenderedButton>>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RenderedButton {
    pub label: String,
    pub primary: bool,
    pub default: bool,
}

impl Question {
    /// The set of distinct, non-null locations this question's fields write
    /// to. Computed fresh each call from `fields`; callers that need it
    /// repeatedly (the QuestionBank index) should cache it.
    pub fn provides(&self) -> Vec<Location> {
        let mut seen = Vec::new();
        for field in &self.fields {
            if let Some(loc) = &field.set {
                if !seen.contains(loc) {
                    seen.push(loc.clone());
                }
            }
        }
        seen
    }

    fn field_slot(index: usize) -> String {
        format!("field_{index}")
    }

    /// Parse a submitted response map (plus an optional button index) into
    /// the path→value assignments the stepper should apply.
    #[allow(clippy::expect_used)]
    pub fn parse_response(
        &self,
        responses: Option<&IndexMap<String, Value>>,
        button: Option<i64>,
        today: NaiveDate,
    ) -> Result<Vec<(Location, Value)>, QuestionError> {
        let empty = IndexMap::new();
        let responses = responses.unwrap_or(&empty);
        let mut assignments = Vec::new();

        for (index, field) in self.fields.iter().enumerate() {
            let slot = Self::field_slot(index);
            let raw = responses.get(&slot).cloned().unwrap_or(Value::Null);
            let coerced = field
                .coerce_and_validate(&raw, today)
                .map_err(|source| QuestionError::Field { index, source })?;
            if let Some(loc) = &field.set {
                assignments.push((loc.clone(), coerced));
            }
        }

        if self.buttons.is_some() {
            let chosen = button.ok_or(QuestionError::ButtonRequired)?;
            let buttons = self.buttons.as_ref().expect("checked above");
            let pos = usize::try_from(chosen)
                .ok()
                .filter(|p| *p < buttons.len())
                .ok_or(QuestionError::ButtonOutOfRange(chosen))?;
            if let Some(loc) = &self.buttons_set {
                assignments.push((loc.clone(), buttons[pos].value.clone()));
            }
        }

        Ok(assignments)
    }

    /// Render this question for presentation to the client.
    pub fn ask_result(&self, ctx: &Value) -> Result<AskResult, AskResultError> {
        let title = self.title.as_ref().map(|t| t.render(ctx)).transpose()?;
        let description = self.description.as_ref().map(|t| t.render(ctx)).transpose()?;
        let mut fields = IndexMap::new();
        for (index, field) in self.fields.iter().enumerate() {
            fields.insert(Self::field_slot(index), field.render(ctx)?);
        }
        let buttons = self
            .buttons
            .as_ref()
            .map(|buttons| {
                buttons
                    .iter()
                    .map(|b| {
                        Ok(RenderedButton {
                            label: b.label.render(ctx)?,
                            primary: b.primary,
                            default: b.default,
                        })
                    })
                    .collect::<Result<Vec<_>, AskResultError>>()
            })
            .transpose()?;
        Ok(AskResult {
            kind: "question",
            title,
            description,
            fields,
            buttons,
        })
    }
}

#[cfg(test)]
#[path = "question_tests.rs"]
mod tests;
