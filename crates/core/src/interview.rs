// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `Interview`: a loaded, validated interview definition (spec §3, §4.4,
//! §4.5).
//!
//! Building an `Interview` is the one place duplicate question ids are a
//! hard error (spec §9 hardening note) rather than the permissive
//! last-definition-wins [`QuestionBank::build`] falls back to when handed
//! raw questions directly — by the time an `Interview` exists, its
//! `QuestionBank` is known to contain exactly the questions it was given.

use crate::condition::Condition;
use crate::id::{InterviewId, QuestionId};
use crate::question::Question;
use crate::question_bank::QuestionBank;
use crate::step::{flatten_steps, Step, StepOrBlock};
use crate::template::Template;
use std::collections::HashSet;
use thiserror::Error;

/// A fully loaded interview: its questions indexed into a [`QuestionBank`]
/// and its step tree flattened ready for the stepper to scan.
#[derive(Debug, Clone)]
pub struct Interview {
    pub id: InterviewId,
    pub version: String,
    pub title: Option<Template>,
    pub questions: Vec<Question>,
    pub steps: Vec<StepOrBlock>,
    pub flattened_steps: Vec<Step>,
    pub bank: QuestionBank,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum InterviewBuildError {
    #[error("duplicate question id {0}")]
    DuplicateQuestionId(QuestionId),
    #[error("step references unknown question id {0}")]
    UnknownQuestion(QuestionId),
}

impl Interview {
    /// Validate and index a parsed interview. Both checks this performs —
    /// no duplicate question ids, every `Ask.ask` resolves — are load-time
    /// concerns; neither can surface once the interview is running.
    pub fn build(
        id: InterviewId,
        version: impl Into<String>,
        title: Option<Template>,
        questions: Vec<Question>,
        steps: Vec<StepOrBlock>,
    ) -> Result<Self, InterviewBuildError> {
        let mut seen = HashSet::new();
        for q in &questions {
            if !seen.insert(q.id.clone()) {
                return Err(InterviewBuildError::DuplicateQuestionId(q.id.clone()));
            }
        }

        let flattened_steps = flatten_steps(&steps);
        let bank = QuestionBank::build(questions.clone());

        for step in &flattened_steps {
            if let Step::Ask(ask) = step {
                if bank.by_id(&ask.ask).is_none() {
                    return Err(InterviewBuildError::UnknownQuestion(ask.ask.clone()));
                }
            }
        }

        Ok(Interview {
            id,
            version: version.into(),
            title,
            questions,
            steps,
            flattened_steps,
            bank,
        })
    }

    /// Questions whose own `when` is unconditionally true, i.e. never gated
    /// — a convenience used by `stepflow-cli`'s dev loop to sanity-check a
    /// runbook before driving it interactively.
    pub fn unconditional_questions(&self) -> impl Iterator<Item = &Question> {
        self.questions
            .iter()
            .filter(|q| q.when == Condition::always())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Field, FieldKind};
    use crate::location;
    use crate::step::Ask;

    fn field(set: &str) -> Field {
        Field {
            set: Some(location::parse(set).unwrap()),
            optional: false,
            default: None,
            label: None,
            require_value: None,
            require_value_message: None,
            kind: FieldKind::Text {
                min: None,
                max: None,
                regex: None,
                regex_js: None,
            },
        }
    }

    fn question(id: &str, provides: &str) -> Question {
        Question {
            id: QuestionId::new(id),
            title: None,
            description: None,
            fields: vec![field(provides)],
            buttons: None,
            buttons_set: None,
            when: Condition::always(),
        }
    }

    #[test]
    fn build_rejects_duplicate_question_ids() {
        let err = Interview::build(
            InterviewId::new("iv"),
            "1",
            None,
            vec![question("q1", "a"), question("q1", "b")],
            vec![],
        )
        .unwrap_err();
        assert_eq!(err, InterviewBuildError::DuplicateQuestionId(QuestionId::new("q1")));
    }

    #[test]
    fn build_rejects_ask_of_unknown_question() {
        let steps = vec![StepOrBlock::Ask(Ask {
            ask: QuestionId::new("missing"),
            when: Condition::always(),
        })];
        let err = Interview::build(InterviewId::new("iv"), "1", None, vec![question("q1", "a")], steps)
            .unwrap_err();
        assert_eq!(err, InterviewBuildError::UnknownQuestion(QuestionId::new("missing")));
    }

    #[test]
    fn build_succeeds_and_indexes_questions() {
        let steps = vec![StepOrBlock::Ask(Ask {
            ask: QuestionId::new("q1"),
            when: Condition::always(),
        })];
        let interview = Interview::build(
            InterviewId::new("iv"),
            "1",
            Some(Template::parse("My interview").unwrap()),
            vec![question("q1", "a")],
            steps,
        )
        .unwrap();
        assert_eq!(interview.flattened_steps.len(), 1);
        assert!(interview.bank.by_id(&QuestionId::new("q1")).is_some());
    }
}
