// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The stepper's error taxonomy (spec §7): everything `advance` can fail
//! with once `Undefined` has already been turned into an `Ask` or
//! exhausted into [`StepperError::NoQuestionForLocation`].

use stepflow_core::{AssignError, Location, QuestionError, QuestionId, StepError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StepperError {
    /// `advance` was called against a state whose `complete` flag is
    /// already set (spec §4.7 step 1).
    #[error("interview is already complete")]
    AlreadyComplete,
    /// A submitted response failed field parsing/validation (spec §7
    /// "Validation" — recoverable, does not mutate state).
    #[error(transparent)]
    Validation(#[from] QuestionError),
    /// `state.question_id` names a question absent from the bank. Only
    /// reachable if the host hands the stepper a state token from a
    /// different (or since-edited) interview version.
    #[error("state references unknown current question {0}")]
    UnknownCurrentQuestion(QuestionId),
    #[error(transparent)]
    Assign(#[from] AssignError),
    /// A step body failed for a reason other than `Undefined` — the one
    /// signal the scan loop consumes itself rather than surfacing (spec
    /// §4.6 "Critical behavior").
    #[error(transparent)]
    Step(#[from] StepError),
    /// `Undefined(L)` during step handling and no question in the bank
    /// provides `L` (spec §7 "NoQuestionForLocation" — author bug,
    /// 500-class).
    #[error("no question provides location {0}")]
    NoQuestionForLocation(Location),
}
