// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `InterviewState`: the continuation carried inside a state token (spec §3).
//!
//! Value-typed and immutable in spirit: every mutation in this crate and in
//! `stepflow-engine` produces a new `InterviewState` rather than mutating one
//! in place (spec §9 "Immutability").

use crate::id::{InterviewId, QuestionId, SubmissionId};
use crate::value::Value;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The default lifetime of a freshly created state, matching the source
/// engine's `DEFAULT_INTERVIEW_EXPIRATION` of 1800 seconds.
pub const DEFAULT_EXPIRATION_SECONDS: i64 = 1800;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewState {
    pub submission_id: SubmissionId,
    pub interview_id: InterviewId,
    pub interview_version: String,
    pub expiration_date: DateTime<Utc>,
    pub target_url: String,
    #[serde(default)]
    pub complete: bool,
    #[serde(default)]
    pub context: IndexMap<String, Value>,
    /// Serialized as a sorted array (spec §4.9 "sets as sorted arrays").
    #[serde(default)]
    pub answered_question_ids: BTreeSet<QuestionId>,
    #[serde(default)]
    pub question_id: Option<QuestionId>,
    #[serde(default)]
    pub data: IndexMap<String, Value>,
}

impl InterviewState {
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        submission_id: SubmissionId,
        interview_id: InterviewId,
        interview_version: impl Into<String>,
        target_url: impl Into<String>,
        now: DateTime<Utc>,
        context: IndexMap<String, Value>,
    ) -> Self {
        InterviewState {
            submission_id,
            interview_id,
            interview_version: interview_version.into(),
            expiration_date: now + chrono::Duration::seconds(DEFAULT_EXPIRATION_SECONDS),
            target_url: target_url.into(),
            complete: false,
            context,
            answered_question_ids: BTreeSet::new(),
            question_id: None,
            data: IndexMap::new(),
        }
    }

    /// The union `{...data, ...context}` used as the template context (spec
    /// §3): `data` keys shadow `context` keys.
    pub fn template_context(&self) -> Value {
        let mut merged = self.context.clone();
        for (k, v) in &self.data {
            merged.insert(k.clone(), v.clone());
        }
        Value::Map(merged)
    }

    pub fn data_value(&self) -> Value {
        Value::Map(self.data.clone())
    }

    pub fn set_data_value(&mut self, v: Value) {
        if let Value::Map(m) = v {
            self.data = m;
        }
    }

    /// Record `question_id` as the one currently awaiting an answer, adding
    /// it to `answered_question_ids`. Spec §9: this happens *before* the
    /// answer arrives, so a rejected/retried answer does not re-trigger a
    /// fresh step scan — the retry lands on the same stored `question_id`.
    pub fn update_with_question(&self, question_id: QuestionId) -> Self {
        let mut next = self.clone();
        next.answered_question_ids.insert(question_id.clone());
        next.question_id = Some(question_id);
        next
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expiration_date
    }
}

#[cfg(any(test, feature = "test-support"))]
impl InterviewState {
    /// Minimal state for unit tests elsewhere in the workspace that only
    /// need *a* state value, not a specific one.
    pub fn new_test() -> Self {
        InterviewState::create(
            SubmissionId::new("sub-1"),
            InterviewId::new("test"),
            "1",
            "http://localhost/target",
            DateTime::<Utc>::from_timestamp(0, 0).expect("epoch is representable"),
            IndexMap::new(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_context_merges_data_over_context() {
        let mut state = InterviewState::new_test();
        state.context.insert("a".into(), Value::Int(1));
        state.context.insert("b".into(), Value::Int(2));
        state.data.insert("a".into(), Value::Int(99));

        let ctx = state.template_context();
        let map = ctx.as_map().unwrap();
        assert_eq!(map.get("a"), Some(&Value::Int(99)));
        assert_eq!(map.get("b"), Some(&Value::Int(2)));
    }

    #[test]
    fn update_with_question_is_monotone() {
        let state = InterviewState::new_test();
        let q1 = QuestionId::new("q1");
        let next = state.update_with_question(q1.clone());
        assert_eq!(next.question_id, Some(q1.clone()));
        assert!(next.answered_question_ids.contains(&q1));

        let q2 = QuestionId::new("q2");
        let next2 = next.update_with_question(q2.clone());
        assert!(next2.answered_question_ids.contains(&q1));
        assert!(next2.answered_question_ids.contains(&q2));
    }

    #[test]
    fn is_expired_uses_inclusive_now() {
        let state = InterviewState::new_test();
        assert!(state.is_expired(state.expiration_date));
        assert!(!state.is_expired(state.expiration_date - chrono::Duration::seconds(1)));
    }
}
