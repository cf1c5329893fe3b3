// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The YAML shapes as they appear on disk, before id/regex validation and
//! `QuestionBank` indexing turn them into `stepflow_core::Interview` (spec
//! §6).

use serde::Deserialize;
use stepflow_core::step::StepOrBlock;
use stepflow_core::{Question, Template};

#[derive(Debug, Deserialize)]
pub struct RawConfig {
    #[serde(default)]
    pub interviews: Vec<RawInterview>,
}

#[derive(Debug, Deserialize)]
pub struct RawInterview {
    pub id: String,
    /// Not named in spec.md's YAML sketch (§6), but `InterviewState`
    /// carries an `interview_version` the codec validates against — an
    /// interview needs some version string to compare. Defaults to `"1"`.
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub title: Option<Template>,
    #[serde(default)]
    pub questions: Vec<QuestionSource>,
    #[serde(default)]
    pub steps: Vec<StepOrBlock>,
}

fn default_version() -> String {
    "1".to_string()
}

/// One entry of `questions:` — either an inline question definition, or a
/// path to a YAML file listing questions (spec §6: "a path to a YAML file
/// listing Questions").
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum QuestionSource {
    Path(String),
    Inline(Box<Question>),
}
