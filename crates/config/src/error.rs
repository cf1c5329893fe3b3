// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration error taxonomy (spec §7 "Configuration" — fatal at load).

use stepflow_core::{InterviewBuildError, InterviewId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error(
        "invalid interview id {0:?}: must match [A-Za-z][A-Za-z0-9_-]* with no trailing '-'"
    )]
    InvalidInterviewId(String),
    #[error("duplicate interview id {0}")]
    DuplicateInterviewId(InterviewId),
    #[error("interview {interview}: invalid regex {pattern:?}: {source}")]
    InvalidRegex {
        interview: InterviewId,
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("interview {interview}: {source}")]
    Build {
        interview: InterviewId,
        #[source]
        source: InterviewBuildError,
    },
}
