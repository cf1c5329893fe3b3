// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! stepflow-config: loads the interview configuration file (spec §6).
//!
//! Parses YAML, resolves `path:` references to external question files
//! relative to the file that names them (mirroring how
//! `oj-runbook::import` resolves relative runbook imports against the
//! importing file's directory), and runs every load-time "Configuration"
//! check spec §7 assigns this layer: interview id format, no duplicate
//! interview ids, every `regex` field compiles, and (delegated to
//! `stepflow-core::Interview::build`) no duplicate question ids and every
//! `Ask.ask` resolves. Any failure here is fatal to the process (spec §7).

pub mod error;
mod id;
mod raw;
mod source;
mod validate;

pub use error::ConfigError;

use std::path::Path;
use stepflow_core::Interview;

/// The full set of interviews loaded from one configuration file (spec §6:
/// `interviews: [...]`).
#[derive(Debug, Clone)]
pub struct Config {
    pub interviews: Vec<Interview>,
}

impl Config {
    pub fn by_id(&self, id: &stepflow_core::InterviewId) -> Option<&Interview> {
        self.interviews.iter().find(|iv| &iv.id == id)
    }
}

/// Load and validate the interview configuration rooted at `path`.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let raw_config: raw::RawConfig = source::read_yaml(path)?;

    let mut interviews = Vec::with_capacity(raw_config.interviews.len());
    let mut seen_ids = std::collections::HashSet::new();
    for raw_interview in raw_config.interviews {
        let id = id::parse_interview_id(&raw_interview.id)?;
        if !seen_ids.insert(id.clone()) {
            return Err(ConfigError::DuplicateInterviewId(id));
        }
        interviews.push(validate::build_interview(id, raw_interview, base_dir)?);
    }

    tracing::info!(count = interviews.len(), path = %path.display(), "loaded interview config");
    Ok(Config { interviews })
}
