// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI crate.

use std::path::PathBuf;

/// `STEPFLOW_CONFIG_FILE`: default interview config path when `--config`
/// is not given.
pub fn config_file() -> Option<PathBuf> {
    std::env::var("STEPFLOW_CONFIG_FILE").ok().map(PathBuf::from)
}

pub fn no_color() -> bool {
    std::env::var("NO_COLOR").is_ok_and(|v| v == "1")
}

pub fn force_color() -> bool {
    std::env::var("COLOR").is_ok_and(|v| v == "1")
}
