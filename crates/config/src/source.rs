// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File reading helpers shared by the top-level config loader and external
//! question-file resolution (spec §6: "Relative paths resolve against the
//! file containing them").

use crate::error::ConfigError;
use serde::de::DeserializeOwned;
use std::path::Path;

pub fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
        path: path.display().to_string(),
        source,
    })
}
