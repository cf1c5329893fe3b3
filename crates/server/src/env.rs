// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the server crate (spec §6
//! "Environment").

use std::path::PathBuf;

/// Path to a file containing a base64 32-byte state-token key.
pub fn encryption_key_file() -> Option<PathBuf> {
    std::env::var("STEPFLOW_ENCRYPTION_KEY_FILE").ok().map(PathBuf::from)
}

/// Path to the interviews YAML configuration.
pub fn config_file() -> Option<PathBuf> {
    std::env::var("STEPFLOW_CONFIG_FILE").ok().map(PathBuf::from)
}

/// A root path prefix the service is mounted under, e.g. `/interview`, used
/// only to build the `update_url` returned alongside each `Ask`/`Exit`
/// result. Empty by default.
pub fn root_path() -> String {
    std::env::var("STEPFLOW_ROOT_PATH").unwrap_or_default()
}

/// `host:port` to bind the HTTP listener to.
pub fn bind_addr() -> String {
    std::env::var("STEPFLOW_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string())
}
