// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared state for every request handler, wired once at startup — the
//! axum analogue of `oj-daemon::listener::ListenCtx`.

use std::sync::Arc;
use stepflow_config::Config;
use stepflow_core::{Clock, HookDispatcher};
use stepflow_storage::TokenKey;

/// Everything a request handler needs, shared (read-only after startup)
/// across every request (spec §5: "`QuestionBank` and `Interview` are
/// immutable after construction and may be shared across requests without
/// locks").
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub key: TokenKey,
    pub dispatcher: Arc<dyn HookDispatcher>,
    pub clock: Arc<dyn Clock>,
    /// Mounted path prefix used only to build `update_url`
    /// (spec §6 "a root path prefix for the service may be configured").
    pub root_path: String,
    /// Scheme used to build `update_url` when no forwarding proxy
    /// information is trusted — CORS/forwarded-header handling is an
    /// explicit non-goal of the core (spec §1).
    pub scheme: String,
}
