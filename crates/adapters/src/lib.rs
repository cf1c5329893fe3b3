// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! stepflow-adapters: concrete hook transports (spec §4.8).
//!
//! `stepflow-core` defines the [`stepflow_core::HookConfig`] sum type and
//! the [`stepflow_core::HookDispatcher`] seam a `Hook` step calls through,
//! but stays free of `tokio`/`reqwest`/process-spawning dependencies. This
//! crate supplies the three concrete backends spec §4.8 names — inline,
//! executable, http — plus a [`CompositeDispatcher`] that routes each
//! `HookConfig` variant to the matching backend, wrapped in a tracing span
//! the way `oj-adapters::traced` wraps its session/agent adapters.

pub mod dispatcher;
pub mod executable;
pub mod http;
pub mod inline;
pub mod wire;

pub use dispatcher::{CompositeDispatcher, HookTimeouts};
pub use executable::ExecutableHookRunner;
pub use http::HttpHookRunner;
pub use inline::{InlineFn, InlineRegistry};
