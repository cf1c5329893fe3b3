// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! stepflow-server: the one HTTP endpoint spec §6 requires of a host
//! (`POST /update`), wiring `stepflow-config`, `stepflow-engine`, and
//! `stepflow-storage` together (SPEC_FULL.md §2, `oj-daemon` analogue with
//! the axum wiring style borrowed from `agentgateway`).

pub mod app;
pub mod env;
pub mod error;
pub mod routes;

pub use app::AppState;
pub use error::ApiError;

use axum::routing::post;
use axum::Router;
use tower_http::trace::TraceLayer;

/// Build the service router. Tracing middleware is ambient (spec §1's
/// "CORS/forwarded-header middleware" non-goal does not extend to request
/// logging; SPEC_FULL.md §1 expansion keeps `tracing`/`tower-http` on the
/// same footing as every other `stepflow` crate).
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/update", post(routes::update))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
