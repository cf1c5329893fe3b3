// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `POST /update` (spec §6): the one endpoint the core requires of its
//! host. Decrypts the token, applies the submitted responses, advances
//! the interview by one step, and re-encrypts the result.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use stepflow_core::{AskResult, ExitResult, Value};
use stepflow_engine::{advance, AdvanceOutcome};

use crate::app::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub state: String,
    #[serde(default)]
    pub responses: Option<IndexMap<String, Value>>,
    #[serde(default)]
    pub button: Option<i64>,
}

/// The one object `content` ranges over besides `null` (spec §6). Both
/// variants already carry their own `type` discriminator, so this just
/// forwards whichever one fired.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Content {
    Ask(AskResult),
    Exit(ExitResult),
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum UpdateResponse {
    Advance {
        state: String,
        update_url: String,
        content: Content,
    },
    Completed {
        state: String,
        target_url: String,
        complete: bool,
    },
}

pub async fn update(
    State(app): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<UpdateRequest>,
) -> Result<Json<UpdateResponse>, ApiError> {
    let now = app.clock.now();

    let state = stepflow_storage::decrypt(&request.state, &app.key)?;

    let interview = app
        .config
        .by_id(&state.interview_id)
        .cloned()
        .ok_or_else(|| ApiError::UnknownInterview(state.interview_id.clone()))?;

    stepflow_storage::codec::validate(&state, now, Some(interview.version.as_str()))?;

    // Hook dispatch may block on subprocess/network I/O (spec §5), so the
    // whole scan runs on a blocking-pool thread rather than the async
    // executor — the same shape as `oj-daemon`'s `spawn_blocking` around a
    // synchronous child-process wait.
    let blocking_app = app.clone();
    let responses = request.responses.clone();
    let button = request.button;
    let (next_state, outcome) = tokio::task::spawn_blocking(move || {
        advance(
            &interview,
            &state,
            blocking_app.dispatcher.as_ref(),
            responses.as_ref(),
            button,
            blocking_app.clock.as_ref(),
        )
    })
    .await
    .map_err(|e| ApiError::Internal(format!("stepper task panicked: {e}")))??;

    let token = stepflow_storage::encrypt(&next_state, &app.key)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let response = match outcome {
        AdvanceOutcome::Ask(ask) => UpdateResponse::Advance {
            state: token,
            update_url: update_url(&app, &headers),
            content: Content::Ask(*ask),
        },
        AdvanceOutcome::Exit(exit) => UpdateResponse::Advance {
            state: token,
            update_url: update_url(&app, &headers),
            content: Content::Exit(*exit),
        },
        AdvanceOutcome::Completed => UpdateResponse::Completed {
            state: token,
            target_url: next_state.target_url.clone(),
            complete: true,
        },
    };

    Ok(Json(response))
}

/// Build the absolute URL of this same endpoint from the request's `Host`
/// header and the configured scheme/root path. There is no trusted
/// forwarded-header handling here (spec §1 non-goal) — a reverse proxy
/// that terminates TLS in front of this service is expected to set
/// `STEPFLOW_ROOT_PATH`/the scheme appropriately rather than have this
/// layer parse `X-Forwarded-*` itself.
fn update_url(app: &AppState, headers: &HeaderMap) -> String {
    let host = headers
        .get(axum::http::header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    format!("{}://{}{}/update", app.scheme, host, app.root_path)
}

#[cfg(test)]
#[path = "update_tests.rs"]
mod tests;
