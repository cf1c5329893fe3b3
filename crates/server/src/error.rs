// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Maps every taxonomy entry spec §7 names onto the HTTP status codes spec
//! §6 documents for `POST /update` — the one boundary point where
//! `stepflow-core`/`-engine`/`-storage` errors become a response, matching
//! how `oj-daemon`'s thin layer turns `RuntimeError` into process-level
//! outcomes without the lower crates knowing about HTTP.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use stepflow_core::InterviewId;
use stepflow_engine::StepperError;
use stepflow_storage::TokenError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body was not well-formed JSON, or `state` failed to
    /// decode/decrypt/parse, expired, or named the wrong interview version
    /// (spec §7 "InvalidState" -> 409).
    #[error(transparent)]
    InvalidState(#[from] TokenError),
    #[error("unknown interview {0}")]
    UnknownInterview(InterviewId),
    /// A submitted response was malformed or violated a field's
    /// constraints (spec §7 "Validation" -> 422). Does not mutate state.
    #[error("{0}")]
    Validation(String),
    /// `Undefined` during step handling with no question in the bank
    /// providing the missing location (spec §7 "NoQuestionForLocation" ->
    /// 500-class; author bug).
    #[error("{0}")]
    Internal(String),
}

impl From<StepperError> for ApiError {
    fn from(e: StepperError) -> Self {
        match e {
            StepperError::Validation(source) => ApiError::Validation(source.to_string()),
            StepperError::AlreadyComplete => ApiError::Validation(e.to_string()),
            StepperError::UnknownCurrentQuestion(_)
            | StepperError::Assign(_)
            | StepperError::Step(_)
            | StepperError::NoQuestionForLocation(_) => ApiError::Internal(e.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidState(_) => StatusCode::CONFLICT,
            ApiError::UnknownInterview(_) | ApiError::Validation(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if matches!(status, StatusCode::INTERNAL_SERVER_ERROR) {
            tracing::error!(error = %self, "update request failed");
        } else {
            tracing::info!(error = %self, %status, "update request rejected");
        }
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
