// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The CLI's own error taxonomy, wrapping every lower crate's errors behind
//! one type `main` can render and turn into an exit code.

use stepflow_config::ConfigError;
use stepflow_core::InterviewId;
use stepflow_engine::StepperError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("no STEPFLOW_CONFIG_FILE set and no --config given")]
    NoConfigFile,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("unknown interview {0}")]
    UnknownInterview(InterviewId),
    #[error(transparent)]
    Stepper(#[from] StepperError),
    #[error("failed to read from stdin: {0}")]
    Io(#[from] std::io::Error),
}
