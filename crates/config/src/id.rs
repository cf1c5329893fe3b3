// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Interview id format validation (spec §6: `[A-Za-z][A-Za-z0-9_-]*`, no
//! trailing `-`).

use crate::error::ConfigError;
use stepflow_core::InterviewId;

pub fn parse_interview_id(raw: &str) -> Result<InterviewId, ConfigError> {
    let valid = {
        let mut chars = raw.chars();
        let first_ok = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
        let rest_ok = chars
            .clone()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        let no_trailing_dash = !raw.ends_with('-');
        first_ok && rest_ok && no_trailing_dash
    };
    if !valid {
        return Err(ConfigError::InvalidInterviewId(raw.to_string()));
    }
    Ok(InterviewId::new(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_ids() {
        assert!(parse_interview_id("test1").is_ok());
        assert!(parse_interview_id("a-b_c1").is_ok());
    }

    #[test]
    fn rejects_leading_digit() {
        assert!(parse_interview_id("1test").is_err());
    }

    #[test]
    fn rejects_trailing_dash() {
        assert!(parse_interview_id("test-").is_err());
    }

    #[test]
    fn rejects_empty() {
        assert!(parse_interview_id("").is_err());
    }
}
