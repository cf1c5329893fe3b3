// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resolves a `RawInterview` into a validated `stepflow_core::Interview`:
//! loads external question files, compiles every `regex` field once to
//! catch bad patterns at load time, then hands off to
//! `Interview::build` for the id/ask-reference checks spec.md already
//! assigns to that layer (spec §4.4, §4.5, §7).

use crate::error::ConfigError;
use crate::raw::{QuestionSource, RawInterview};
use crate::source::read_yaml;
use std::path::Path;
use stepflow_core::field::FieldKind;
use stepflow_core::{Interview, InterviewId, Question};

pub fn build_interview(
    id: InterviewId,
    raw: RawInterview,
    base_dir: &Path,
) -> Result<Interview, ConfigError> {
    let questions = resolve_questions(raw.questions, base_dir)?;
    check_regexes(&id, &questions)?;

    Interview::build(id.clone(), raw.version, raw.title, questions, raw.steps)
        .map_err(|source| ConfigError::Build { interview: id, source })
}

fn resolve_questions(
    sources: Vec<QuestionSource>,
    base_dir: &Path,
) -> Result<Vec<Question>, ConfigError> {
    let mut out = Vec::new();
    for source in sources {
        match source {
            QuestionSource::Inline(q) => out.push(*q),
            QuestionSource::Path(relative) => {
                let full_path = base_dir.join(&relative);
                let questions: Vec<Question> = read_yaml(&full_path)?;
                out.extend(questions);
            }
        }
    }
    Ok(out)
}

fn check_regexes(interview: &InterviewId, questions: &[Question]) -> Result<(), ConfigError> {
    for question in questions {
        for field in &question.fields {
            if let FieldKind::Text { regex: Some(pattern), .. } = &field.kind {
                regex::Regex::new(pattern).map_err(|source| ConfigError::InvalidRegex {
                    interview: interview.clone(),
                    pattern: pattern.clone(),
                    source,
                })?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepflow_core::step::StepOrBlock;

    #[test]
    fn rejects_invalid_regex() {
        let yaml = r#"
id: q1
fields:
  - type: text
    set: name
    regex: "[unclosed"
"#;
        let question: Question = serde_yaml::from_str(yaml).unwrap();
        let err = check_regexes(&InterviewId::new("iv"), std::slice::from_ref(&question))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRegex { .. }));
    }

    #[test]
    fn build_interview_resolves_empty_question_list() {
        let raw = RawInterview {
            id: "iv".to_string(),
            version: "1".to_string(),
            title: None,
            questions: Vec::new(),
            steps: Vec::<StepOrBlock>::new(),
        };
        let interview =
            build_interview(InterviewId::new("iv"), raw, Path::new(".")).unwrap();
        assert!(interview.bank.is_empty());
    }
}
