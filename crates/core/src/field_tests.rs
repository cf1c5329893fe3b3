// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::NaiveDate;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 7, 28).unwrap()
}

fn text_field(optional: bool) -> Field {
    Field {
        set: None,
        optional,
        default: None,
        label: None,
        require_value: None,
        require_value_message: None,
        kind: FieldKind::Text {
            min: None,
            max: None,
            regex: None,
            regex_js: None,
        },
    }
}

#[test]
fn text_field_trims_and_accepts_string() {
    let f = text_field(false);
    let v = f.coerce_and_validate(&Value::Str("  hi  ".into()), today()).unwrap();
    assert_eq!(v, Value::Str("hi".into()));
}

#[test]
fn text_field_empty_optional_becomes_null() {
    let f = text_field(true);
    let v = f.coerce_and_validate(&Value::Str("   ".into()), today()).unwrap();
    assert_eq!(v, Value::Null);
}

#[test]
fn text_field_empty_required_errors() {
    let f = text_field(false);
    assert!(f.coerce_and_validate(&Value::Str("".into()), today()).is_err());
}

#[test]
fn text_field_rejects_non_string() {
    let f = text_field(false);
    assert!(f.coerce_and_validate(&Value::Int(1), today()).is_err());
}

#[test]
fn text_field_enforces_min_max_length() {
    let mut f = text_field(false);
    f.kind = FieldKind::Text {
        min: Some(3),
        max: Some(5),
        regex: None,
        regex_js: None,
    };
    assert!(f.coerce_and_validate(&Value::Str("ab".into()), today()).is_err());
    assert!(f.coerce_and_validate(&Value::Str("abcdef".into()), today()).is_err());
    assert!(f.coerce_and_validate(&Value::Str("abcd".into()), today()).is_ok());
}

#[test]
fn text_field_enforces_server_regex() {
    let mut f = text_field(false);
    f.kind = FieldKind::Text {
        min: None,
        max: None,
        regex: Some("^[a-z]+$".into()),
        regex_js: None,
    };
    assert!(f.coerce_and_validate(&Value::Str("ABC".into()), today()).is_err());
    assert!(f.coerce_and_validate(&Value::Str("abc".into()), today()).is_ok());
}

#[test]
fn bool_field_rejects_non_bool_values() {
    let f = Field {
        set: None,
        optional: false,
        default: None,
        label: None,
        require_value: None,
        require_value_message: None,
        kind: FieldKind::Bool,
    };
    assert!(f.coerce_and_validate(&Value::Bool(true), today()).is_ok());
    assert!(f.coerce_and_validate(&Value::Int(1), today()).is_err());
    assert!(f.coerce_and_validate(&Value::Str("true".into()), today()).is_err());
}

fn number_field(min: Option<f64>, max: Option<f64>, integer: bool) -> Field {
    Field {
        set: None,
        optional: false,
        default: None,
        label: None,
        require_value: None,
        require_value_message: None,
        kind: FieldKind::Number { min, max, integer },
    }
}

#[test]
fn number_field_enforces_range() {
    let f = number_field(Some(0.0), Some(10.0), false);
    assert!(f.coerce_and_validate(&Value::Int(5), today()).is_ok());
    assert!(f.coerce_and_validate(&Value::Int(11), today()).is_err());
    assert!(f.coerce_and_validate(&Value::Float(2.5), today()).is_ok());
}

#[test]
fn number_field_integer_flag_rejects_float() {
    let f = number_field(None, None, true);
    assert!(f.coerce_and_validate(&Value::Float(1.5), today()).is_err());
    assert!(f.coerce_and_validate(&Value::Int(1), today()).is_ok());
}

fn date_field(min: Option<DateBound>, max: Option<DateBound>) -> Field {
    Field {
        set: None,
        optional: false,
        default: None,
        label: None,
        require_value: None,
        require_value_message: None,
        kind: FieldKind::Date { min, max },
    }
}

#[test]
fn date_field_resolves_today_sentinel() {
    let f = date_field(None, Some(DateBound::Today));
    let v = f
        .coerce_and_validate(&Value::Str("2026-07-28".into()), today())
        .unwrap();
    assert_eq!(v, Value::Str("2026-07-28".into()));
}

#[test]
fn date_field_rejects_date_after_max() {
    let f = date_field(None, Some(DateBound::Today));
    assert!(f
        .coerce_and_validate(&Value::Str("2026-08-01".into()), today())
        .is_err());
}

#[test]
fn date_field_honors_literal_min() {
    let f = date_field(
        Some(DateBound::Literal(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap())),
        None,
    );
    assert!(f
        .coerce_and_validate(&Value::Str("2019-12-31".into()), today())
        .is_err());
    assert!(f
        .coerce_and_validate(&Value::Str("2020-01-01".into()), today())
        .is_ok());
}

fn select_field(options: Vec<(&str, Value)>, min: usize, max: usize) -> Field {
    Field {
        set: None,
        optional: false,
        default: None,
        label: None,
        require_value: None,
        require_value_message: None,
        kind: FieldKind::Select {
            options: options
                .into_iter()
                .map(|(label, value)| SelectOption {
                    label: Template::parse(label).unwrap(),
                    value,
                })
                .collect(),
            min,
            max,
        },
    }
}

#[test]
fn select_field_translates_single_index_to_value() {
    let f = select_field(
        vec![("Red", Value::Str("red".into())), ("Blue", Value::Str("blue".into()))],
        1,
        1,
    );
    let v = f.coerce_and_validate(&Value::Int(2), today()).unwrap();
    assert_eq!(v, Value::Str("blue".into()));
}

#[test]
fn select_field_out_of_range_index_errors() {
    let f = select_field(vec![("Red", Value::Str("red".into()))], 1, 1);
    assert!(f.coerce_and_validate(&Value::Int(5), today()).is_err());
}

#[test]
fn select_field_rejects_duplicate_indices() {
    let f = select_field(
        vec![("Red", Value::Str("red".into())), ("Blue", Value::Str("blue".into()))],
        1,
        2,
    );
    assert!(f
        .coerce_and_validate(&Value::List(vec![Value::Int(1), Value::Int(1)]), today())
        .is_err());
}

#[test]
fn select_field_multi_cardinality_returns_list() {
    let f = select_field(
        vec![("Red", Value::Str("red".into())), ("Blue", Value::Str("blue".into()))],
        1,
        2,
    );
    let v = f
        .coerce_and_validate(&Value::List(vec![Value::Int(1), Value::Int(2)]), today())
        .unwrap();
    assert_eq!(
        v,
        Value::List(vec![Value::Str("red".into()), Value::Str("blue".into())])
    );
}

#[test]
fn require_value_mismatch_errors_with_custom_message() {
    let mut f = text_field(false);
    f.require_value = Some(Value::Str("yes".into()));
    f.require_value_message = Some("must agree".into());
    let err = f.coerce_and_validate(&Value::Str("no".into()), today()).unwrap_err();
    assert_eq!(err.reason, "must agree");
}

#[test]
fn require_value_matching_list_ignores_order() {
    let mut f = select_field(
        vec![("Red", Value::Str("red".into())), ("Blue", Value::Str("blue".into()))],
        1,
        2,
    );
    f.require_value = Some(Value::List(vec![Value::Str("blue".into()), Value::Str("red".into())]));
    let v = f
        .coerce_and_validate(&Value::List(vec![Value::Int(1), Value::Int(2)]), today())
        .unwrap();
    assert_eq!(
        v,
        Value::List(vec![Value::Str("red".into()), Value::Str("blue".into())])
    );
}

#[test]
fn email_field_rejects_malformed_address() {
    let f = Field {
        set: None,
        optional: false,
        default: None,
        label: None,
        require_value: None,
        require_value_message: None,
        kind: FieldKind::Email {
            check_public_suffix: false,
        },
    };
    assert!(f.coerce_and_validate(&Value::Str("not-an-email".into()), today()).is_err());
    assert!(f
        .coerce_and_validate(&Value::Str("person@example.com".into()), today())
        .is_ok());
}

#[test]
fn render_text_field_exposes_client_facing_constraints_only() {
    let f = Field {
        set: None,
        optional: false,
        default: None,
        label: Some(Template::parse("Name").unwrap()),
        require_value: None,
        require_value_message: None,
        kind: FieldKind::Text {
            min: Some(1),
            max: Some(10),
            regex: Some("^[a-z]+$".into()),
            regex_js: Some("^[a-z]+$".into()),
        },
    };
    let ask = f.render(&Value::Null).unwrap();
    assert_eq!(ask.label.as_deref(), Some("Name"));
    assert_eq!(ask.regex_js.as_deref(), Some("^[a-z]+$"));
}
