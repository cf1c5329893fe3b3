use super::*;
use crate::condition::Condition;
use crate::field::{Field, FieldKind};
use crate::location;
use indexmap::IndexMap;

fn field(set: &str) -> Field {
    Field {
        set: Some(location::parse(set).unwrap()),
        optional: false,
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

fn question(id: &str, provides: &[&str]) -> Question {
    Question {
        id: QuestionId::new(id),
        title: None,
        description: None,
        fields: provides.iter().map(|loc| field(loc)).collect(),
        buttons: None,
        buttons_set: None,
        when: Condition::always(),
    }
}

#[test]
fn providing_finds_every_location_a_question_provides() {
    let q = question("q1", &["a.b", "a.c"]);
    let bank = QuestionBank::build(vec![q]);

    for loc in ["a.b", "a.c"] {
        let results = bank
            .providing(&location::parse(loc).unwrap(), &Value::Map(IndexMap::new()))
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, QuestionId::new("q1"));
    }
}

#[test]
fn distinct_root_names_never_collide() {
    let bank = QuestionBank::build(vec![question("q_c", &["c"]), question("q_d", &["d"])]);

    let ctx = Value::Map(IndexMap::new());
    let providing_c = bank.providing(&location::parse("c").unwrap(), &ctx).unwrap();
    assert_eq!(providing_c.len(), 1);
    assert_eq!(providing_c[0].id, QuestionId::new("q_c"));

    let providing_d = bank.providing(&location::parse("d").unwrap(), &ctx).unwrap();
    assert_eq!(providing_d.len(), 1);
    assert_eq!(providing_d[0].id, QuestionId::new("q_d"));
}

#[test]
fn indexed_location_distinguishes_by_evaluated_context() {
    let bank = QuestionBank::build(vec![question("q0", &["f[x]"])]);

    let mut ctx0 = IndexMap::new();
    ctx0.insert("x".to_string(), Value::Int(0));
    let found0 = bank
        .providing(&location::parse("f[0]").unwrap(), &Value::Map(ctx0))
        .unwrap();
    assert_eq!(found0.len(), 1);

    let mut ctx1 = IndexMap::new();
    ctx1.insert("x".to_string(), Value::Int(1));
    let found1 = bank
        .providing(&location::parse("f[0]").unwrap(), &Value::Map(ctx1))
        .unwrap();
    assert!(found1.is_empty());
}

#[test]
fn duplicate_question_id_keeps_last_definition_only() {
    let first = question("dup", &["a"]);
    let second = question("dup", &["b"]);
    let bank = QuestionBank::build(vec![first, second]);

    assert_eq!(bank.len(), 2);
    let ctx = Value::Map(IndexMap::new());
    assert!(bank
        .providing(&location::parse("a").unwrap(), &ctx)
        .unwrap()
        .is_empty());
    let providing_b = bank.providing(&location::parse("b").unwrap(), &ctx).unwrap();
    assert_eq!(providing_b.len(), 1);
    assert_eq!(providing_b[0].id.as_str(), "dup");
}

#[test]
fn unknown_location_returns_empty() {
    let bank = QuestionBank::build(vec![question("q1", &["a"])]);
    let ctx = Value::Map(IndexMap::new());
    assert!(bank
        .providing(&location::parse("z").unwrap(), &ctx)
        .unwrap()
        .is_empty());
}
