//! Integration tests for the compaction passes
//!
//! Tests key compaction and value compaction separately and composed, the
//! way the codec composes them.

use artlink_foundation::{Constraint, ErrorKind, Record, Value};
use artlink_schema::{
    Schema, alternative, array, boolean, bounded_quantity, enum_string, key_compact, number,
    record, string, validate, value_compact,
};

fn brush() -> Schema {
    alternative([
        record([("kind", enum_string(["round"])), ("radius", bounded_quantity(0.5, 0.5, 8.0))]),
        record([("kind", enum_string(["flat"])), ("width", number()), ("angle", number())]),
    ])
}

fn round_brush(radius: f64) -> Value {
    Value::Record(
        Record::new()
            .with("kind", Value::from("round"))
            .with("radius", Value::Quantity(Constraint::new(0.5, 0.5, 8.0).make(radius))),
    )
}

fn flat_brush() -> Value {
    Value::Record(
        Record::new()
            .with("kind", Value::from("flat"))
            .with("width", Value::Num(2.0))
            .with("angle", Value::Num(-0.25)),
    )
}

fn painting() -> Schema {
    record([
        ("strokes", array(record([("brush", brush()), ("wet", boolean())]))),
        ("title", string()),
    ])
}

fn painting_value() -> Value {
    let stroke = |brush: Value, wet: bool| {
        Value::Record(Record::new().with("brush", brush).with("wet", Value::Bool(wet)))
    };
    Value::Record(
        Record::new()
            .with(
                "strokes",
                Value::from(vec![stroke(round_brush(3.0), true), stroke(flat_brush(), false)]),
            )
            .with("title", Value::from("study")),
    )
}

/// Encodes the way the codec does: keys first, then values over the
/// key-compacted schema.
fn roundtrip(schema: &Schema, value: &Value) -> Value {
    let keys = key_compact(schema).unwrap();
    let values = value_compact(keys.schema()).unwrap();
    let wire = values.encode(&keys.encode(value).unwrap()).unwrap();
    assert!(validate(values.wire_schema(), &wire));
    keys.decode(&values.decode(&wire).unwrap()).unwrap()
}

// =============================================================================
// Key Compaction
// =============================================================================

#[test]
fn key_compaction_preserves_content_at_every_level() {
    let keys = key_compact(&painting()).unwrap();
    let encoded = keys.encode(&painting_value()).unwrap();

    // no original field name survives
    let debug = format!("{encoded:?}");
    for name in ["strokes", "title", "brush", "wet", "kind", "radius"] {
        assert!(!debug.contains(&format!("{name:?}")), "{name} leaked");
    }
    assert_eq!(keys.decode(&encoded).unwrap(), painting_value());
}

#[test]
fn key_compacted_schema_accepts_encoded_values() {
    let keys = key_compact(&painting()).unwrap();
    let encoded = keys.encode(&painting_value()).unwrap();
    assert!(validate(keys.schema(), &encoded));
    assert!(!validate(keys.schema(), &painting_value()));
}

#[test]
fn key_compaction_rejects_non_conforming_records() {
    let keys = key_compact(&painting()).unwrap();
    let v = Value::Record(Record::new().with("title", Value::from("x")).with("strokes", Value::Num(1.0)));
    let err = keys.encode(&v).unwrap_err();
    assert!(err.is_schema_mismatch());
    assert_eq!(err.path().as_deref(), Some("$.strokes"));
}

// =============================================================================
// Value Compaction
// =============================================================================

#[test]
fn value_compaction_wire_shape() {
    let values = value_compact(&brush()).unwrap();
    let wire = values.encode(&flat_brush()).unwrap();
    let tagged = wire.as_record().unwrap();
    assert_eq!(tagged.get("i"), Some(&Value::Num(1.0)));
    let inner = tagged.get("v").and_then(Value::as_record).unwrap();
    assert_eq!(inner.get("kind"), Some(&Value::from("\u{0}")));
    assert_eq!(inner.get("angle"), Some(&Value::Num(-0.25)));
}

#[test]
fn quantities_become_plain_indices() {
    let values = value_compact(&brush()).unwrap();
    let wire = values.encode(&round_brush(3.0)).unwrap();
    let inner = wire.as_record().and_then(|r| r.get("v")).and_then(Value::as_record).unwrap();
    assert_eq!(inner.get("radius"), Some(&Value::Num(5.0)));
}

#[test]
fn value_decode_rejects_wrong_option_payload() {
    let values = value_compact(&brush()).unwrap();
    let wire = values.encode(&flat_brush()).unwrap();
    let retagged = Value::Record(wire.as_record().unwrap().insert("i", Value::Num(0.0)));
    let err = values.decode(&retagged).unwrap_err();
    assert!(err.is_schema_mismatch());
    assert!(matches!(err.kind, ErrorKind::UnexpectedField(_) | ErrorKind::MissingField(_)));
}

// =============================================================================
// Composed
// =============================================================================

#[test]
fn composed_roundtrip_nested() {
    assert_eq!(roundtrip(&painting(), &painting_value()), painting_value());
}

#[test]
fn composed_roundtrip_each_alternative() {
    for v in [round_brush(0.5), round_brush(8.0), flat_brush()] {
        assert_eq!(roundtrip(&brush(), &v), v);
    }
}

#[test]
fn overlapping_alternatives_take_first_option() {
    let schema = alternative([number(), number()]);
    let values = value_compact(&schema).unwrap();
    let wire = values.encode(&Value::Num(4.0)).unwrap();
    assert_eq!(wire.as_record().and_then(|r| r.get("i")), Some(&Value::Num(0.0)));
    assert_eq!(roundtrip(&schema, &Value::Num(4.0)), Value::Num(4.0));
}
