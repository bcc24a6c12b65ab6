//! End-to-end tests with a realistic generative-art settings schema
//!
//! The schema mirrors a marbling shader: many bounded numbers, a few fixed
//! choices, and small fixed-length tuples.

use artlink_foundation::{Constraint, Record, Value};
use artlink_schema::{
    Schema, array, bounded_quantity, random_value, record, seeded_rng, validate,
};
use artlink_wire::{Link, construct};

pub fn marble_schema() -> Schema {
    let cosine = || bounded_quantity(0.1, 0.0, 20.0);
    let noise = || bounded_quantity(0.01, 0.7, 1.3);
    let displace = || bounded_quantity(0.1, 0.0, 20.0);
    let coordinate = || bounded_quantity(0.01, 0.0, 1.0);
    record([
        ("zoom", bounded_quantity(0.1, 0.4, 1.6)),
        ("cosineC", array(cosine())),
        ("cosineD", array(cosine())),
        ("colorSpeed", bounded_quantity(0.1, 0.5, 1.0)),
        ("numOctaves", bounded_quantity(1.0, 8.0, 16.0)),
        ("q", array(noise())),
        ("r", array(noise())),
        ("pattern", bounded_quantity(0.01, 0.8, 1.2)),
        ("qDisplaceX", array(displace())),
        ("qDisplaceY", array(displace())),
        ("rDisplaceX", array(displace())),
        ("rDisplaceY", array(displace())),
        ("pixelDistanceStrategy", bounded_quantity(1.0, 1.0, 8.0)),
        ("interpolationStrategy", bounded_quantity(1.0, 1.0, 3.0)),
        ("centerPoint", array(coordinate())),
    ])
}

fn quantities(c: Constraint, raws: &[f64]) -> Value {
    raws.iter()
        .map(|&r| Value::Quantity(c.make(r)))
        .collect::<Vec<_>>()
        .into()
}

pub fn marble_value() -> Value {
    let cosine = Constraint::new(0.1, 0.0, 20.0);
    let noise = Constraint::new(0.01, 0.7, 1.3);
    let displace = Constraint::new(0.1, 0.0, 20.0);
    let coordinate = Constraint::new(0.01, 0.0, 1.0);
    let q = |step, min, max, raw| Value::Quantity(Constraint::new(step, min, max).make(raw));

    Value::Record(
        Record::new()
            .with("zoom", q(0.1, 0.4, 1.6, 1.1))
            .with("cosineC", quantities(cosine, &[12.3, 17.0, 10.4]))
            .with("cosineD", quantities(cosine, &[19.9, 11.1, 15.5]))
            .with("colorSpeed", q(0.1, 0.5, 1.0, 0.7))
            .with("numOctaves", q(1.0, 8.0, 16.0, 12.0))
            .with("q", quantities(noise, &[0.93, 1.21]))
            .with("r", quantities(noise, &[0.7, 1.3]))
            .with("pattern", q(0.01, 0.8, 1.2, 1.04))
            .with("qDisplaceX", quantities(displace, &[3.3, 0.0]))
            .with("qDisplaceY", quantities(displace, &[20.0, 8.8]))
            .with("rDisplaceX", quantities(displace, &[1.7, 4.2]))
            .with("rDisplaceY", quantities(displace, &[6.1, 13.9]))
            .with("pixelDistanceStrategy", q(1.0, 1.0, 8.0, 5.0))
            .with("interpolationStrategy", q(1.0, 1.0, 3.0, 2.0))
            .with("centerPoint", quantities(coordinate, &[0.5, 0.25])),
    )
}

#[test]
fn marble_roundtrip() {
    let codec = construct(&marble_schema()).unwrap();
    assert!(validate(codec.schema(), &marble_value()));
    let text = codec.encode(&marble_value()).unwrap();
    assert_eq!(codec.decode(&text).unwrap(), marble_value());
}

#[test]
fn marble_link_is_short() {
    let codec = construct(&marble_schema()).unwrap();
    let query = Link::to_query(&codec, &marble_value()).unwrap();
    // field names alone would be longer than the whole link
    let names: usize = ["zoom", "cosineC", "cosineD", "colorSpeed", "numOctaves", "pattern",
        "qDisplaceX", "qDisplaceY", "rDisplaceX", "rDisplaceY", "pixelDistanceStrategy",
        "interpolationStrategy", "centerPoint"]
        .iter()
        .map(|n| n.len())
        .sum();
    assert!(query.len() < names, "{} >= {names}: {query}", query.len());
}

#[test]
fn random_marbles_roundtrip() {
    let schema = marble_schema();
    let codec = construct(&schema).unwrap();
    let mut rng = seeded_rng(0xA160);
    for _ in 0..50 {
        let v = random_value(&schema, &mut rng).unwrap();
        assert_eq!(codec.decode(&codec.encode(&v).unwrap()).unwrap(), v);
    }
}

#[test]
fn editing_a_setting_changes_the_link() {
    let codec = construct(&marble_schema()).unwrap();
    let before = marble_value();
    let record = before.as_record().unwrap();
    let zoom = record.get("zoom").and_then(Value::as_quantity).unwrap();
    let after = Value::Record(record.insert("zoom", Value::Quantity(zoom.add(&zoom.with_value(0.4)))));

    let a = codec.encode(&before).unwrap();
    let b = codec.encode(&after).unwrap();
    assert_ne!(a, b);
    assert_eq!(codec.decode(&b).unwrap(), after);
    // the original is untouched by the edit
    assert_eq!(codec.decode(&a).unwrap(), before);
}
