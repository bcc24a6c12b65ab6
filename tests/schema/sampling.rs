//! Integration tests for random sampling
//!
//! Random values must conform to their schema and survive compaction.

use artlink_schema::{
    SampleConfig, Schema, alternative, array, boolean, bounded_quantity, enum_string, key_compact,
    number, random_value, random_value_with, record, seeded_rng, string, validate, value_compact,
};
use rand::Rng;

fn generator_settings() -> Schema {
    record([
        ("seed", number()),
        ("name", string()),
        ("layers", array(record([
            ("blend", enum_string(["add", "screen", "multiply"])),
            ("alpha", bounded_quantity(0.01, 0.0, 1.0)),
            ("shape", alternative([
                record([("sides", bounded_quantity(1.0, 3.0, 12.0))]),
                record([("radius", number()), ("filled", boolean())]),
            ])),
        ]))),
    ])
}

#[test]
fn samples_always_validate() {
    let schema = generator_settings();
    let mut rng = seeded_rng(2024);
    for _ in 0..100 {
        let v = random_value(&schema, &mut rng).unwrap();
        assert!(validate(&schema, &v));
    }
}

#[test]
fn samples_survive_compaction() {
    let schema = generator_settings();
    let keys = key_compact(&schema).unwrap();
    let values = value_compact(keys.schema()).unwrap();
    let mut rng = seeded_rng(99);
    for _ in 0..50 {
        let v = random_value(&schema, &mut rng).unwrap();
        let wire = values.encode(&keys.encode(&v).unwrap()).unwrap();
        assert_eq!(keys.decode(&values.decode(&wire).unwrap()).unwrap(), v);
    }
}

#[test]
fn different_seeds_differ() {
    let schema = generator_settings();
    let config = SampleConfig::default().with_max_array_len(8);
    let a = random_value_with(&schema, &mut seeded_rng(1), &config).unwrap();
    let b = random_value_with(&schema, &mut seeded_rng(2), &config).unwrap();
    assert_ne!(a, b);
}

#[test]
fn any_rng_works() {
    let mut rng = rand::thread_rng();
    let v = random_value(&bounded_quantity(1.0, 0.0, 3.0), &mut rng).unwrap();
    assert!(v.as_quantity().is_some());
    let _: f64 = rng.r#gen();
}
