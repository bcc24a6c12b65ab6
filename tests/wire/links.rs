//! Integration tests for link helpers
//!
//! Tests query-string storage and the fallback used when a link is bad.

use artlink_foundation::Error;
use artlink_schema::{bounded_quantity, enum_string, random_value, record, seeded_rng, validate};
use artlink_wire::{Codec, Link, construct, restore_or_else};

fn codec() -> Codec {
    construct(&record([
        ("palette", enum_string(["dawn", "dusk", "noon"])),
        ("grain", bounded_quantity(0.25, 0.0, 2.0)),
    ]))
    .unwrap()
}

#[test]
fn query_roundtrip_through_a_url() {
    let codec = codec();
    let v = random_value(codec.schema(), &mut seeded_rng(5)).unwrap();
    let query = Link::to_query(&codec, &v).unwrap();

    let url = url::Url::parse(&format!("https://example.test/marble?{query}")).unwrap();
    let restored = Link::from_query(&codec, url.query().unwrap_or_default()).unwrap();
    assert_eq!(restored, v);
}

#[test]
fn bad_links_fall_back_to_random_settings() {
    let codec = codec();
    for query in ["", "v=1", "v=1&data=!!", "v=9&data=oA", "data=oA"] {
        let mut rng = seeded_rng(11);
        let restored = restore_or_else(&codec, query, || random_value(codec.schema(), &mut rng)).unwrap();
        assert!(validate(codec.schema(), &restored), "{query}");
    }
}

#[test]
fn good_links_skip_the_fallback() {
    let codec = codec();
    let v = random_value(codec.schema(), &mut seeded_rng(3)).unwrap();
    let query = Link::to_query(&codec, &v).unwrap();
    let restored = restore_or_else(&codec, &query, || panic!("fallback used")).unwrap();
    assert_eq!(restored, v);
}

#[test]
fn fallback_errors_propagate() {
    let codec = codec();
    let result = restore_or_else(&codec, "", || Err(Error::missing_field("x")));
    assert!(result.is_err());
}
