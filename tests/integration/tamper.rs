//! Tampering tests
//!
//! A damaged link must fail to decode or decode to a value that still
//! conforms to the schema; it must never panic or yield a malformed value.

use artlink_foundation::Error;
use artlink_schema::validate;
use artlink_wire::{Codec, construct};
use proptest::prelude::*;

use crate::marble::{marble_schema, marble_value};

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

fn marble_link() -> (Codec, String) {
    let codec = construct(&marble_schema()).unwrap();
    let text = codec.encode(&marble_value()).unwrap();
    (codec, text)
}

fn is_rejection(err: &Error) -> bool {
    err.is_decode_error() || err.is_schema_mismatch()
}

/// Byte offsets of the map header and of every key's header and code byte.
///
/// Field codes are written in order, each as a one-byte text string
/// (`0x61`, code), and no marble value encodes to `0x61`.
fn structural_offsets(bytes: &[u8], fields: u8) -> Vec<usize> {
    let mut offsets = vec![0];
    let mut from = 1;
    for code in 0..fields {
        let at = from
            + bytes[from..]
                .windows(2)
                .position(|w| w == [0x61, code])
                .unwrap_or_else(|| panic!("key {code} not found"));
        offsets.extend([at, at + 1]);
        from = at + 2;
    }
    offsets
}

fn replace_char(text: &str, at: usize, with: u8) -> String {
    let mut bytes = text.as_bytes().to_vec();
    bytes[at] = with;
    String::from_utf8(bytes).unwrap()
}

#[test]
fn header_damage_always_fails() {
    let (codec, text) = marble_link();
    for &c in ALPHABET {
        if c == text.as_bytes()[0] {
            continue;
        }
        let damaged = replace_char(&text, 0, c);
        let err = codec.decode(&damaged).unwrap_err();
        assert!(is_rejection(&err), "{}: {err}", char::from(c));
    }
}

#[test]
fn structural_byte_damage_always_fails() {
    let (codec, _) = marble_link();
    let bytes = codec.encode_bytes(&marble_value()).unwrap();
    let offsets = structural_offsets(&bytes, 15);
    assert_eq!(offsets.len(), 31);

    let mut rejected = 0;
    for &at in &offsets {
        for b in 0..=u8::MAX {
            if b == bytes[at] {
                continue;
            }
            let mut damaged = bytes.clone();
            damaged[at] = b;
            match codec.decode_bytes(&damaged) {
                Ok(v) => panic!("byte {at} set to {b:#04x} decoded to {v:?}"),
                Err(e) => assert!(is_rejection(&e), "byte {at} = {b:#04x}: {e}"),
            }
            rejected += 1;
        }
    }
    assert_eq!(rejected, 31 * 255);
}

#[test]
fn truncation_always_fails() {
    let (codec, text) = marble_link();
    for len in 0..text.len() {
        assert!(codec.decode(&text[..len]).is_err(), "prefix {len}");
    }
}

#[test]
fn foreign_characters_fail() {
    let (codec, text) = marble_link();
    for bad in [b'+', b'/', b'.', b' ', b'%'] {
        let err = codec.decode(&replace_char(&text, text.len() / 2, bad)).unwrap_err();
        assert!(err.is_decode_error());
    }
}

proptest! {
    #[test]
    fn single_character_flips(at in any::<prop::sample::Index>(), with in prop::sample::select(ALPHABET)) {
        let (codec, text) = marble_link();
        let at = at.index(text.len());
        let damaged = replace_char(&text, at, with);
        match codec.decode(&damaged) {
            Ok(v) => prop_assert!(validate(codec.schema(), &v)),
            Err(e) => prop_assert!(is_rejection(&e), "{}", e),
        }
    }

    #[test]
    fn arbitrary_text_never_panics(text in "[A-Za-z0-9_-]{0,200}") {
        let (codec, _) = marble_link();
        if let Ok(v) = codec.decode(&text) {
            prop_assert!(validate(codec.schema(), &v));
        }
    }
}
