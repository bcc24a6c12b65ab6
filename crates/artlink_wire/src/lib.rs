//! Wire codec for artlink.
//!
//! This crate provides:
//! - [`construct`] - Build a [`Codec`] for a schema: validate, compact, and
//!   serialize in one call
//! - [`encode_cbor`] / [`decode_cbor`] - Compacted value to CBOR and back
//! - [`to_text`] / [`from_text`] - Bytes to URL-safe text and back
//! - [`Link`] / [`restore_or_else`] - Settings in a query string
//! - [`CodecConfig`] - Decoder limits and link parameter names

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod cbor;
pub mod codec;
pub mod config;
pub mod link;
pub mod text;

pub use cbor::{decode_cbor, decode_cbor_with, encode_cbor};
pub use codec::{Codec, construct, construct_with};
pub use config::CodecConfig;
pub use link::{Link, restore_or_else};
pub use text::{from_text, to_text};
