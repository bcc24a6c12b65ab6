//! Schema trees, validation, and compaction passes for artlink.
//!
//! This crate provides:
//! - [`Schema`] - Closed, recursive description of one settings shape
//! - [`validate`] / [`validate_strict`] - Check a value against a schema
//! - [`key_compact`] - Replace record field names with single-character codes
//! - [`value_compact`] - Replace enum strings and bounded quantities with
//!   compact forms, and tag alternatives with their option index
//! - [`sample`] - Seeded random values for any schema

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod keys;
pub mod sample;
pub mod schema;
pub mod validate;
pub mod values;

pub use keys::{KeyCompaction, key_compact};
pub use sample::{SampleConfig, random_value, random_value_with, seeded_rng};
pub use schema::{
    Schema, Shape, alternative, array, boolean, bounded_quantity, enum_string, number, record,
    string,
};
pub use validate::{validate, validate_strict};
pub use values::{ValueCompaction, value_compact};
