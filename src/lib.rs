//! Artlink - Schema-driven settings links for generative art
//!
//! This crate re-exports all layers of the Artlink system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: artlink_wire        — CBOR + URL-safe text, construct(), link helpers
//! Layer 1: artlink_schema      — Schema, validation, key/value compaction, sampling
//! Layer 0: artlink_foundation  — Core types (Value, BoundedQuantity, Error)
//! ```

pub use artlink_foundation as foundation;
pub use artlink_schema as schema;
pub use artlink_wire as wire;
