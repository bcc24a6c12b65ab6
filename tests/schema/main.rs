//! Integration tests for Layer 1: Schema
//!
//! Tests for schema construction, validation, both compaction passes, and
//! random sampling.

mod compaction;
mod sampling;
