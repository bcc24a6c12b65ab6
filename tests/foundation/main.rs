//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: Value, BoundedQuantity, IdentifierCompactor, Error,
//! and persistent collections.
