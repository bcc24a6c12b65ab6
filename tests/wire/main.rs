//! Integration tests for Layer 2: Wire
//!
//! Tests for the CBOR and text layers, the composed codec, and link helpers.

mod links;
