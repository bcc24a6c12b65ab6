//! Core values, bounded quantities, identifier compaction, and errors for artlink.
//!
//! This crate provides:
//! - [`Value`] - The dynamically-typed settings value every pass operates on
//! - [`BoundedQuantity`] and [`Constraint`] - Clamped, step-quantised numbers
//! - [`IdentifierCompactor`] - Deterministic string to single-character codes
//! - [`Error`] - Rich error types with path context
//! - Persistent collections ([`Seq`], [`Record`])

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod collections;
pub mod compactor;
pub mod error;
pub mod quantity;
pub mod value;

pub use collections::{Record, Seq};
pub use compactor::IdentifierCompactor;
pub use error::{DecodeError, Error, ErrorContext, ErrorKind, Limit, PathSegment};
pub use quantity::{BoundedQuantity, Constraint};
pub use value::{Value, ValueKind};

/// Result type for artlink operations.
pub type Result<T> = std::result::Result<T, Error>;
