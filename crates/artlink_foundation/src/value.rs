//! Core value type for all settings data.

use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::collections::{Record, Seq};
use crate::quantity::BoundedQuantity;

/// Dynamically-typed settings value.
///
/// Values are immutable and cheaply cloneable. Composite values use
/// structural sharing, so an edit produces a new value instead of mutating
/// the old one.
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Value {
    /// Boolean value.
    Bool(bool),
    /// Double-precision number.
    Num(f64),
    /// Text string.
    Str(Arc<str>),
    /// Bounded quantity (clamped, step-quantised number).
    Quantity(BoundedQuantity),
    /// Ordered sequence.
    Seq(Seq),
    /// Keyed record.
    Record(Record),
}

/// The runtime kind of a [`Value`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// [`Value::Bool`]
    Bool,
    /// [`Value::Num`]
    Num,
    /// [`Value::Str`]
    Str,
    /// [`Value::Quantity`]
    Quantity,
    /// [`Value::Seq`]
    Seq,
    /// [`Value::Record`]
    Record,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bool => "boolean",
            Self::Num => "number",
            Self::Str => "string",
            Self::Quantity => "quantity",
            Self::Seq => "array",
            Self::Record => "record",
        };
        f.write_str(name)
    }
}

impl Value {
    /// Returns the kind of this value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::Bool,
            Self::Num(_) => ValueKind::Num,
            Self::Str(_) => ValueKind::Str,
            Self::Quantity(_) => ValueKind::Quantity,
            Self::Seq(_) => ValueKind::Seq,
            Self::Record(_) => ValueKind::Record,
        }
    }

    /// Returns a short description suitable for rejection reasons.
    ///
    /// Scalars include their content; collections include their size or keys
    /// but never their nested content.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Bool(b) => format!("boolean {b}"),
            Self::Num(n) => format!("number {n}"),
            Self::Str(s) => format!("string {s:?}"),
            Self::Quantity(q) => format!("quantity {q}"),
            Self::Seq(s) => format!("array of {}", s.len()),
            Self::Record(r) => {
                let keys: Vec<String> = r.keys().map(|k| format!("{k:?}")).collect();
                format!("record {{{}}}", keys.join(", "))
            }
        }
    }

    /// Attempts to extract a boolean value.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to extract a number.
    #[must_use]
    pub const fn as_num(&self) -> Option<f64> {
        match self {
            Self::Num(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract a string reference.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to extract a bounded quantity.
    #[must_use]
    pub const fn as_quantity(&self) -> Option<&BoundedQuantity> {
        match self {
            Self::Quantity(q) => Some(q),
            _ => None,
        }
    }

    /// Attempts to extract a sequence reference.
    #[must_use]
    pub const fn as_seq(&self) -> Option<&Seq> {
        match self {
            Self::Seq(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to extract a record reference.
    #[must_use]
    pub const fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(r) => Some(r),
            _ => None,
        }
    }
}

// Numbers compare by bit pattern so that NaN equals itself and -0.0 differs
// from 0.0; round trips are checked bit-for-bit.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Num(a), Self::Num(b)) => a.to_bits() == b.to_bits(),
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Quantity(a), Self::Quantity(b)) => a == b,
            (Self::Seq(a), Self::Seq(b)) => a == b,
            (Self::Record(a), Self::Record(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Num(n) => write!(f, "{n:?}"),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Quantity(q) => write!(f, "{q:?}"),
            Self::Seq(s) => write!(f, "{s:?}"),
            Self::Record(r) => write!(f, "{r:?}"),
        }
    }
}

// Convenience From implementations

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Num(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Num(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s.into())
    }
}

impl From<Arc<str>> for Value {
    fn from(s: Arc<str>) -> Self {
        Self::Str(s)
    }
}

impl From<BoundedQuantity> for Value {
    fn from(q: BoundedQuantity) -> Self {
        Self::Quantity(q)
    }
}

impl From<Seq> for Value {
    fn from(s: Seq) -> Self {
        Self::Seq(s)
    }
}

impl From<Record> for Value {
    fn from(r: Record) -> Self {
        Self::Record(r)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::Seq(v.into_iter().map(Into::into).collect())
    }
}
