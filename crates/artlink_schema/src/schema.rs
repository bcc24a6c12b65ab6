//! Schema definitions for settings values.
//!
//! A [`Schema`] is plain data: a finite tree of shape descriptors with no
//! embedded behavior. Validation and the compaction passes are free functions
//! that dispatch on the variant.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use artlink_foundation::Constraint;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Shape descriptor for one settings type.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Schema {
    /// Any boolean.
    Boolean,
    /// Any number.
    Number,
    /// Any string.
    String,
    /// A string from a fixed set of members.
    EnumString(BTreeSet<Arc<str>>),
    /// A bounded quantity made with exactly this constraint.
    BoundedQuantity(Constraint),
    /// A sequence whose every element matches the element schema.
    Array(Box<Schema>),
    /// A record with exactly these fields.
    Record(BTreeMap<Arc<str>, Schema>),
    /// The first matching option, tried in declared order.
    Alternative(Vec<Schema>),
}

/// The variant of a [`Schema`], without its children.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    /// [`Schema::Boolean`]
    Boolean,
    /// [`Schema::Number`]
    Number,
    /// [`Schema::String`]
    String,
    /// [`Schema::EnumString`]
    EnumString,
    /// [`Schema::BoundedQuantity`]
    BoundedQuantity,
    /// [`Schema::Array`]
    Array,
    /// [`Schema::Record`]
    Record,
    /// [`Schema::Alternative`]
    Alternative,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::EnumString => "enum",
            Self::BoundedQuantity => "quantity",
            Self::Array => "array",
            Self::Record => "record",
            Self::Alternative => "alternative",
        };
        f.write_str(name)
    }
}

impl Schema {
    /// Returns the variant of this schema.
    #[must_use]
    pub const fn shape(&self) -> Shape {
        match self {
            Self::Boolean => Shape::Boolean,
            Self::Number => Shape::Number,
            Self::String => Shape::String,
            Self::EnumString(_) => Shape::EnumString,
            Self::BoundedQuantity(_) => Shape::BoundedQuantity,
            Self::Array(_) => Shape::Array,
            Self::Record(_) => Shape::Record,
            Self::Alternative(_) => Shape::Alternative,
        }
    }

    /// Returns the field schemas if this is a record.
    #[must_use]
    pub fn fields(&self) -> Option<&BTreeMap<Arc<str>, Schema>> {
        match self {
            Self::Record(fields) => Some(fields),
            _ => None,
        }
    }
}

/// Creates a boolean schema.
#[must_use]
pub fn boolean() -> Schema {
    Schema::Boolean
}

/// Creates a number schema.
#[must_use]
pub fn number() -> Schema {
    Schema::Number
}

/// Creates a string schema.
#[must_use]
pub fn string() -> Schema {
    Schema::String
}

/// Creates an enumerated string schema over `members`.
#[must_use]
pub fn enum_string<I, S>(members: I) -> Schema
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Schema::EnumString(members.into_iter().map(|m| Arc::from(m.as_ref())).collect())
}

/// Creates a bounded quantity schema.
#[must_use]
pub fn bounded_quantity(step: f64, min: f64, max: f64) -> Schema {
    Schema::BoundedQuantity(Constraint::new(step, min, max))
}

/// Creates an array schema.
#[must_use]
pub fn array(element: Schema) -> Schema {
    Schema::Array(Box::new(element))
}

/// Creates a record schema from `(name, schema)` pairs.
#[must_use]
pub fn record<I, K>(fields: I) -> Schema
where
    I: IntoIterator<Item = (K, Schema)>,
    K: Into<Arc<str>>,
{
    Schema::Record(fields.into_iter().map(|(k, s)| (k.into(), s)).collect())
}

/// Creates an alternative schema; earlier options take precedence.
#[must_use]
pub fn alternative(options: impl IntoIterator<Item = Schema>) -> Schema {
    Schema::Alternative(options.into_iter().collect())
}

fn write_name(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    if !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        f.write_str(name)
    } else {
        write!(f, "{name:?}")
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean => write!(f, "boolean"),
            Self::Number => write!(f, "number"),
            Self::String => write!(f, "string"),
            Self::EnumString(members) => {
                write!(f, "enum{{")?;
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        write!(f, "|")?;
                    }
                    write_name(f, member)?;
                }
                write!(f, "}}")
            }
            Self::BoundedQuantity(c) => write!(f, "quantity({c})"),
            Self::Array(element) => write!(f, "array<{element}>"),
            Self::Record(fields) => {
                write!(f, "record{{")?;
                for (i, (name, schema)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write_name(f, name)?;
                    write!(f, ": {schema}")?;
                }
                write!(f, "}}")
            }
            Self::Alternative(options) => {
                write!(f, "alternative[")?;
                for (i, option) in options.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{option}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
