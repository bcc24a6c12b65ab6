//! Validation of values against schemas.
//!
//! Validation is pure and fails fast: the first mismatch stops the walk and
//! is reported with the path to the offending value.

use artlink_foundation::{Error, PathSegment, Record, Result, Value};

use crate::schema::Schema;

/// Returns true if `value` matches `schema`.
#[must_use]
pub fn validate(schema: &Schema, value: &Value) -> bool {
    validate_strict(schema, value).is_ok()
}

/// Checks `value` against `schema`, explaining the first mismatch.
///
/// # Errors
///
/// - `SchemaMismatch` when a value has the wrong kind, an enum string is not
///   a member, or a quantity was made with a different constraint
/// - `MissingField` / `UnexpectedField` when a record's key set differs from
///   the declared one
/// - `AlternativeExhausted` when no option of an alternative matches
pub fn validate_strict(schema: &Schema, value: &Value) -> Result<()> {
    match (schema, value) {
        (Schema::Boolean, Value::Bool(_))
        | (Schema::Number, Value::Num(_))
        | (Schema::String, Value::Str(_)) => Ok(()),

        (Schema::EnumString(members), Value::Str(s)) if members.contains(s) => Ok(()),

        (Schema::BoundedQuantity(constraint), Value::Quantity(q)) if constraint.contains(q) => {
            Ok(())
        }

        (Schema::Array(element), Value::Seq(items)) => {
            for (i, item) in items.iter().enumerate() {
                validate_strict(element, item).map_err(|e| e.at(PathSegment::Index(i)))?;
            }
            Ok(())
        }

        (Schema::Record(fields), Value::Record(record)) => {
            check_record_keys(fields.keys().map(|k| &**k), fields.len(), record)?;
            for (name, field) in fields {
                if let Some(v) = record.get(name) {
                    validate_strict(field, v).map_err(|e| e.at(PathSegment::Field(name.clone())))?;
                }
            }
            Ok(())
        }

        (Schema::Alternative(options), _) => {
            if options.iter().any(|option| validate(option, value)) {
                Ok(())
            } else {
                Err(Error::alternative_exhausted(
                    options.iter().map(ToString::to_string).collect(),
                    value.describe(),
                ))
            }
        }

        // Leaves report the full schema; containers just their shape, since
        // their children are irrelevant when the kind itself is wrong.
        (Schema::Array(_) | Schema::Record(_), _) => {
            Err(Error::schema_mismatch(schema.shape(), value.describe()))
        }
        _ => Err(Error::schema_mismatch(schema, value.describe())),
    }
}

/// Checks that `record` has exactly the `declared` keys (given in sorted
/// order, `count` of them).
///
/// # Errors
///
/// Returns `UnexpectedField` for the first undeclared key, otherwise
/// `MissingField` for the first declared key that is absent.
pub(crate) fn check_record_keys<'a>(
    declared: impl Iterator<Item = &'a str> + Clone,
    count: usize,
    record: &Record,
) -> Result<()> {
    if record.len() > count || declared.clone().any(|name| !record.contains_key(name)) {
        for key in record.keys() {
            if !declared.clone().any(|name| name == &**key) {
                return Err(Error::unexpected_field(&**key));
            }
        }
        for name in declared {
            if !record.contains_key(name) {
                return Err(Error::missing_field(name));
            }
        }
    }
    Ok(())
}
