//! Value compaction: enum strings become single-character codes, bounded
//! quantities become their step index, and alternatives are tagged with the
//! index of the option that produced them.
//!
//! Unlike key compaction, this pass changes the shape of alternatives, so the
//! schema that describes its output differs from its input. That output
//! schema is available from [`ValueCompaction::wire_schema`].

use std::collections::BTreeMap;
use std::sync::Arc;

use artlink_foundation::{
    Constraint, Error, IdentifierCompactor, PathSegment, Record, Result, Seq, Value,
};

use crate::schema::Schema;
use crate::validate::{check_record_keys, validate_strict};

/// Field holding the option index of a compacted alternative.
pub const OPTION_INDEX_FIELD: &str = "i";
/// Field holding the compacted value of a compacted alternative.
pub const OPTION_VALUE_FIELD: &str = "v";

/// A compiled value-compaction pass for one schema.
#[derive(Clone, Debug)]
pub struct ValueCompaction {
    schema: Schema,
    wire: Schema,
    plan: ValuePlan,
}

#[derive(Clone, Debug)]
enum ValuePlan {
    Identity,
    Array(Box<ValuePlan>),
    /// Fields in sorted name order.
    Record(Vec<(Arc<str>, ValuePlan)>),
    Enum(IdentifierCompactor),
    Quantity(Constraint),
    /// Each option's input schema alongside its plan.
    Alternative(Vec<(Schema, ValuePlan)>),
}

/// Compiles the value-compaction pass for `schema`.
///
/// # Errors
///
/// Returns `LimitExceeded` if an enum declares more members than there are
/// single-character codes.
pub fn value_compact(schema: &Schema) -> Result<ValueCompaction> {
    Ok(ValueCompaction {
        schema: schema.clone(),
        wire: wire_schema_of(schema),
        plan: compile(schema)?,
    })
}

fn compile(schema: &Schema) -> Result<ValuePlan> {
    Ok(match schema {
        Schema::Boolean | Schema::Number | Schema::String => ValuePlan::Identity,
        Schema::EnumString(members) => ValuePlan::Enum(IdentifierCompactor::new(members)?),
        Schema::BoundedQuantity(constraint) => ValuePlan::Quantity(*constraint),
        Schema::Array(element) => ValuePlan::Array(Box::new(compile(element)?)),
        Schema::Record(fields) => ValuePlan::Record(
            fields
                .iter()
                .map(|(name, field)| compile(field).map(|plan| (name.clone(), plan)))
                .collect::<Result<_>>()?,
        ),
        Schema::Alternative(options) => ValuePlan::Alternative(
            options
                .iter()
                .map(|option| compile(option).map(|plan| (option.clone(), plan)))
                .collect::<Result<_>>()?,
        ),
    })
}

fn wire_schema_of(schema: &Schema) -> Schema {
    match schema {
        Schema::EnumString(_) => Schema::String,
        Schema::BoundedQuantity(_) => Schema::Number,
        Schema::Array(element) => Schema::Array(Box::new(wire_schema_of(element))),
        Schema::Record(fields) => Schema::Record(
            fields
                .iter()
                .map(|(name, field)| (name.clone(), wire_schema_of(field)))
                .collect(),
        ),
        Schema::Alternative(options) => {
            let mut fields = BTreeMap::new();
            fields.insert(Arc::from(OPTION_INDEX_FIELD), Schema::Number);
            fields.insert(
                Arc::from(OPTION_VALUE_FIELD),
                Schema::Alternative(options.iter().map(wire_schema_of).collect()),
            );
            Schema::Record(fields)
        }
        leaf => leaf.clone(),
    }
}

impl ValueCompaction {
    /// Returns the schema this pass was compiled from.
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns the schema every encoded value conforms to.
    #[must_use]
    pub fn wire_schema(&self) -> &Schema {
        &self.wire
    }

    /// Validates `value` against the input schema, then compacts it.
    ///
    /// # Errors
    ///
    /// Returns the validation failure if `value` does not conform.
    pub fn encode(&self, value: &Value) -> Result<Value> {
        validate_strict(&self.schema, value)?;
        self.plan.encode(value)
    }

    /// Expands a compacted value, then validates the result against the
    /// input schema.
    ///
    /// # Errors
    ///
    /// Fails on unknown enum codes, out-of-range quantity indices, malformed
    /// alternative tags, or a result that does not conform.
    pub fn decode(&self, value: &Value) -> Result<Value> {
        let decoded = self.plan.decode(value)?;
        validate_strict(&self.schema, &decoded)?;
        Ok(decoded)
    }
}

impl ValuePlan {
    fn encode(&self, value: &Value) -> Result<Value> {
        match self {
            Self::Identity => Ok(value.clone()),
            Self::Array(element) => map_seq(value, |item| element.encode(item)),
            Self::Record(fields) => map_record(fields, value, Self::encode),
            Self::Enum(compactor) => {
                let member = value
                    .as_str()
                    .ok_or_else(|| Error::schema_mismatch("enum member", value.describe()))?;
                Ok(Value::from(compactor.code_of(member)?.to_string()))
            }
            Self::Quantity(constraint) => {
                let quantity = value
                    .as_quantity()
                    .filter(|q| q.constraint() == *constraint)
                    .ok_or_else(|| {
                        Error::schema_mismatch(format!("quantity({constraint})"), value.describe())
                    })?;
                #[allow(clippy::cast_precision_loss)]
                let index = quantity.to_index() as f64;
                Ok(Value::Num(index))
            }
            Self::Alternative(options) => {
                for (i, (schema, plan)) in options.iter().enumerate() {
                    if let Ok(encoded) = validate_strict(schema, value).and_then(|()| plan.encode(value)) {
                        #[allow(clippy::cast_precision_loss)]
                        let tag = Value::Num(i as f64);
                        return Ok(Value::Record(
                            Record::new()
                                .with(OPTION_INDEX_FIELD, tag)
                                .with(OPTION_VALUE_FIELD, encoded),
                        ));
                    }
                }
                Err(Error::alternative_exhausted(
                    options.iter().map(|(s, _)| s.to_string()).collect(),
                    value.describe(),
                ))
            }
        }
    }

    fn decode(&self, value: &Value) -> Result<Value> {
        match self {
            Self::Identity => Ok(value.clone()),
            Self::Array(element) => map_seq(value, |item| element.decode(item)),
            Self::Record(fields) => map_record(fields, value, Self::decode),
            Self::Enum(compactor) => {
                let code = value
                    .as_str()
                    .ok_or_else(|| Error::schema_mismatch("enum code", value.describe()))?;
                Ok(Value::from(compactor.key_of_str(code)?.clone()))
            }
            Self::Quantity(constraint) => {
                let index = as_index(value, constraint.max_index()).ok_or_else(|| {
                    Error::schema_mismatch(
                        format!("index in 0..={}", constraint.max_index()),
                        value.describe(),
                    )
                })?;
                Ok(Value::Quantity(constraint.from_index(index)))
            }
            Self::Alternative(options) => {
                let tagged = value
                    .as_record()
                    .ok_or_else(|| Error::schema_mismatch("tagged alternative", value.describe()))?;
                check_record_keys(
                    [OPTION_INDEX_FIELD, OPTION_VALUE_FIELD].into_iter(),
                    2,
                    tagged,
                )?;
                let tag = tagged
                    .get(OPTION_INDEX_FIELD)
                    .ok_or_else(|| Error::missing_field(OPTION_INDEX_FIELD))?;
                let inner = tagged
                    .get(OPTION_VALUE_FIELD)
                    .ok_or_else(|| Error::missing_field(OPTION_VALUE_FIELD))?;

                let (i, schema, plan) = as_index(tag, u64::MAX)
                    .and_then(|i| usize::try_from(i).ok())
                    .and_then(|i| options.get(i).map(|(schema, plan)| (i, schema, plan)))
                    .ok_or_else(|| {
                        Error::schema_mismatch(
                            format!("option index below {}", options.len()),
                            tag.describe(),
                        )
                        .at(PathSegment::Field(Arc::from(OPTION_INDEX_FIELD)))
                    })?;

                plan.decode(inner)
                    .and_then(|decoded| validate_strict(schema, &decoded).map(|()| decoded))
                    .map_err(|e| e.at(PathSegment::Option(i)))
            }
        }
    }
}

/// Reads `value` as a whole number in `0..=max`.
fn as_index(value: &Value, max: u64) -> Option<u64> {
    let n = value.as_num()?;
    #[allow(clippy::cast_precision_loss)]
    let in_range = n.is_finite() && n >= 0.0 && n.fract() == 0.0 && n <= max as f64;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let index = n as u64;
    in_range.then_some(index)
}

fn map_seq(value: &Value, f: impl Fn(&Value) -> Result<Value>) -> Result<Value> {
    let items = value
        .as_seq()
        .ok_or_else(|| Error::schema_mismatch("array", value.describe()))?;
    items
        .iter()
        .enumerate()
        .map(|(i, item)| f(item).map_err(|e| e.at(PathSegment::Index(i))))
        .collect::<Result<Seq>>()
        .map(Value::Seq)
}

fn map_record(
    fields: &[(Arc<str>, ValuePlan)],
    value: &Value,
    f: impl Fn(&ValuePlan, &Value) -> Result<Value>,
) -> Result<Value> {
    let record = value
        .as_record()
        .ok_or_else(|| Error::schema_mismatch("record", value.describe()))?;
    check_record_keys(fields.iter().map(|(name, _)| &**name), fields.len(), record)?;

    let mut out = Record::new();
    for (name, plan) in fields {
        let field = record
            .get(name)
            .ok_or_else(|| Error::missing_field(&**name))?;
        let mapped = f(plan, field).map_err(|e| e.at(PathSegment::Field(name.clone())))?;
        out = out.with(name.clone(), mapped);
    }
    Ok(Value::Record(out))
}
