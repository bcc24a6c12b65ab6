//! Key compaction: replace every record field name with a single-character
//! code, recursively.
//!
//! The pass is compiled once per schema into a [`KeyCompaction`], which holds
//! the compacted schema and the plan for rewriting values both ways. Only
//! records, arrays, and alternatives are rewritten; leaves pass through.

use std::sync::Arc;

use artlink_foundation::{Error, IdentifierCompactor, PathSegment, Record, Result, Value};

use crate::schema::Schema;
use crate::validate::{check_record_keys, validate};

/// A compiled key-compaction pass for one schema.
#[derive(Clone, Debug)]
pub struct KeyCompaction {
    schema: Schema,
    plan: KeyPlan,
}

#[derive(Clone, Debug)]
enum KeyPlan {
    Identity,
    Array(Box<KeyPlan>),
    Record(RecordPlan),
    Alternative(Vec<OptionPlan>),
}

#[derive(Clone, Debug)]
struct RecordPlan {
    compactor: IdentifierCompactor,
    /// Declared fields in sorted name order, which is also code order.
    fields: Vec<FieldPlan>,
}

#[derive(Clone, Debug)]
struct FieldPlan {
    name: Arc<str>,
    code: Arc<str>,
    plan: KeyPlan,
}

#[derive(Clone, Debug)]
struct OptionPlan {
    original: Schema,
    plan: KeyPlan,
}

/// Compiles the key-compaction pass for `schema`.
///
/// # Errors
///
/// Returns `LimitExceeded` if a record declares more fields than there are
/// single-character codes, and `AmbiguousAlternative` if two different options
/// of an alternative have the same compacted schema.
pub fn key_compact(schema: &Schema) -> Result<KeyCompaction> {
    let (compacted, plan) = compile(schema)?;
    Ok(KeyCompaction {
        schema: compacted,
        plan,
    })
}

fn compile(schema: &Schema) -> Result<(Schema, KeyPlan)> {
    match schema {
        Schema::Array(element) => {
            let (schema, plan) = compile(element)?;
            Ok((
                Schema::Array(Box::new(schema)),
                KeyPlan::Array(Box::new(plan)),
            ))
        }
        Schema::Record(fields) => {
            let compactor = IdentifierCompactor::new(fields.keys())?;
            let mut compacted = std::collections::BTreeMap::new();
            let mut plans = Vec::with_capacity(fields.len());
            for (name, field) in fields {
                let code: Arc<str> = compactor.code_of(name)?.to_string().into();
                let (schema, plan) = compile(field)?;
                compacted.insert(code.clone(), schema);
                plans.push(FieldPlan {
                    name: name.clone(),
                    code,
                    plan,
                });
            }
            Ok((
                Schema::Record(compacted),
                KeyPlan::Record(RecordPlan {
                    compactor,
                    fields: plans,
                }),
            ))
        }
        Schema::Alternative(options) => {
            let mut schemas = Vec::with_capacity(options.len());
            let mut plans = Vec::with_capacity(options.len());
            for option in options {
                let (schema, plan) = compile(option)?;
                // Equal compacted schemas would decode every value as the first.
                if let Some(first) = schemas
                    .iter()
                    .zip(options)
                    .position(|(s, o)| *s == schema && o != option)
                {
                    return Err(Error::ambiguous_alternative(first, schemas.len()));
                }
                schemas.push(schema);
                plans.push(OptionPlan {
                    original: option.clone(),
                    plan,
                });
            }
            Ok((Schema::Alternative(schemas), KeyPlan::Alternative(plans)))
        }
        leaf => Ok((leaf.clone(), KeyPlan::Identity)),
    }
}

impl KeyCompaction {
    /// Returns the schema with every record keyed by codes instead of names.
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Rewrites `value` so every record is keyed by codes.
    ///
    /// # Errors
    ///
    /// Fails when `value` does not have the original schema's shape: a
    /// record's key set differs, a container has the wrong kind, or no
    /// alternative option accepts the value.
    pub fn encode(&self, value: &Value) -> Result<Value> {
        self.plan.encode(value)
    }

    /// Restores field names in a value produced by [`KeyCompaction::encode`].
    ///
    /// # Errors
    ///
    /// Fails on unknown codes or a container of the wrong kind. An
    /// alternative none of whose options can decode the value returns the
    /// value unchanged; the caller's final validation rejects it.
    pub fn decode(&self, value: &Value) -> Result<Value> {
        self.plan.decode(value)
    }
}

impl KeyPlan {
    fn encode(&self, value: &Value) -> Result<Value> {
        match self {
            Self::Identity => Ok(value.clone()),
            Self::Array(element) => {
                let items = expect_seq(value)?;
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| element.encode(item).map_err(|e| e.at(PathSegment::Index(i))))
                    .collect::<Result<_>>()
                    .map(Value::Seq)
            }
            Self::Record(record) => record.encode(value),
            Self::Alternative(options) => {
                for (i, option) in options.iter().enumerate() {
                    if validate(&option.original, value) {
                        let encoded = option
                            .plan
                            .encode(value)
                            .map_err(|e| e.at(PathSegment::Option(i)))?;
                        // Decode takes the first option that accepts the
                        // compacted form; it must give back this value.
                        if let Some(first) = options[..i].iter().position(|earlier| {
                            earlier
                                .decode(&encoded)
                                .is_some_and(|decoded| decoded != *value)
                        }) {
                            return Err(Error::ambiguous_alternative(first, i));
                        }
                        return Ok(encoded);
                    }
                }
                Err(Error::alternative_exhausted(
                    options.iter().map(|o| o.original.to_string()).collect(),
                    value.describe(),
                ))
            }
        }
    }

    fn decode(&self, value: &Value) -> Result<Value> {
        match self {
            Self::Identity => Ok(value.clone()),
            Self::Array(element) => {
                let items = expect_seq(value)?;
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| element.decode(item).map_err(|e| e.at(PathSegment::Index(i))))
                    .collect::<Result<_>>()
                    .map(Value::Seq)
            }
            Self::Record(record) => record.decode(value),
            Self::Alternative(options) => {
                if let Some(decoded) = options.iter().find_map(|option| option.decode(value)) {
                    return Ok(decoded);
                }
                tracing::debug!(
                    found = %value.describe(),
                    "no alternative option decoded cleanly; passing value through"
                );
                Ok(value.clone())
            }
        }
    }
}

impl OptionPlan {
    /// Decodes `value` as this option, if it restores to a value the option's
    /// original schema accepts.
    fn decode(&self, value: &Value) -> Option<Value> {
        self.plan
            .decode(value)
            .ok()
            .filter(|decoded| validate(&self.original, decoded))
    }
}

impl RecordPlan {
    fn encode(&self, value: &Value) -> Result<Value> {
        let record = expect_record(value)?;
        check_record_keys(
            self.fields.iter().map(|f| &*f.name),
            self.fields.len(),
            record,
        )?;

        let mut out = Record::new();
        for field in &self.fields {
            let v = record
                .get(&field.name)
                .ok_or_else(|| Error::missing_field(&*field.name))?;
            let encoded = field
                .plan
                .encode(v)
                .map_err(|e| e.at(PathSegment::Field(field.name.clone())))?;
            out = out.with(field.code.clone(), encoded);
        }
        Ok(Value::Record(out))
    }

    fn decode(&self, value: &Value) -> Result<Value> {
        let record = expect_record(value)?;

        let mut out = Record::new();
        for (code, v) in record.iter() {
            let name = self
                .compactor
                .key_of_str(code)
                .map_err(|e| e.at(PathSegment::Field(code.clone())))?;
            let field = self
                .fields
                .binary_search_by(|f| f.name.cmp(name))
                .map(|i| &self.fields[i])
                .map_err(|_| Error::unknown_code(&**code))?;
            let decoded = field
                .plan
                .decode(v)
                .map_err(|e| e.at(PathSegment::Field(field.name.clone())))?;
            out = out.with(field.name.clone(), decoded);
        }
        Ok(Value::Record(out))
    }
}

fn expect_seq(value: &Value) -> Result<&artlink_foundation::Seq> {
    value
        .as_seq()
        .ok_or_else(|| Error::schema_mismatch("array", value.describe()))
}

fn expect_record(value: &Value) -> Result<&Record> {
    value
        .as_record()
        .ok_or_else(|| Error::schema_mismatch("record", value.describe()))
}
