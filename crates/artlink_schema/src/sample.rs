//! Random values for any schema.
//!
//! Collaborators use this to produce a fresh configuration when there is
//! nothing to restore, e.g. when a shared link fails to decode. The generator
//! is caller-supplied, so seeded runs are reproducible.

use rand::Rng;
use rand::SeedableRng;
use rand::distributions::Alphanumeric;
use rand::seq::IteratorRandom;
use rand_chacha::ChaCha8Rng;

use artlink_foundation::{Error, PathSegment, Record, Result, Value};

use crate::schema::Schema;

/// Size limits for randomly generated collections.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SampleConfig {
    /// Arrays get between zero and this many elements.
    pub max_array_len: usize,
    /// Free-form strings get between zero and this many characters.
    pub max_string_len: usize,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            max_array_len: 4,
            max_string_len: 8,
        }
    }
}

impl SampleConfig {
    /// Sets the maximum array length.
    #[must_use]
    pub const fn with_max_array_len(mut self, len: usize) -> Self {
        self.max_array_len = len;
        self
    }

    /// Sets the maximum string length.
    #[must_use]
    pub const fn with_max_string_len(mut self, len: usize) -> Self {
        self.max_string_len = len;
        self
    }
}

/// Returns a deterministic generator for `seed`.
#[must_use]
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Generates a random value conforming to `schema` with default limits.
///
/// # Errors
///
/// Fails if the schema admits no value at all: an enum without members or an
/// alternative without options.
pub fn random_value<R: Rng>(schema: &Schema, rng: &mut R) -> Result<Value> {
    random_value_with(schema, rng, &SampleConfig::default())
}

/// Generates a random value conforming to `schema`.
///
/// # Errors
///
/// See [`random_value`].
pub fn random_value_with<R: Rng>(
    schema: &Schema,
    rng: &mut R,
    config: &SampleConfig,
) -> Result<Value> {
    match schema {
        Schema::Boolean => Ok(Value::Bool(rng.gen_bool(0.5))),
        Schema::Number => Ok(Value::Num(rng.r#gen::<f64>())),
        Schema::String => {
            let len = rng.gen_range(0..=config.max_string_len);
            let text: String = (0..len)
                .map(|_| char::from(rng.sample(Alphanumeric)))
                .collect();
            Ok(Value::from(text))
        }
        Schema::EnumString(members) => members
            .iter()
            .choose(rng)
            .map(|m| Value::Str(m.clone()))
            .ok_or_else(|| Error::schema_mismatch(schema, "an enum with no members")),
        Schema::BoundedQuantity(constraint) => {
            let index = rng.gen_range(0..=constraint.max_index());
            Ok(Value::Quantity(constraint.from_index(index)))
        }
        Schema::Array(element) => {
            let len = rng.gen_range(0..=config.max_array_len);
            (0..len)
                .map(|i| {
                    random_value_with(element, rng, config).map_err(|e| e.at(PathSegment::Index(i)))
                })
                .collect::<Result<_>>()
                .map(Value::Seq)
        }
        Schema::Record(fields) => {
            let mut record = Record::new();
            for (name, field) in fields {
                let value = random_value_with(field, rng, config)
                    .map_err(|e| e.at(PathSegment::Field(name.clone())))?;
                record = record.with(name.clone(), value);
            }
            Ok(Value::Record(record))
        }
        Schema::Alternative(options) => {
            if options.is_empty() {
                return Err(Error::alternative_exhausted(Vec::new(), "nothing to choose from"));
            }
            let i = rng.gen_range(0..options.len());
            random_value_with(&options[i], rng, config).map_err(|e| e.at(PathSegment::Option(i)))
        }
    }
}
