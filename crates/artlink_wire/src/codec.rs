//! The composed codec: validation, both compaction passes, and the wire
//! format, built once per schema.
//!
//! Encoding runs validate, key compaction, value compaction, CBOR, then
//! text. Decoding runs the exact inverse and re-validates the result against
//! the declared schema, so data written for another schema (or another
//! version of this one) is rejected instead of loaded.

use artlink_foundation::{Error, Limit, Result, Value};
use artlink_schema::{KeyCompaction, Schema, ValueCompaction, key_compact, validate_strict, value_compact};
use tracing::{debug, instrument};

use crate::cbor::{decode_cbor_with, encode_cbor};
use crate::config::CodecConfig;
use crate::text::{from_text, to_text};

/// Encoder/decoder pair for one schema.
///
/// Immutable once built; share it behind an `Arc` to use from many threads.
#[derive(Clone, Debug)]
pub struct Codec {
    schema: Schema,
    keys: KeyCompaction,
    values: ValueCompaction,
    config: CodecConfig,
}

/// Builds a codec for `schema` with the default configuration.
///
/// # Errors
///
/// Fails if a record or enum in `schema` has more names than there are
/// single-character codes.
pub fn construct(schema: &Schema) -> Result<Codec> {
    construct_with(schema, CodecConfig::default())
}

/// Builds a codec for `schema`.
///
/// # Errors
///
/// See [`construct`].
#[instrument(level = "debug", skip_all, fields(shape = %schema.shape()))]
pub fn construct_with(schema: &Schema, config: CodecConfig) -> Result<Codec> {
    let keys = key_compact(schema)?;
    let values = value_compact(keys.schema())?;
    debug!(wire = %values.wire_schema(), "codec ready");
    Ok(Codec {
        schema: schema.clone(),
        keys,
        values,
        config,
    })
}

impl Codec {
    /// Returns the schema values are checked against.
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns the schema of the compacted value that goes on the wire.
    #[must_use]
    pub fn wire_schema(&self) -> &Schema {
        self.values.wire_schema()
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Encodes `value` as URL-safe text.
    ///
    /// # Errors
    ///
    /// Fails with a schema-class error if `value` does not conform to the
    /// schema.
    #[instrument(level = "debug", skip_all)]
    pub fn encode(&self, value: &Value) -> Result<String> {
        self.encode_bytes(value).map(|bytes| to_text(&bytes))
    }

    /// Decodes URL-safe text produced by [`Codec::encode`].
    ///
    /// # Errors
    ///
    /// - `LimitExceeded` for text longer than the configured maximum
    /// - `Decode` for malformed text or binary payload
    /// - a schema-class error for data that does not belong to this schema
    #[instrument(level = "debug", skip_all, fields(len = text.len()))]
    pub fn decode(&self, text: &str) -> Result<Value> {
        if text.len() > self.config.max_text_len {
            return Err(Error::limit_exceeded(Limit::TextLength {
                limit: self.config.max_text_len,
                actual: text.len(),
            }));
        }
        let bytes = from_text(text).inspect_err(|e| debug!(error = %e, "rejected link text"))?;
        self.decode_bytes(&bytes)
    }

    /// Encodes `value` as CBOR, without the text layer.
    ///
    /// # Errors
    ///
    /// See [`Codec::encode`].
    pub fn encode_bytes(&self, value: &Value) -> Result<Vec<u8>> {
        let compact = self.compact(value)?;
        encode_cbor(&compact)
    }

    /// Decodes CBOR produced by [`Codec::encode_bytes`].
    ///
    /// # Errors
    ///
    /// See [`Codec::decode`].
    pub fn decode_bytes(&self, bytes: &[u8]) -> Result<Value> {
        let raw = decode_cbor_with(bytes, &self.config)?;
        self.expand(&raw)
            .inspect_err(|e| debug!(error = %e, "rejected link payload"))
    }

    /// Runs validation and both compaction passes, producing the value that
    /// is serialized.
    ///
    /// # Errors
    ///
    /// See [`Codec::encode`].
    pub fn compact(&self, value: &Value) -> Result<Value> {
        validate_strict(&self.schema, value)
            .inspect_err(|e| debug!(error = %e, "rejected value"))?;
        let keyed = self.keys.encode(value)?;
        self.values.encode(&keyed)
    }

    /// Inverse of [`Codec::compact`].
    ///
    /// # Errors
    ///
    /// Fails with a schema-class error for data that does not belong to this
    /// schema.
    pub fn expand(&self, raw: &Value) -> Result<Value> {
        validate_strict(self.values.wire_schema(), raw)?;
        let keyed = self.values.decode(raw)?;
        let value = self.keys.decode(&keyed)?;
        validate_strict(&self.schema, &value)?;
        Ok(value)
    }
}
