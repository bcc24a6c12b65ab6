//! Binary form of a compacted value: one self-describing CBOR item.
//!
//! Records become maps with text keys, sequences become arrays, and numbers
//! become integers when that is lossless and floats otherwise. Decoding
//! accepts only the items encoding can produce.

use artlink_foundation::{DecodeError, Error, ErrorKind, Limit, Record, Result, Value};
use ciborium::Value as Item;

use crate::config::CodecConfig;

/// Largest magnitude below which every integer is exactly representable as
/// an `f64` (2^53).
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Serializes a compacted value to CBOR bytes.
///
/// # Errors
///
/// Fails with `SchemaMismatch` if `value` still contains a bounded
/// quantity; quantities must be compacted to indices first.
pub fn encode_cbor(value: &Value) -> Result<Vec<u8>> {
    let item = to_item(value)?;
    let mut bytes = Vec::new();
    ciborium::ser::into_writer(&item, &mut bytes)
        .map_err(|e| Error::new(ErrorKind::Internal(format!("cbor write failed: {e}"))))?;
    Ok(bytes)
}

/// Parses CBOR bytes with the default limits.
///
/// # Errors
///
/// See [`decode_cbor_with`].
pub fn decode_cbor(bytes: &[u8]) -> Result<Value> {
    decode_cbor_with(bytes, &CodecConfig::default())
}

/// Parses CBOR bytes into a value.
///
/// # Errors
///
/// - `Decode(Binary)` for truncated or malformed input
/// - `Decode(TrailingBytes)` for bytes after the item, when
///   [`CodecConfig::strict_trailing`] is set
/// - `Decode(Unsupported)` for tags, byte strings, null, non-text map keys,
///   duplicate keys, or integers no `f64` holds exactly
/// - `LimitExceeded` when the item is nested too deeply or has too many nodes
pub fn decode_cbor_with(bytes: &[u8], config: &CodecConfig) -> Result<Value> {
    let mut reader = bytes;
    let item: Item = ciborium::de::from_reader(&mut reader).map_err(|e| read_error(e, config))?;
    if config.strict_trailing && !reader.is_empty() {
        return Err(DecodeError::TrailingBytes(reader.len()).into());
    }

    let mut items = 0;
    from_item(item, 1, config, &mut items)
}

fn read_error(err: ciborium::de::Error<std::io::Error>, config: &CodecConfig) -> Error {
    use ciborium::de::Error as E;
    match err {
        E::Io(_) => DecodeError::Binary("truncated payload".to_string()).into(),
        E::Syntax(offset) => DecodeError::Binary(format!("invalid syntax at byte {offset}")).into(),
        E::Semantic(_, msg) => DecodeError::Binary(msg).into(),
        E::RecursionLimitExceeded => Error::limit_exceeded(Limit::Depth {
            limit: config.max_depth,
        }),
    }
}

fn to_item(value: &Value) -> Result<Item> {
    Ok(match value {
        Value::Bool(b) => Item::Bool(*b),
        Value::Num(n) => number_item(*n),
        Value::Str(s) => Item::Text(s.to_string()),
        Value::Quantity(_) => {
            return Err(Error::schema_mismatch("compacted value", value.describe()));
        }
        Value::Seq(items) => Item::Array(items.iter().map(to_item).collect::<Result<_>>()?),
        Value::Record(record) => Item::Map(
            record
                .iter()
                .map(|(k, v)| to_item(v).map(|v| (Item::Text(k.to_string()), v)))
                .collect::<Result<_>>()?,
        ),
    })
}

fn number_item(n: f64) -> Item {
    let negative_zero = n == 0.0 && n.is_sign_negative();
    if n.fract() == 0.0 && n.abs() <= MAX_EXACT_INTEGER && !negative_zero {
        #[allow(clippy::cast_possible_truncation)]
        let int = n as i64;
        Item::Integer(int.into())
    } else {
        Item::Float(n)
    }
}

fn from_item(item: Item, depth: usize, config: &CodecConfig, items: &mut usize) -> Result<Value> {
    if depth > config.max_depth {
        return Err(Error::limit_exceeded(Limit::Depth {
            limit: config.max_depth,
        }));
    }
    *items += 1;
    if *items > config.max_items {
        return Err(Error::limit_exceeded(Limit::Items {
            limit: config.max_items,
        }));
    }

    match item {
        Item::Bool(b) => Ok(Value::Bool(b)),
        Item::Float(f) => Ok(Value::Num(f)),
        Item::Integer(i) => {
            let i = i128::from(i);
            if i.unsigned_abs() <= 1 << 53 {
                #[allow(clippy::cast_precision_loss)]
                let n = i as f64;
                Ok(Value::Num(n))
            } else {
                Err(DecodeError::Unsupported(format!("integer {i} is not exact as a number")).into())
            }
        }
        Item::Text(s) => Ok(Value::from(s)),
        Item::Array(elements) => elements
            .into_iter()
            .map(|e| from_item(e, depth + 1, config, items))
            .collect::<Result<_>>()
            .map(Value::Seq),
        Item::Map(entries) => {
            let mut record = Record::new();
            for (key, value) in entries {
                let key = match key {
                    Item::Text(key) => key,
                    other => {
                        return Err(DecodeError::Unsupported(format!(
                            "{} as record key",
                            item_name(&other)
                        ))
                        .into());
                    }
                };
                if record.contains_key(&key) {
                    return Err(DecodeError::Unsupported(format!("duplicate key {key:?}")).into());
                }
                let value = from_item(value, depth + 1, config, items)?;
                record = record.with(key, value);
            }
            Ok(Value::Record(record))
        }
        other => Err(DecodeError::Unsupported(item_name(&other).to_string()).into()),
    }
}

fn item_name(item: &Item) -> &'static str {
    match item {
        Item::Bool(_) => "boolean",
        Item::Integer(_) => "integer",
        Item::Float(_) => "float",
        Item::Text(_) => "text",
        Item::Bytes(_) => "byte string",
        Item::Null => "null",
        Item::Tag(..) => "tag",
        Item::Array(_) => "array",
        Item::Map(_) => "map",
        _ => "unknown item",
    }
}
