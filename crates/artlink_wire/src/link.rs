//! Settings stored in a link's query string.
//!
//! A link carries the format version and the encoded settings as two query
//! parameters, `v=1&data=<text>` by default. Restoring falls back to a
//! caller-supplied value when the link is missing, stale, or damaged, so a bad
//! link never blocks the page.

use artlink_foundation::{DecodeError, Error, Result, Value};
use tracing::{instrument, warn};
use url::form_urlencoded;

use crate::codec::Codec;

/// The settings parameters parsed out of a query string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Link {
    /// The version parameter, if present.
    pub version: Option<String>,
    /// The encoded settings text.
    pub data: String,
}

impl Link {
    /// Parses the parameters named by the codec's configuration out of
    /// `query`. A leading `?` is ignored; when a parameter repeats, the first
    /// occurrence wins.
    ///
    /// # Errors
    ///
    /// Returns `Decode(Text)` if the data parameter is absent.
    pub fn parse(codec: &Codec, query: &str) -> Result<Self> {
        let config = codec.config();
        let query = query.strip_prefix('?').unwrap_or(query);

        let mut version = None;
        let mut data = None;
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            if key == config.version_key.as_str() && version.is_none() {
                version = Some(value.into_owned());
            } else if key == config.query_key.as_str() && data.is_none() {
                data = Some(value.into_owned());
            }
        }

        let data = data.ok_or_else(|| {
            Error::from(DecodeError::Text(format!(
                "missing `{}` parameter",
                config.query_key
            )))
        })?;
        Ok(Self { version, data })
    }

    /// Encodes `value` into a query string (without the leading `?`).
    ///
    /// # Errors
    ///
    /// Fails if `value` does not conform to the codec's schema.
    pub fn to_query(codec: &Codec, value: &Value) -> Result<String> {
        let config = codec.config();
        let text = codec.encode(value)?;
        Ok(form_urlencoded::Serializer::new(String::new())
            .append_pair(&config.version_key, &config.version)
            .append_pair(&config.query_key, &text)
            .finish())
    }

    /// Decodes the settings carried by `query`.
    ///
    /// A missing version parameter is accepted; a different one is a schema
    /// mismatch.
    ///
    /// # Errors
    ///
    /// Fails if the data parameter is absent, the version differs, or the
    /// data does not decode under the codec's schema.
    pub fn from_query(codec: &Codec, query: &str) -> Result<Value> {
        let link = Self::parse(codec, query)?;
        let expected = &codec.config().version;
        if let Some(found) = link.version.as_deref() {
            if found != expected {
                return Err(Error::schema_mismatch(
                    format!("link version {expected}"),
                    format!("version {found}"),
                ));
            }
        }
        codec.decode(&link.data)
    }
}

/// Restores settings from `query`, or produces them with `fallback` when the
/// link cannot be used.
///
/// # Errors
///
/// Only the fallback's own error is returned.
#[instrument(level = "debug", skip_all)]
pub fn restore_or_else<F>(codec: &Codec, query: &str, fallback: F) -> Result<Value>
where
    F: FnOnce() -> Result<Value>,
{
    match Link::from_query(codec, query) {
        Ok(value) => Ok(value),
        Err(error) => {
            warn!(%error, "could not restore settings from link; using fallback");
            fallback()
        }
    }
}
