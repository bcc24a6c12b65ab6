//! URL-safe text form of the binary payload.
//!
//! Uses the base64 URL-safe alphabet (`A-Z a-z 0-9 - _`), so the text needs
//! no percent-escaping in a query component. Output never carries `=`
//! padding; input may.

use artlink_foundation::{DecodeError, Result};
use base64::Engine;
use base64::alphabet;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Encodes bytes as unpadded URL-safe base64.
#[must_use]
pub fn to_text(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decodes URL-safe base64, with or without padding.
///
/// # Errors
///
/// Returns `Decode(Text)` for characters outside the alphabet or an
/// impossible length.
pub fn from_text(text: &str) -> Result<Vec<u8>> {
    LENIENT
        .decode(text)
        .map_err(|e| DecodeError::Text(e.to_string()).into())
}
