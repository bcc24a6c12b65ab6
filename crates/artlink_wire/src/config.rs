//! Configuration for the wire codec.

/// Limits and link parameters for a [`Codec`](crate::Codec).
///
/// Limits guard the decoder against hostile links; they never affect what
/// encoding produces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodecConfig {
    /// Longest link text accepted for decoding, in bytes.
    pub max_text_len: usize,

    /// Deepest nesting accepted in a decoded payload.
    pub max_depth: usize,

    /// Most nodes accepted in a decoded payload.
    pub max_items: usize,

    /// Reject bytes following the first complete payload item.
    pub strict_trailing: bool,

    /// Query parameter holding the encoded settings.
    pub query_key: String,

    /// Query parameter holding the link format version.
    pub version_key: String,

    /// Link format version written by, and expected from, the link helpers.
    pub version: String,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_text_len: 8192,
            max_depth: 64,
            max_items: 65_536,
            strict_trailing: true,
            query_key: "data".to_string(),
            version_key: "v".to_string(),
            version: "1".to_string(),
        }
    }
}

impl CodecConfig {
    /// Creates a configuration with generous limits and no trailing-byte
    /// check.
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            max_text_len: 1 << 20,
            max_depth: 128,
            max_items: 1 << 20,
            strict_trailing: false,
            ..Self::default()
        }
    }

    /// Creates a configuration with tight limits, suited to links typed or
    /// pasted by hand.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            max_text_len: 2048,
            max_depth: 16,
            max_items: 4096,
            strict_trailing: true,
            ..Self::default()
        }
    }

    /// Builder method to set the maximum text length.
    #[must_use]
    pub fn with_max_text_len(mut self, len: usize) -> Self {
        self.max_text_len = len;
        self
    }

    /// Builder method to set the maximum nesting depth.
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Builder method to set the maximum node count.
    #[must_use]
    pub fn with_max_items(mut self, items: usize) -> Self {
        self.max_items = items;
        self
    }

    /// Builder method to enable/disable the trailing-byte check.
    #[must_use]
    pub fn with_strict_trailing(mut self, strict: bool) -> Self {
        self.strict_trailing = strict;
        self
    }

    /// Builder method to set the data query parameter.
    #[must_use]
    pub fn with_query_key(mut self, key: impl Into<String>) -> Self {
        self.query_key = key.into();
        self
    }

    /// Builder method to set the version parameter and value.
    #[must_use]
    pub fn with_version(mut self, key: impl Into<String>, version: impl Into<String>) -> Self {
        self.version_key = key.into();
        self.version = version.into();
        self
    }
}
