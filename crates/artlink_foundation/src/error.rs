//! Error types for the artlink system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//! Every failure is a typed reason: the shape that was expected against what
//! was found, or the field, key, or code that caused the mismatch.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// The main error type for artlink operations.
#[derive(Debug, Error)]
#[error("{kind}{}", context_suffix(.context))]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where in the value the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Records that the error happened inside `segment`.
    ///
    /// Called while the error bubbles out of a recursive pass, so segments
    /// arrive innermost first.
    #[must_use]
    pub fn at(mut self, segment: PathSegment) -> Self {
        self.context
            .get_or_insert_with(ErrorContext::new)
            .frames
            .push(segment);
        self
    }

    /// Creates a schema mismatch error.
    #[must_use]
    pub fn schema_mismatch(expected: impl fmt::Display, found: impl Into<String>) -> Self {
        Self::new(ErrorKind::SchemaMismatch {
            expected: expected.to_string(),
            found: found.into(),
        })
    }

    /// Creates a missing field error.
    #[must_use]
    pub fn missing_field(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingField(name.into()))
    }

    /// Creates an unexpected field error.
    #[must_use]
    pub fn unexpected_field(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnexpectedField(name.into()))
    }

    /// Creates an unknown key error.
    #[must_use]
    pub fn unknown_key(key: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownKey(key.into()))
    }

    /// Creates an unknown code error.
    #[must_use]
    pub fn unknown_code(code: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownCode(code.into()))
    }

    /// Creates an exhausted alternative error.
    #[must_use]
    pub fn alternative_exhausted(attempted: Vec<String>, found: impl Into<String>) -> Self {
        Self::new(ErrorKind::AlternativeExhausted {
            attempted,
            found: found.into(),
        })
    }

    /// Creates an error for two alternative options that compact to the same
    /// wire shape.
    #[must_use]
    pub fn ambiguous_alternative(first: usize, second: usize) -> Self {
        Self::new(ErrorKind::AmbiguousAlternative { first, second })
    }

    /// Creates a wire decoding error.
    #[must_use]
    pub fn decode(err: DecodeError) -> Self {
        Self::new(ErrorKind::Decode(err))
    }

    /// Creates a limit exceeded error.
    #[must_use]
    pub fn limit_exceeded(limit: Limit) -> Self {
        Self::new(ErrorKind::LimitExceeded(limit))
    }

    /// Returns true if the error means "this data does not belong to the schema".
    ///
    /// Unknown keys and codes, missing or unexpected fields, and exhausted
    /// alternatives all indicate a schema or version mismatch and are treated
    /// the same way by callers.
    #[must_use]
    pub fn is_schema_mismatch(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::SchemaMismatch { .. }
                | ErrorKind::MissingField(_)
                | ErrorKind::UnexpectedField(_)
                | ErrorKind::UnknownKey(_)
                | ErrorKind::UnknownCode(_)
                | ErrorKind::AlternativeExhausted { .. }
                | ErrorKind::AmbiguousAlternative { .. }
        )
    }

    /// Returns true if the error means "this link is invalid": malformed wire
    /// text or bytes, or a link that breaks one of the decoder's limits.
    ///
    /// `LimitExceeded(Identifiers)` is raised while building a codec, not while
    /// reading a link, and is not counted.
    #[must_use]
    pub fn is_decode_error(&self) -> bool {
        match &self.kind {
            ErrorKind::Decode(_) => true,
            ErrorKind::LimitExceeded(limit) => limit.applies_to_links(),
            _ => false,
        }
    }

    /// Returns the value path where the error occurred, if known.
    #[must_use]
    pub fn path(&self) -> Option<String> {
        self.context.as_ref().map(ToString::to_string)
    }
}

fn context_suffix(context: &Option<ErrorContext>) -> String {
    context
        .as_ref()
        .map(|c| format!(" at {c}"))
        .unwrap_or_default()
}

impl From<DecodeError> for Error {
    fn from(err: DecodeError) -> Self {
        Self::decode(err)
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A value does not have the shape the schema declares.
    #[error("schema mismatch: expected {expected}, found {found}")]
    SchemaMismatch {
        /// Description of the expected shape.
        expected: String,
        /// Description of what was found instead.
        found: String,
    },

    /// A record is missing a declared field.
    #[error("missing field: {0}")]
    MissingField(String),

    /// A record carries a field the schema does not declare.
    #[error("unexpected field: {0}")]
    UnexpectedField(String),

    /// An identifier compactor was asked for a key it was not built with.
    #[error("unknown key: {0:?}")]
    UnknownKey(String),

    /// An identifier compactor was asked for a code it never assigned.
    #[error("unknown code: {0:?}")]
    UnknownCode(String),

    /// No option of an alternative accepted the value.
    #[error("no alternative matched {found}; tried [{}]", .attempted.join(", "))]
    AlternativeExhausted {
        /// Shapes of every option that was attempted, in declared order.
        attempted: Vec<String>,
        /// Description of the rejected value.
        found: String,
    },

    /// Two options of an alternative are indistinguishable once their field
    /// names are compacted, so a value of the later one could come back as
    /// the earlier one.
    #[error("alternative options {first} and {second} compact to the same shape")]
    AmbiguousAlternative {
        /// Index of the option that would win on decode.
        first: usize,
        /// Index of the option it shadows.
        second: usize,
    },

    /// Malformed wire text or binary payload.
    #[error("invalid link: {0}")]
    Decode(DecodeError),

    /// A configured codec limit was exceeded.
    #[error("limit exceeded: {0}")]
    LimitExceeded(Limit),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Reasons a wire payload could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The text contains characters outside the URL-safe alphabet or has an
    /// impossible length.
    #[error("malformed text: {0}")]
    Text(String),

    /// The binary payload is truncated or structurally invalid.
    #[error("malformed binary: {0}")]
    Binary(String),

    /// Bytes remain after the first complete item.
    #[error("{0} trailing byte(s) after payload")]
    TrailingBytes(usize),

    /// The payload is well-formed but uses an item no settings value maps to.
    #[error("unsupported item: {0}")]
    Unsupported(String),
}

/// Limits that can be exceeded while compacting or decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Limit {
    /// Wire text longer than the configured maximum.
    TextLength {
        /// The configured limit.
        limit: usize,
        /// The length that was seen.
        actual: usize,
    },
    /// Decoded item nested deeper than the configured maximum.
    Depth {
        /// The configured limit.
        limit: usize,
    },
    /// Decoded item containing more nodes than the configured maximum.
    Items {
        /// The configured limit.
        limit: usize,
    },
    /// More identifiers than there are single-character codes.
    Identifiers {
        /// Number of identifiers requested.
        requested: usize,
    },
}

impl Limit {
    /// Returns true for limits enforced while reading a link.
    #[must_use]
    pub const fn applies_to_links(&self) -> bool {
        matches!(
            self,
            Self::TextLength { .. } | Self::Depth { .. } | Self::Items { .. }
        )
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TextLength { limit, actual } => {
                write!(f, "text length {actual} exceeds maximum ({limit})")
            }
            Self::Depth { limit } => write!(f, "max nesting depth ({limit}) exceeded"),
            Self::Items { limit } => write!(f, "max item count ({limit}) exceeded"),
            Self::Identifiers { requested } => {
                write!(f, "{requested} identifiers do not fit in single-character codes")
            }
        }
    }
}

/// One step of a path into a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// A record field.
    Field(Arc<str>),
    /// A sequence element.
    Index(usize),
    /// An option of an alternative.
    Option(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) if is_plain_identifier(name) => write!(f, ".{name}"),
            Self::Field(name) => write!(f, "[{name:?}]"),
            Self::Index(i) => write!(f, "[{i}]"),
            Self::Option(i) => write!(f, "<option {i}>"),
        }
    }
}

fn is_plain_identifier(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Path frames, innermost first.
    pub frames: Vec<PathSegment>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }

    /// Adds a frame outside the ones already recorded.
    #[must_use]
    pub fn with_frame(mut self, frame: PathSegment) -> Self {
        self.frames.push(frame);
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$")?;
        for frame in self.frames.iter().rev() {
            write!(f, "{frame}")?;
        }
        Ok(())
    }
}
