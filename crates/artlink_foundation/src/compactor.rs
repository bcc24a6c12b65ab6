//! Identifier compaction: bidirectional mapping from a fixed set of strings to
//! single-character codes.
//!
//! Codes are assigned from U+0000 upward in sorted order of the input
//! strings, so rebuilding from the same set in any order yields the same
//! mapping. The surrogate range is skipped because it holds no `char`s.

use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Limit};
use crate::Result;

const SURROGATE_START: u32 = 0xD800;
const SURROGATE_LEN: u32 = 0x800;

/// Number of Unicode scalar values, i.e. the most identifiers a compactor
/// can hold.
pub const MAX_IDENTIFIERS: usize = 0x11_0000 - SURROGATE_LEN as usize;

/// Deterministic string-to-code table.
#[derive(Clone, PartialEq, Eq)]
pub struct IdentifierCompactor {
    /// Sorted, deduplicated keys; a key's position is its code point (modulo
    /// the surrogate gap).
    keys: Vec<Arc<str>>,
}

impl IdentifierCompactor {
    /// Builds a compactor over `keys`. Duplicates are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Limit::Identifiers`] if there are more distinct keys than
    /// single-character codes.
    pub fn new<I, S>(keys: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut keys: Vec<Arc<str>> = keys.into_iter().map(|k| Arc::from(k.as_ref())).collect();
        keys.sort();
        keys.dedup();

        if keys.len() > MAX_IDENTIFIERS {
            return Err(Error::limit_exceeded(Limit::Identifiers {
                requested: keys.len(),
            }));
        }

        Ok(Self { keys })
    }

    /// Returns the number of identifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if the compactor holds no identifiers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns the code assigned to `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::UnknownKey`](crate::ErrorKind::UnknownKey) if
    /// `key` was not in the original set.
    pub fn code_of(&self, key: &str) -> Result<char> {
        self.keys
            .binary_search_by(|k| (**k).cmp(key))
            .ok()
            .and_then(code_for_index)
            .ok_or_else(|| Error::unknown_key(key))
    }

    /// Returns the key that was assigned `code`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::UnknownCode`](crate::ErrorKind::UnknownCode) if
    /// `code` was never assigned.
    pub fn key_of(&self, code: char) -> Result<&Arc<str>> {
        self.keys
            .get(index_for_code(code))
            .ok_or_else(|| Error::unknown_code(code.to_string()))
    }

    /// Like [`IdentifierCompactor::key_of`], for a code stored as a string.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::UnknownCode`](crate::ErrorKind::UnknownCode)
    /// unless `code` is exactly one assigned character.
    pub fn key_of_str(&self, code: &str) -> Result<&Arc<str>> {
        let mut chars = code.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => self.key_of(c),
            _ => Err(Error::unknown_code(code)),
        }
    }

    /// Returns `(code, key)` pairs in code order.
    pub fn iter(&self) -> impl Iterator<Item = (char, &Arc<str>)> {
        self.keys
            .iter()
            .enumerate()
            .filter_map(|(i, k)| code_for_index(i).map(|c| (c, k)))
    }
}

impl fmt::Debug for IdentifierCompactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

fn code_for_index(index: usize) -> Option<char> {
    let n = u32::try_from(index).ok()?;
    let n = if n >= SURROGATE_START {
        n.checked_add(SURROGATE_LEN)?
    } else {
        n
    };
    char::from_u32(n)
}

fn index_for_code(code: char) -> usize {
    let n = u32::from(code);
    let n = if n >= SURROGATE_START + SURROGATE_LEN {
        n - SURROGATE_LEN
    } else {
        n
    };
    n as usize
}
