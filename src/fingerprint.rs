//! `Fingerprint` — the type-erased lookup key that flows between `Filter`
//! and `NodeCache`.
//!
//! Filters produce fingerprints, caches index child nodes by them. The enum
//! erases the key type so caches stay non-generic over the user's input:
//! the same cache implementation serves a range filter keyed by `(min, max)`
//! and a category filter keyed by a set of tags.
//!
//! Fingerprints are scoped to a single filter — every node owns its own
//! cache instance, so two filters may legally produce identical values.

use std::fmt::Debug;

/// A hashable, equality-comparable cache key derived from an input.
///
/// # The `None` variant
///
/// `Fingerprint::None` means the filter could not produce a key. A filter
/// paired with a cache must never return it — the tree treats it as a fatal
/// error ([`TreeError::MissingFingerprint`](crate::TreeError::MissingFingerprint))
/// rather than silently skipping the cache. Filters that want "match any"
/// behavior should return a fixed sentinel value instead, e.g.
/// `Fingerprint::Bool(true)`.
///
/// # Compound keys
///
/// When several input fields participate in one filter, return a single
/// [`Compound`](Self::Compound) so one lookup covers the whole combination:
///
/// ```
/// use sievetree::Fingerprint;
///
/// let key = Fingerprint::compound([Fingerprint::Int(5), Fingerprint::Int(10)]);
/// assert_eq!(
///     key,
///     Fingerprint::compound([Fingerprint::Int(5), Fingerprint::Int(10)]),
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Fingerprint {
    /// No key available. Fatal when a cache lookup needs one.
    None,

    /// String key — the most common case.
    Str(String),

    /// Integer key.
    Int(i64),

    /// Boolean key.
    Bool(bool),

    /// Raw bytes key.
    Bytes(Vec<u8>),

    /// Compound key over several fields, compared element-wise in order.
    Compound(Vec<Fingerprint>),
}

impl Fingerprint {
    /// Returns `true` if this is the `None` variant.
    #[inline]
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Build a compound key from any iterator of fingerprints.
    ///
    /// Element order is significant; callers keying on an unordered
    /// collection should sort before building the compound.
    #[must_use]
    pub fn compound<T>(parts: T) -> Self
    where
        T: IntoIterator<Item = Fingerprint>,
    {
        Self::Compound(parts.into_iter().collect())
    }

    /// Try to get the key as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s.as_str()),
            _ => Option::None,
        }
    }

    /// Try to get the key as an integer.
    #[inline]
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => Option::None,
        }
    }
}

impl Default for Fingerprint {
    fn default() -> Self {
        Self::None
    }
}

impl From<String> for Fingerprint {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<&str> for Fingerprint {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<i64> for Fingerprint {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<bool> for Fingerprint {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Vec<u8>> for Fingerprint {
    fn from(b: Vec<u8>) -> Self {
        Self::Bytes(b)
    }
}

impl From<Vec<Fingerprint>> for Fingerprint {
    fn from(parts: Vec<Fingerprint>) -> Self {
        Self::Compound(parts)
    }
}

impl<T> From<Option<T>> for Fingerprint
where
    T: Into<Fingerprint>,
{
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            Option::None => Self::None,
        }
    }
}
