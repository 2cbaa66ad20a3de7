use std::fmt;
use std::sync::Arc;

/// Normalized event identifier.
///
/// Keys are normalized once at construction: surrounding whitespace is
/// trimmed and the remainder lowercased. Handler declarations, ignore entries
/// and posts all build their keys here, so lookups are key-equal regardless
/// of caller casing or padding.
///
/// Cloning is cheap (shared string).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventKey(Arc<str>);

impl EventKey {
    /// Builds a normalized key from raw caller input.
    pub fn new(raw: &str) -> Self {
        Self(Arc::from(raw.trim().to_lowercase()))
    }

    /// The normalized key as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when nothing remains after normalization.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for EventKey {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for EventKey {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventKey({:?})", &*self.0)
    }
}
