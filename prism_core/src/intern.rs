//! String interning for runtime-owned identifiers.
//!
//! The runtime interns the names it publishes during startup (module names,
//! `sys` attribute names, path entries) so repeated lookups compare by
//! pointer. The interner is owned by the runtime and cleared when the
//! runtime finalizes, which releases every cached string at once.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A handle to an interned string.
///
/// Two handles are equal if and only if they came from the same interner
/// and hold the same content.
#[derive(Clone)]
pub struct InternedString {
    inner: Arc<str>,
}

impl InternedString {
    #[inline]
    fn new(s: Arc<str>) -> Self {
        Self { inner: s }
    }

    /// Get the string content.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Get the length in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check if the string is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Get a clone of the underlying Arc.
    #[inline]
    #[must_use]
    pub fn get_arc(&self) -> Arc<str> {
        self.inner.clone()
    }
}

impl PartialEq for InternedString {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for InternedString {}

impl Hash for InternedString {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.as_ptr().hash(state);
    }
}

impl fmt::Debug for InternedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InternedString({:?})", self.as_str())
    }
}

impl fmt::Display for InternedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for InternedString {
    #[inline]
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::ops::Deref for InternedString {
    type Target = str;

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl PartialEq<&str> for InternedString {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// Thread-safe string interner.
pub struct StringInterner {
    strings: RwLock<FxHashMap<Arc<str>, InternedString>>,
}

impl StringInterner {
    /// Create a new, empty string interner.
    #[must_use]
    pub fn new() -> Self {
        Self {
            strings: RwLock::new(FxHashMap::default()),
        }
    }

    /// Intern a string, returning a handle.
    ///
    /// Interning the same content twice returns the same handle.
    pub fn intern(&self, s: &str) -> InternedString {
        if let Some(interned) = self.strings.read().get(s) {
            return interned.clone();
        }

        let mut strings = self.strings.write();
        // Another caller may have won the race for the write lock.
        if let Some(interned) = strings.get(s) {
            return interned.clone();
        }

        let arc: Arc<str> = s.into();
        let interned = InternedString::new(arc.clone());
        strings.insert(arc, interned.clone());
        interned
    }

    /// Get an already-interned string without creating a new one.
    #[must_use]
    pub fn get(&self, s: &str) -> Option<InternedString> {
        self.strings.read().get(s).cloned()
    }

    /// Check if a string has been interned.
    #[must_use]
    pub fn contains(&self, s: &str) -> bool {
        self.strings.read().contains_key(s)
    }

    /// Get the number of interned strings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.read().len()
    }

    /// Check if the interner is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strings.read().is_empty()
    }

    /// Release every interned string.
    ///
    /// Outstanding handles stay valid but no longer deduplicate against
    /// strings interned afterwards.
    pub fn clear(&self) {
        self.strings.write().clear();
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StringInterner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StringInterner")
            .field("count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_same_string_returns_same_handle() {
        let interner = StringInterner::new();
        let s1 = interner.intern("sys");
        let s2 = interner.intern("sys");

        assert!(Arc::ptr_eq(&s1.inner, &s2.inner));
        assert_eq!(s1, s2);
    }

    #[test]
    fn test_intern_different_strings_returns_different_handles() {
        let interner = StringInterner::new();
        let s1 = interner.intern("prefix");
        let s2 = interner.intern("exec_prefix");

        assert_ne!(s1, s2);
        assert_eq!(interner.len(), 2);
    }

    #[test]
    fn test_interner_get_and_contains() {
        let interner = StringInterner::new();
        interner.intern("__main__");

        assert!(interner.contains("__main__"));
        assert_eq!(interner.get("__main__").unwrap(), "__main__");
        assert!(interner.get("builtins").is_none());
    }

    #[test]
    fn test_interner_clear_keeps_handles_valid() {
        let interner = StringInterner::new();
        let before = interner.intern("argv");
        interner.clear();

        assert!(interner.is_empty());
        assert_eq!(before.as_str(), "argv");

        let after = interner.intern("argv");
        assert_ne!(before, after);
    }
}
