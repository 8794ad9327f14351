//! `sys.path`.

use crate::modules::Value;
use prism_core::{InternedString, StringInterner};

/// Module search paths container.
#[derive(Debug, Clone, Default)]
pub struct SysPaths {
    paths: Vec<InternedString>,
}

impl SysPaths {
    /// Create empty paths.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self { paths: Vec::new() }
    }

    /// Intern `paths` in order.
    pub fn with_paths<S: AsRef<str>>(paths: &[S], interner: &StringInterner) -> Self {
        Self {
            paths: paths.iter().map(|p| interner.intern(p.as_ref())).collect(),
        }
    }

    /// Get number of paths.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Check if empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Get path by index.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.paths.get(index).map(InternedString::as_str)
    }

    /// Insert a path at index; out-of-range indices are ignored.
    #[inline]
    pub fn insert(&mut self, index: usize, path: InternedString) {
        if index <= self.paths.len() {
            self.paths.insert(index, path);
        }
    }

    /// Iterate over paths.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(InternedString::as_str)
    }

    /// Convert to a `list[str]` value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::List(self.paths.iter().cloned().map(Value::Str).collect())
    }
}
