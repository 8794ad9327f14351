//! `sys.argv` and `sys.orig_argv`.

use crate::modules::Value;
use prism_core::{InternedString, StringInterner};
use std::sync::Arc;

/// Command-line arguments container.
///
/// Arguments are interned once so repeated reads of `sys.argv` share the
/// same strings.
#[derive(Debug, Clone)]
pub struct SysArgv {
    args: Arc<[InternedString]>,
}

impl SysArgv {
    /// Intern `args`.
    pub fn new<S: AsRef<str>>(args: &[S], interner: &StringInterner) -> Self {
        let args: Vec<InternedString> = args
            .iter()
            .map(|arg| interner.intern(arg.as_ref()))
            .collect();
        Self { args: args.into() }
    }

    /// Create empty argv.
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self {
            args: Arc::from([]),
        }
    }

    /// Get the number of arguments.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// Check if empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Get argument by index.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(InternedString::as_str)
    }

    /// Get the script name (first argument).
    #[inline]
    #[must_use]
    pub fn script(&self) -> Option<&str> {
        self.get(0)
    }

    /// Iterate over arguments.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.args.iter().map(InternedString::as_str)
    }

    /// Convert to a `list[str]` value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::List(self.args.iter().cloned().map(Value::Str).collect())
    }
}

impl Default for SysArgv {
    fn default() -> Self {
        Self::empty()
    }
}
