//! Environment variable access.
//!
//! The bootstrap never reads `std::env` directly: it reads an [`Environment`]
//! snapshot so embedders and tests can supply their own variables without
//! mutating the process environment.

use prism_core::{Status, StatusResult};
use rustc_hash::FxHashMap;
use std::ffi::{OsStr, OsString};

/// A snapshot of environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: FxHashMap<OsString, OsString>,
}

impl Environment {
    /// Create an empty environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the current process environment.
    #[must_use]
    pub fn process() -> Self {
        Self {
            vars: std::env::vars_os().collect(),
        }
    }

    /// Build an environment from name/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<OsString>,
        V: Into<OsString>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Set a variable.
    pub fn set(&mut self, name: impl Into<OsString>, value: impl Into<OsString>) {
        self.vars.insert(name.into(), value.into());
    }

    /// Remove a variable.
    pub fn remove(&mut self, name: &str) {
        self.vars.remove(OsStr::new(name));
    }

    /// Raw value of `name`, or `None` when unset or empty.
    #[must_use]
    pub fn get_os(&self, name: &str) -> Option<&OsStr> {
        self.vars
            .get(OsStr::new(name))
            .map(OsString::as_os_str)
            .filter(|value| !value.is_empty())
    }

    /// Decoded value of `name`, or `None` when unset or empty.
    ///
    /// A value that is not valid text is a decode error naming the variable.
    pub fn get(&self, name: &str) -> StatusResult<Option<String>> {
        match self.get_os(name) {
            None => Ok(None),
            Some(value) => value
                .to_str()
                .map(|s| Some(s.to_owned()))
                .ok_or_else(|| Status::decode("config_get_env", format!("cannot decode {name}"))),
        }
    }

    /// Numeric flag value of `name`.
    ///
    /// Returns `None` when unset or empty. Text that is not an integer, and
    /// negative integers, count as `1`.
    #[must_use]
    pub fn get_flag(&self, name: &str) -> Option<u32> {
        let value = self.get_os(name)?;
        let parsed = value
            .to_str()
            .and_then(|text| text.parse::<i32>().ok())
            .and_then(|n| u32::try_from(n).ok());
        Some(parsed.unwrap_or(1))
    }

    /// Raise `flag` to the value of the environment flag `name`.
    pub fn raise_flag(&self, flag: &mut u32, name: &str) {
        if let Some(value) = self.get_flag(name) {
            if *flag < value {
                *flag = value;
            }
        }
    }
}
