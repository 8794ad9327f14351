//! Raw command line arguments.

use prism_core::{Status, StatusResult};
use std::ffi::OsString;

/// Command line arguments as handed to the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Argv {
    /// Arguments as raw OS strings, decoded on use.
    Bytes(Vec<OsString>),
    /// Already decoded arguments.
    Str(Vec<String>),
}

impl Argv {
    /// Arguments of the running process.
    #[must_use]
    pub fn process() -> Self {
        Self::Bytes(std::env::args_os().collect())
    }

    /// Number of arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Bytes(args) => args.len(),
            Self::Str(args) => args.len(),
        }
    }

    /// Check if there are no arguments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Decode into text.
    pub fn decode(&self) -> StatusResult<Vec<String>> {
        match self {
            Self::Str(args) => Ok(args.clone()),
            Self::Bytes(args) => args
                .iter()
                .map(|arg| {
                    arg.to_str().map(str::to_owned).ok_or_else(|| {
                        Status::decode("argv_decode", "cannot decode command line arguments")
                    })
                })
                .collect(),
        }
    }
}

impl From<Vec<String>> for Argv {
    fn from(args: Vec<String>) -> Self {
        Self::Str(args)
    }
}

impl From<&[&str]> for Argv {
    fn from(args: &[&str]) -> Self {
        Self::Str(args.iter().map(|s| (*s).to_owned()).collect())
    }
}
