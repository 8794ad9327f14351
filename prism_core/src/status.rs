//! Bootstrap status results.
//!
//! Startup and shutdown run before the exception machinery exists, so every
//! fallible step reports through [`Status`] instead:
//! - `Ok(..)` - the step completed
//! - [`Status::Error`] - the step failed; carries a message and the name of
//!   the function that raised it
//! - [`Status::Exit`] - the process should terminate with the given code
//!   (help, version, usage errors) without any diagnostic decoration

use std::fmt;
use thiserror::Error;

/// The result type returned by every fallible bootstrap operation.
pub type StatusResult<T = ()> = Result<T, Status>;

/// Message used for allocation failures.
pub const NO_MEMORY_MESSAGE: &str = "memory allocation failed";

/// Message used when a computed path exceeds [`crate::osdefs::MAXPATHLEN`].
pub const PATH_TOO_LONG_MESSAGE: &str = "path configuration: path too long";

/// Message used when symbolic link resolution exceeds its bound.
pub const SYMLINK_LOOP_MESSAGE: &str = "maximum number of symbolic links reached";

// =============================================================================
// ErrorKind
// =============================================================================

/// Classification of a bootstrap error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Allocation failure.
    Memory,
    /// A computed path exceeded the maximum buffer length.
    PathTooLong,
    /// Text from the environment or command line could not be decoded.
    Decode,
    /// Bad command line usage or a malformed setting.
    Validation,
    /// Symbolic link resolution exceeded its bound.
    SymlinkLoop,
    /// Broken invariant inside the runtime itself.
    Internal,
}

impl ErrorKind {
    /// Short name of the error class.
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Memory => "MemoryError",
            Self::PathTooLong => "PathTooLong",
            Self::Decode => "DecodeError",
            Self::Validation => "ValidationError",
            Self::SymlinkLoop => "SymlinkLoop",
            Self::Internal => "InternalError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Status
// =============================================================================

/// A non-`Ok` bootstrap outcome.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// A bootstrap step failed.
    #[error("{origin}: {message}")]
    Error {
        /// Error class.
        kind: ErrorKind,
        /// Human-readable description.
        message: String,
        /// Name of the function that raised the error.
        origin: &'static str,
    },

    /// The process should exit with `code`.
    #[error("exit({code})")]
    Exit {
        /// Process exit code.
        code: i32,
    },
}

impl Status {
    /// Create an error status of the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind, origin: &'static str, message: impl Into<String>) -> Self {
        Self::Error {
            kind,
            message: message.into(),
            origin,
        }
    }

    /// Create an internal error.
    #[must_use]
    pub fn error(origin: &'static str, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, origin, message)
    }

    /// Create an allocation failure.
    #[must_use]
    pub fn no_memory(origin: &'static str) -> Self {
        Self::new(ErrorKind::Memory, origin, NO_MEMORY_MESSAGE)
    }

    /// Create a path-length overflow error.
    #[must_use]
    pub fn path_too_long(origin: &'static str) -> Self {
        Self::new(ErrorKind::PathTooLong, origin, PATH_TOO_LONG_MESSAGE)
    }

    /// Create a decoding error.
    #[must_use]
    pub fn decode(origin: &'static str, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Decode, origin, message)
    }

    /// Create a validation error.
    #[must_use]
    pub fn validation(origin: &'static str, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, origin, message)
    }

    /// Create a symbolic link loop error.
    #[must_use]
    pub fn symlink_loop(origin: &'static str) -> Self {
        Self::new(ErrorKind::SymlinkLoop, origin, SYMLINK_LOOP_MESSAGE)
    }

    /// Create an exit request.
    #[inline]
    #[must_use]
    pub const fn exit(code: i32) -> Self {
        Self::Exit { code }
    }

    /// Check if this is an error.
    #[inline]
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Check if this is an exit request.
    #[inline]
    #[must_use]
    pub const fn is_exit(&self) -> bool {
        matches!(self, Self::Exit { .. })
    }

    /// Exit code of an exit request.
    #[inline]
    #[must_use]
    pub const fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Exit { code } => Some(*code),
            Self::Error { .. } => None,
        }
    }

    /// Error class of an error status.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Error { kind, .. } => Some(*kind),
            Self::Exit { .. } => None,
        }
    }

    /// Message of an error status.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Error { message, .. } => Some(message),
            Self::Exit { .. } => None,
        }
    }

    /// Function that raised an error status.
    #[must_use]
    pub const fn origin(&self) -> Option<&'static str> {
        match self {
            Self::Error { origin, .. } => Some(*origin),
            Self::Exit { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_includes_origin() {
        let status = Status::error("init_core_types", "can't init longs");
        assert_eq!(status.to_string(), "init_core_types: can't init longs");
        assert_eq!(status.kind(), Some(ErrorKind::Internal));
    }

    #[test]
    fn test_exit_has_no_message() {
        let status = Status::exit(2);
        assert!(status.is_exit());
        assert!(!status.is_error());
        assert_eq!(status.exit_code(), Some(2));
        assert_eq!(status.message(), None);
        assert_eq!(status.origin(), None);
        assert_eq!(status.to_string(), "exit(2)");
    }

    #[test]
    fn test_canned_messages() {
        assert_eq!(
            Status::path_too_long("joinpath").message(),
            Some("path configuration: path too long")
        );
        assert_eq!(
            Status::symlink_loop("resolve_symlinks").kind(),
            Some(ErrorKind::SymlinkLoop)
        );
        assert_eq!(Status::no_memory("copy").kind(), Some(ErrorKind::Memory));
    }

    #[test]
    fn test_question_mark_propagates_unchanged() {
        fn inner() -> StatusResult<u32> {
            Err(Status::validation("parse", "bad"))
        }
        fn outer() -> StatusResult<u32> {
            let value = inner()?;
            Ok(value + 1)
        }
        assert_eq!(outer(), Err(Status::validation("parse", "bad")));
    }
}
