//! # Prism Core
//!
//! Primitives shared by every Prism bootstrap component:
//!
//! - **Status**: the Ok/Error/Exit result type used before exceptions exist
//! - **Path primitives**: platform separators and absolute-path tests
//! - **Interning**: runtime-owned string interning for O(1) equality checks
//! - **Versions**: the runtime and language versions the build targets

#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod intern;
pub mod osdefs;
pub mod status;

pub use intern::{InternedString, StringInterner};
pub use status::{ErrorKind, Status, StatusResult};

/// Prism runtime version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Python language version this runtime targets.
pub const PYTHON_VERSION: (u8, u8, u8) = (3, 12, 0);

/// `major.minor` form of [`PYTHON_VERSION`], e.g. `3.12`.
#[must_use]
pub fn python_version_short() -> String {
    format!("{}.{}", PYTHON_VERSION.0, PYTHON_VERSION.1)
}

/// `major.minor.micro` form of [`PYTHON_VERSION`], e.g. `3.12.0`.
#[must_use]
pub fn python_version_full() -> String {
    format!(
        "{}.{}.{}",
        PYTHON_VERSION.0, PYTHON_VERSION.1, PYTHON_VERSION.2
    )
}
