//! # Prism Config
//!
//! Everything the bootstrap reads before the runtime exists:
//!
//! - **PreConfig**: allocator and UTF-8 policy, read first
//! - **Config**: the settings snapshot built from defaults, environment and
//!   command line, where fields set by the embedder are never overwritten
//! - **Path calculation**: locating the standard library from the
//!   executable, `PYTHONHOME` and the compiled-in layout
//! - **PathConfig**: the runtime's cached path configuration
//!
//! The process environment and filesystem are reached through [`Host`], so
//! every algorithm here runs equally against the real process or a fixed
//! in-memory tree.

#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod argv;
pub mod build_info;
pub mod cmdline;
pub mod config;
pub mod env;
pub mod flags;
pub mod fs;
pub mod getopt;
pub mod hash_seed;
pub mod host;
pub mod pathconfig;
pub mod preconfig;
pub mod usage;

pub use argv::Argv;
pub use build_info::BuildConfig;
pub use cmdline::HashPycsMode;
pub use config::{Config, DEFAULT_PROGRAM_NAME, ReadContext, RunTarget};
pub use env::Environment;
pub use flags::GlobalFlags;
pub use fs::{FileSystem, MemoryFileSystem, OsFileSystem};
pub use hash_seed::{HashSeed, parse_hash_seed};
pub use host::Host;
pub use pathconfig::{
    Calculation, Found, PathCalculator, PathConfig, compute_sys_path0, dump_path_config,
    render_path_config,
};
pub use preconfig::{Allocator, InitKind, PreConfig};
