//! The process surroundings seen by the bootstrap.

use crate::build_info::BuildConfig;
use crate::env::Environment;
use crate::fs::{FileSystem, OsFileSystem};
use std::sync::Arc;

/// Environment, filesystem and build constants used while reading
/// configuration and calculating paths.
#[derive(Debug, Clone)]
pub struct Host {
    /// Environment variables.
    pub env: Environment,
    /// Filesystem queries.
    pub fs: Arc<dyn FileSystem>,
    /// Compiled-in installation constants.
    pub build: BuildConfig,
}

impl Host {
    /// Create a host from its parts.
    #[must_use]
    pub fn new(env: Environment, fs: Arc<dyn FileSystem>, build: BuildConfig) -> Self {
        Self { env, fs, build }
    }

    /// The running process: its environment, the OS filesystem and the
    /// compiled-in constants.
    #[must_use]
    pub fn process() -> Self {
        Self::new(
            Environment::process(),
            Arc::new(OsFileSystem),
            BuildConfig::compiled(),
        )
    }
}

impl Default for Host {
    fn default() -> Self {
        Self::process()
    }
}
