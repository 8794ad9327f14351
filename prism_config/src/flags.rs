//! Process-wide flag mirror.
//!
//! Older embedding code configures the runtime through global flags rather
//! than a [`Config`](crate::Config). The runtime keeps one [`GlobalFlags`]
//! value: compat configurations read unset fields from it, and every
//! configuration written into the runtime is mirrored back into it.

/// Global configuration flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct GlobalFlags {
    /// `-E`: ignore `PYTHON*` environment variables.
    pub ignore_environment: bool,
    /// `-I`: isolated mode.
    pub isolated: bool,
    /// `-i`: inspect after running the script.
    pub inspect: u32,
    /// `-i`: interactive mode.
    pub interactive: u32,
    /// `-q`: no banner on interactive startup.
    pub quiet: u32,
    /// `-v`: import tracing.
    pub verbose: u32,
    /// `-b`: bytes/str comparison warnings.
    pub bytes_warning: u32,
    /// `-d`: parser debug output.
    pub debug: u32,
    /// `-O`: optimization level.
    pub optimize: u32,
    /// `-B`: do not write bytecode.
    pub dont_write_bytecode: bool,
    /// `-s`: no user site directory.
    pub no_user_site_directory: bool,
    /// `-S`: no implicit `import site`.
    pub no_site: bool,
    /// Path calculation warnings are silenced.
    pub frozen: bool,
    /// `-u`: unbuffered standard streams.
    pub unbuffered_stdio: bool,
    /// String hashing uses a random or non-zero seed.
    pub hash_randomization: bool,
    /// UTF-8 mode.
    pub utf8_mode: bool,
}

impl GlobalFlags {
    /// Create the default flag state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}
