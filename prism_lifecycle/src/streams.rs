//! Standard streams.
//!
//! Descriptors are checked through a [`StdioBackend`] so that a runtime
//! embedded in a process without a console (or a test) can start with some
//! streams missing. A descriptor that fails the check leaves the
//! stream unavailable; only a directory on stdin stops startup.

use crate::modules::Value;
use parking_lot::Mutex;
use prism_config::Config;
use prism_core::{Status, StatusResult, StringInterner};
use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt;
use std::io::{self, Write};
use tracing::{debug, warn};

/// Standard input descriptor.
pub const STDIN_FILENO: i32 = 0;
/// Standard output descriptor.
pub const STDOUT_FILENO: i32 = 1;
/// Standard error descriptor.
pub const STDERR_FILENO: i32 = 2;

/// Access to the process's standard descriptors.
pub trait StdioBackend: fmt::Debug + Send + Sync {
    /// Check that `fd` refers to an open file.
    fn is_valid(&self, fd: i32) -> bool;

    /// Check that `fd` refers to a directory.
    fn is_dir(&self, fd: i32) -> bool;

    /// Check that `fd` is attached to a terminal.
    fn is_tty(&self, fd: i32) -> bool;

    /// Write `data` to `fd`.
    fn write(&self, fd: i32, data: &[u8]) -> io::Result<()>;

    /// Flush buffered output on `fd`.
    fn flush(&self, fd: i32) -> io::Result<()>;
}

// =============================================================================
// OS Backend
// =============================================================================

/// The real standard descriptors.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsStdio;

impl OsStdio {
    #[cfg(unix)]
    fn metadata(fd: i32) -> Option<std::fs::Metadata> {
        std::fs::metadata(format!("/dev/fd/{fd}")).ok()
    }

    #[cfg(not(unix))]
    fn metadata(_fd: i32) -> Option<std::fs::Metadata> {
        None
    }
}

impl StdioBackend for OsStdio {
    #[cfg(unix)]
    fn is_valid(&self, fd: i32) -> bool {
        Self::metadata(fd).is_some()
    }

    #[cfg(not(unix))]
    fn is_valid(&self, fd: i32) -> bool {
        (STDIN_FILENO..=STDERR_FILENO).contains(&fd)
    }

    fn is_dir(&self, fd: i32) -> bool {
        Self::metadata(fd).is_some_and(|meta| meta.is_dir())
    }

    fn is_tty(&self, fd: i32) -> bool {
        use std::io::IsTerminal;
        match fd {
            STDIN_FILENO => io::stdin().is_terminal(),
            STDOUT_FILENO => io::stdout().is_terminal(),
            STDERR_FILENO => io::stderr().is_terminal(),
            _ => false,
        }
    }

    fn write(&self, fd: i32, data: &[u8]) -> io::Result<()> {
        match fd {
            STDOUT_FILENO => io::stdout().write_all(data),
            STDERR_FILENO => io::stderr().write_all(data),
            _ => Err(io::Error::from(io::ErrorKind::Unsupported)),
        }
    }

    fn flush(&self, fd: i32) -> io::Result<()> {
        match fd {
            STDOUT_FILENO => io::stdout().flush(),
            STDERR_FILENO => io::stderr().flush(),
            _ => Ok(()),
        }
    }
}

// =============================================================================
// Memory Backend
// =============================================================================

#[derive(Debug, Default)]
struct MemoryStdioState {
    closed: FxHashSet<i32>,
    directories: FxHashSet<i32>,
    terminals: FxHashSet<i32>,
    failing_flush: FxHashSet<i32>,
    output: FxHashMap<i32, Vec<u8>>,
}

/// In-memory descriptors with configurable check results.
#[derive(Debug, Default)]
pub struct MemoryStdio {
    state: Mutex<MemoryStdioState>,
}

impl MemoryStdio {
    /// All three descriptors open, none a terminal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `fd` invalid.
    #[must_use]
    pub fn with_closed(self, fd: i32) -> Self {
        self.state.lock().closed.insert(fd);
        self
    }

    /// Make `fd` a directory.
    #[must_use]
    pub fn with_directory(self, fd: i32) -> Self {
        self.state.lock().directories.insert(fd);
        self
    }

    /// Make `fd` a terminal.
    #[must_use]
    pub fn with_terminal(self, fd: i32) -> Self {
        self.state.lock().terminals.insert(fd);
        self
    }

    /// Make flushing `fd` fail.
    #[must_use]
    pub fn with_failing_flush(self, fd: i32) -> Self {
        self.state.lock().failing_flush.insert(fd);
        self
    }

    /// Everything written to `fd` so far.
    #[must_use]
    pub fn output(&self, fd: i32) -> String {
        self.state
            .lock()
            .output
            .get(&fd)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
            .unwrap_or_default()
    }
}

impl StdioBackend for MemoryStdio {
    fn is_valid(&self, fd: i32) -> bool {
        (STDIN_FILENO..=STDERR_FILENO).contains(&fd) && !self.state.lock().closed.contains(&fd)
    }

    fn is_dir(&self, fd: i32) -> bool {
        self.state.lock().directories.contains(&fd)
    }

    fn is_tty(&self, fd: i32) -> bool {
        self.state.lock().terminals.contains(&fd)
    }

    fn write(&self, fd: i32, data: &[u8]) -> io::Result<()> {
        let mut state = self.state.lock();
        if state.closed.contains(&fd) {
            return Err(io::Error::from(io::ErrorKind::BrokenPipe));
        }
        state.output.entry(fd).or_default().extend_from_slice(data);
        Ok(())
    }

    fn flush(&self, fd: i32) -> io::Result<()> {
        if self.state.lock().failing_flush.contains(&fd) {
            return Err(io::Error::other("flush failed"));
        }
        Ok(())
    }
}

// =============================================================================
// Streams
// =============================================================================

/// Buffering policy of a standard stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Buffering {
    /// Writes go straight to the descriptor.
    Unbuffered,
    /// Flushed at each newline.
    Line,
    /// Flushed when the buffer fills.
    Full,
}

/// A standard stream bound to a descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StdStream {
    /// Display name, e.g. `<stdin>`.
    pub name: &'static str,
    /// Descriptor number.
    pub fd: i32,
    /// Opened for writing.
    pub write_mode: bool,
    /// Buffering policy.
    pub buffering: Buffering,
    /// Text encoding.
    pub encoding: &'static str,
    /// Encoding error handler.
    pub errors: &'static str,
    /// Attached to a terminal.
    pub isatty: bool,
}

impl StdStream {
    fn open(
        backend: &dyn StdioBackend,
        config: &Config,
        fd: i32,
        write_mode: bool,
        name: &'static str,
    ) -> Option<Self> {
        if !backend.is_valid(fd) {
            debug!(fd, name, "standard stream unavailable");
            return None;
        }

        let isatty = backend.is_tty(fd);
        let buffered = config.buffered_stdio != Some(false);
        let buffering = if !buffered && write_mode {
            Buffering::Unbuffered
        } else if isatty || fd == STDERR_FILENO {
            Buffering::Line
        } else {
            Buffering::Full
        };

        Some(Self {
            name,
            fd,
            write_mode,
            buffering,
            encoding: "utf-8",
            errors: if fd == STDERR_FILENO { "backslashreplace" } else { "strict" },
            isatty,
        })
    }

    /// Value bound in `sys`.
    #[must_use]
    pub fn to_value(&self, interner: &StringInterner) -> Value {
        let mode = if self.write_mode { "w" } else { "r" };
        Value::StructSeq {
            type_name: "io.TextIOWrapper",
            fields: vec![
                ("name", Value::Str(interner.intern(self.name))),
                ("mode", Value::Str(interner.intern(mode))),
                ("fileno", Value::Int(i64::from(self.fd))),
                ("encoding", Value::Str(interner.intern(self.encoding))),
                ("errors", Value::Str(interner.intern(self.errors))),
                ("line_buffering", Value::Bool(self.buffering == Buffering::Line)),
            ],
        }
    }
}

/// The three standard streams; each may be unavailable.
#[derive(Debug, Default)]
pub struct StandardStreams {
    /// `sys.stdin`.
    pub stdin: Option<StdStream>,
    /// `sys.stdout`.
    pub stdout: Option<StdStream>,
    /// `sys.stderr`.
    pub stderr: Option<StdStream>,
    closed: bool,
}

impl StandardStreams {
    /// Check the descriptors and bind whichever are valid.
    pub fn open(backend: &dyn StdioBackend, config: &Config) -> StatusResult<Self> {
        if backend.is_dir(STDIN_FILENO) {
            return Err(Status::error(
                "init_sys_streams",
                "<stdin> is a directory, cannot continue",
            ));
        }

        Ok(Self {
            stdin: StdStream::open(backend, config, STDIN_FILENO, false, "<stdin>"),
            stdout: StdStream::open(backend, config, STDOUT_FILENO, true, "<stdout>"),
            stderr: StdStream::open(backend, config, STDERR_FILENO, true, "<stderr>"),
            closed: false,
        })
    }

    /// Iterate over `(sys attribute, stream)`.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Option<&StdStream>)> {
        [
            ("stdin", self.stdin.as_ref()),
            ("stdout", self.stdout.as_ref()),
            ("stderr", self.stderr.as_ref()),
        ]
        .into_iter()
    }

    /// Flush stdout then stderr.
    ///
    /// Both are attempted; the first failure is returned.
    pub fn flush(&self, backend: &dyn StdioBackend) -> io::Result<()> {
        if self.closed {
            return Ok(());
        }
        let mut result = Ok(());
        for stream in [&self.stdout, &self.stderr].into_iter().flatten() {
            if let Err(err) = backend.flush(stream.fd) {
                warn!(stream = stream.name, error = %err, "flush failed");
                if result.is_ok() {
                    result = Err(err);
                }
            }
        }
        result
    }

    /// Detach every stream.
    pub fn close(&mut self) {
        self.stdin = None;
        self.stdout = None;
        self.stderr = None;
        self.closed = true;
    }

    /// Check if [`close`](Self::close) ran.
    #[inline]
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }
}
