//! # Prism Lifecycle
//!
//! Brings a Prism runtime up and takes it back down:
//!
//! - **Phases**: pre-initialization, core and main initialization, teardown
//! - **Core types**: ordered initialization and reverse teardown of the
//!   foundational type families
//! - **Modules**: `sys`, `builtins`, `__main__` and the module table
//! - **Streams**: standard stream probing with per-stream fallback
//! - **Exit**: exit callbacks, background workers, fatal error reports
//! - **Main**: the command-line driver that ties it together

#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod builtins;
pub mod exit;
pub mod fatal;
pub mod interp;
pub mod modules;
pub mod phase;
pub mod pymain;
pub mod runtime;
pub mod streams;
pub mod types;

pub use exit::{ExitCallback, ExitCallbacks, MAX_EXIT_CALLBACKS, Workers};
pub use fatal::{exit_status_exception, format_fatal_error};
pub use interp::{Interpreter, ThreadState};
pub use modules::sys::SysModule;
pub use modules::{Module, ModuleError, ModuleTable, NamespaceModule, Value};
pub use phase::Phase;
pub use pymain::{FINALIZE_FAILED_EXIT, Runner, run_initialized, run_main, run_main_with};
pub use runtime::Runtime;
pub use streams::{Buffering, MemoryStdio, OsStdio, StandardStreams, StdStream, StdioBackend};
pub use types::{CoreType, CoreTypeHooks, NoTypeHooks, TypeRegistry};
