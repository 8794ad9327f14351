//! Fatal error reporting.
//!
//! Bootstrap failures happen before exceptions exist, so they are reported
//! as plain text on stderr: a header naming the failing step, the runtime
//! state, and a native backtrace when one can be captured.

use crate::phase::Phase;
use prism_core::Status;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::ThreadId;

static REPORTING: AtomicBool = AtomicBool::new(false);

/// Describe the runtime for the `Python runtime state:` line.
#[must_use]
pub fn runtime_state(phase: Phase, finalizing: Option<ThreadId>) -> String {
    match finalizing {
        Some(thread) => format!("finalizing (thread={thread:?})"),
        None => phase.describe().to_owned(),
    }
}

/// Render the header and state lines of a fatal error report.
#[must_use]
pub fn format_fatal_error(origin: Option<&str>, message: Option<&str>, state: &str) -> String {
    let mut out = String::from("Fatal Python error: ");
    if let Some(origin) = origin {
        out.push_str(origin);
        out.push_str(": ");
    }
    out.push_str(message.unwrap_or("<message not set>"));
    out.push('\n');
    out.push_str("Python runtime state: ");
    out.push_str(state);
    out.push('\n');
    out
}

fn write_report(origin: Option<&str>, message: Option<&str>, state: &str) {
    let mut stderr = std::io::stderr().lock();
    let _ = stderr.write_all(format_fatal_error(origin, message, state).as_bytes());

    let backtrace = Backtrace::capture();
    if backtrace.status() == BacktraceStatus::Captured {
        let _ = writeln!(stderr, "\nNative backtrace (most recent call first):\n{backtrace}");
    }
    let _ = stderr.flush();
    let _ = std::io::stdout().flush();
}

/// Report an unrecoverable error and abort the process.
///
/// A fatal error raised while one is already being reported aborts
/// without printing.
pub fn fatal_error(origin: Option<&str>, message: &str, state: &str) -> ! {
    if !REPORTING.swap(true, Ordering::AcqRel) {
        write_report(origin, Some(message), state);
    }
    std::process::abort()
}

/// Turn a failed startup status into a process exit code.
///
/// Exit statuses yield their code silently. Errors print the fatal error
/// report to stderr and yield 1.
#[must_use]
pub fn exit_status_exception(status: &Status, state: &str) -> i32 {
    match status {
        Status::Exit { code } => *code,
        Status::Error { .. } => {
            tracing::error!(status = %status, "startup failed");
            write_report(status.origin(), status.message(), state);
            1
        }
    }
}
