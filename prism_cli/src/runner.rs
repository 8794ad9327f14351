//! Bootstrap report runner.
//!
//! Code evaluation lives outside the launcher, so the runner plugged into
//! the driver reports what the bootstrap produced instead: the selected
//! target, `sys.argv`, `sys.path` and the installation prefixes.

use prism_config::render_path_config;
use prism_lifecycle::{Runner, Runtime};
use std::fs::File;
use std::io::{self, Read, Write};

// =============================================================================
// Report Runner
// =============================================================================

/// Writes a bootstrap report for each run target to `out`.
#[derive(Debug)]
pub struct ReportRunner<W: Write> {
    out: W,
}

impl<W: Write> ReportRunner<W> {
    /// Report to `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Recover the writer.
    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn report(&mut self, runtime: &Runtime, target: &str) -> i32 {
        match self.write_report(runtime, target) {
            Ok(()) => 0,
            Err(err) => {
                tracing::warn!(error = %err, "failed to write bootstrap report");
                1
            }
        }
    }

    fn write_report(&mut self, runtime: &Runtime, target: &str) -> io::Result<()> {
        writeln!(self.out, "target: {target}")?;

        let Some(interp) = runtime.interpreter() else {
            writeln!(self.out, "interpreter: (not initialized)")?;
            return self.out.flush();
        };

        if let Some(sys) = interp.sys() {
            writeln!(self.out, "sys.argv: {:?}", sys.argv().iter().collect::<Vec<_>>())?;
            writeln!(self.out, "sys.path:")?;
            for entry in sys.path().iter() {
                writeln!(self.out, "  {entry:?}")?;
            }
        }

        let config = interp.config();
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        writeln!(self.out, "executable: {}", text(&config.executable))?;
        writeln!(self.out, "prefix: {}", text(&config.prefix))?;
        writeln!(self.out, "exec_prefix: {}", text(&config.exec_prefix))?;

        if config.verbose > 0 {
            self.out.write_all(render_path_config(config).as_bytes())?;
        }
        self.out.flush()
    }
}

impl<W: Write> Runner for ReportRunner<W> {
    fn run_command(&mut self, runtime: &mut Runtime, command: &str) -> i32 {
        self.report(runtime, &format!("command {:?}", command.trim_end()))
    }

    fn run_module(&mut self, runtime: &mut Runtime, module: &str, set_argv0: bool) -> i32 {
        let target = if set_argv0 {
            format!("module {module}")
        } else {
            format!("package main {module}")
        };
        self.report(runtime, &target)
    }

    fn run_file(&mut self, runtime: &mut Runtime, path: &str, mut file: File) -> i32 {
        let mut source = Vec::new();
        if let Err(err) = file.read_to_end(&mut source) {
            let _ = writeln!(self.out, "{path}: read failed: {err}");
            return 1;
        }
        self.report(runtime, &format!("file {path} ({} bytes)", source.len()))
    }

    fn run_stdin(&mut self, runtime: &mut Runtime) -> i32 {
        self.report(runtime, "stdin")
    }
}

// =============================================================================
// Tests
// =============================================================================
