//! Interpreter and thread state.

use crate::builtins::OpenHook;
use crate::modules::ModuleTable;
use crate::modules::sys::SysModule;
use crate::streams::StandardStreams;
use prism_config::Config;
use std::thread::{self, ThreadId};

/// The thread that created the interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadState {
    id: ThreadId,
}

impl ThreadState {
    /// State for the calling thread.
    #[must_use]
    pub fn current() -> Self {
        Self {
            id: thread::current().id(),
        }
    }

    /// Thread identifier.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> ThreadId {
        self.id
    }
}

/// The main interpreter: its configuration and everything it loaded.
#[derive(Debug)]
pub struct Interpreter {
    pub(crate) config: Config,
    pub(crate) thread: ThreadState,
    pub(crate) modules: ModuleTable,
    pub(crate) streams: StandardStreams,
    pub(crate) open_hook: Option<OpenHook>,
}

impl Interpreter {
    pub(crate) fn new(config: Config) -> Self {
        Self {
            config,
            thread: ThreadState::current(),
            modules: ModuleTable::new(),
            streams: StandardStreams::default(),
            open_hook: None,
        }
    }

    /// Configuration the interpreter runs with.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Thread that created the interpreter.
    #[inline]
    #[must_use]
    pub fn thread(&self) -> ThreadState {
        self.thread
    }

    /// Loaded modules.
    #[inline]
    #[must_use]
    pub fn modules(&self) -> &ModuleTable {
        &self.modules
    }

    /// Loaded modules, mutably.
    #[inline]
    pub fn modules_mut(&mut self) -> &mut ModuleTable {
        &mut self.modules
    }

    /// `sys`, once core initialization created it.
    #[must_use]
    pub fn sys(&self) -> Option<&SysModule> {
        self.modules.get_as("sys")
    }

    /// `sys`, mutably.
    pub fn sys_mut(&mut self) -> Option<&mut SysModule> {
        self.modules.get_as_mut("sys")
    }

    /// Standard streams bound by main initialization.
    #[inline]
    #[must_use]
    pub fn streams(&self) -> &StandardStreams {
        &self.streams
    }

    /// Hook behind `builtins.open`, once installed.
    #[inline]
    #[must_use]
    pub fn open_hook(&self) -> Option<OpenHook> {
        self.open_hook
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::NamespaceModule;
    use prism_core::StringInterner;
    use std::sync::Arc;

    #[test]
    fn test_new_interpreter_is_empty() {
        let interp = Interpreter::new(Config::python());
        assert_eq!(interp.thread().id(), thread::current().id());
        assert!(interp.modules().is_empty());
        assert!(interp.sys().is_none());
        assert!(interp.streams().stdin.is_none());
        assert!(interp.open_hook().is_none());
    }

    #[test]
    fn test_sys_lookup_is_typed() {
        let mut interp = Interpreter::new(Config::python());
        interp
            .modules_mut()
            .insert(Box::new(SysModule::scaffold(Arc::new(StringInterner::new()))));
        interp.modules_mut().insert(Box::new(NamespaceModule::new("builtins")));
        assert!(interp.sys().is_some());
        assert!(interp.sys_mut().is_some());
        assert_eq!(interp.config().init, Config::python().init);
    }
}
