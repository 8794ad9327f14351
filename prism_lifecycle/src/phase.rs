//! Runtime phases.

use std::fmt;

/// Bootstrap phase of a [`Runtime`](crate::Runtime).
///
/// Phases only move forward, except that finalization returns the runtime
/// to [`Phase::Unstarted`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Phase {
    /// Nothing has run yet.
    #[default]
    Unstarted,
    /// Pre-initialization is reading its settings.
    Preinitializing,
    /// Allocator and text encoding policy are fixed.
    Preinitialized,
    /// Core types, `sys` and `builtins` exist; no standard streams yet.
    CoreInitialized,
    /// Fully initialized.
    Initialized,
    /// Teardown is in progress.
    Finalizing,
}

impl Phase {
    /// Check if pre-initialization completed and teardown has not started.
    #[inline]
    #[must_use]
    pub const fn is_preinitialized(self) -> bool {
        matches!(
            self,
            Self::Preinitialized | Self::CoreInitialized | Self::Initialized
        )
    }

    /// Check if core initialization completed and teardown has not started.
    #[inline]
    #[must_use]
    pub const fn is_core_initialized(self) -> bool {
        matches!(self, Self::CoreInitialized | Self::Initialized)
    }

    /// Name used in fatal error reports.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Unstarted => "unknown",
            Self::Preinitializing => "preinitializing",
            Self::Preinitialized => "preinitialized",
            Self::CoreInitialized => "core initialized",
            Self::Initialized => "initialized",
            Self::Finalizing => "finalizing",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}
