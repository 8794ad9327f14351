//! Foundational type initialization.
//!
//! The object model lives outside the bootstrap; it is driven through
//! [`CoreTypeHooks`] one [`CoreType`] at a time. Each step may allocate
//! instances of the types initialized before it, so the order in
//! [`CoreType::INIT_ORDER`] is load-bearing and teardown runs it backwards.

use prism_core::{Status, StatusResult};
use smallvec::SmallVec;
use std::fmt;
use tracing::debug;

/// A foundational type family initialized during core startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoreType {
    /// `object` and `type`.
    Object,
    /// Integers.
    Long,
    /// Strings.
    Unicode,
    /// The exception hierarchy.
    Exceptions,
    /// Floats.
    Float,
    /// Struct sequences (`sys.flags`, `sys.version_info`).
    StructSequence,
}

impl CoreType {
    /// Initialization order.
    pub const INIT_ORDER: [Self; 6] = [
        Self::Object,
        Self::Long,
        Self::Unicode,
        Self::Exceptions,
        Self::Float,
        Self::StructSequence,
    ];

    /// Short name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Long => "int",
            Self::Unicode => "str",
            Self::Exceptions => "exceptions",
            Self::Float => "float",
            Self::StructSequence => "structseq",
        }
    }

    fn init_error(self) -> &'static str {
        match self {
            Self::Object => "can't init object types",
            Self::Long => "can't init longs",
            Self::Unicode => "can't init unicode",
            Self::Exceptions => "can't init exceptions",
            Self::Float => "can't init float",
            Self::StructSequence => "can't initialize structseq",
        }
    }
}

impl fmt::Display for CoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Object model entry points called during startup and teardown.
pub trait CoreTypeHooks: Send {
    /// Initialize one type family. Returning `false` aborts startup.
    fn init(&mut self, ty: CoreType) -> bool {
        let _ = ty;
        true
    }

    /// Release one type family.
    fn fini(&mut self, ty: CoreType) {
        let _ = ty;
    }
}

/// Hooks for a runtime without an external object model.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTypeHooks;

impl CoreTypeHooks for NoTypeHooks {}

/// Tracks which type families are live.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    initialized: SmallVec<[CoreType; 6]>,
}

impl TypeRegistry {
    /// Create a registry with nothing initialized.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Types initialized so far, in order.
    #[inline]
    #[must_use]
    pub fn initialized(&self) -> &[CoreType] {
        &self.initialized
    }

    /// Check if `ty` is live.
    #[inline]
    #[must_use]
    pub fn is_initialized(&self, ty: CoreType) -> bool {
        self.initialized.contains(&ty)
    }

    /// Initialize every family in [`CoreType::INIT_ORDER`].
    ///
    /// Stops at the first failure; the families initialized before it stay
    /// live.
    pub fn init_all(&mut self, hooks: &mut dyn CoreTypeHooks) -> StatusResult {
        for ty in CoreType::INIT_ORDER {
            if self.is_initialized(ty) {
                continue;
            }
            if !hooks.init(ty) {
                return Err(Status::error("init_types", ty.init_error()));
            }
            debug!(ty = %ty, "core type initialized");
            self.initialized.push(ty);
        }
        Ok(())
    }

    /// Release every live family, last initialized first.
    pub fn fini_all(&mut self, hooks: &mut dyn CoreTypeHooks) {
        while let Some(ty) = self.initialized.pop() {
            hooks.fini(ty);
            debug!(ty = %ty, "core type released");
        }
    }
}
