//! Module table and the modules created during startup.
//!
//! # Modules
//!
//! - `sys` - runtime configuration published to programs
//! - `builtins` - built-in names, bound during core initialization
//! - `__main__` - the namespace the run target executes in
//! - `warnings` - loaded eagerly when warning options were given

pub mod sys;

use prism_core::InternedString;
use rustc_hash::FxHashMap;
use std::any::Any;
use std::sync::Arc;
use thiserror::Error;

/// Result type for module attribute lookup.
pub type ModuleResult = Result<Value, ModuleError>;

/// Errors that can occur during module operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModuleError {
    /// Attribute not found in module.
    #[error("AttributeError: module '{module}' has no attribute '{name}'")]
    AttributeError {
        /// Module searched.
        module: String,
        /// Missing attribute.
        name: String,
    },
    /// Module not present in the table.
    #[error("ModuleNotFoundError: No module named '{0}'")]
    NotFound(String),
}

/// Attribute values published by bootstrap modules.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `None`.
    None,
    /// A boolean.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A string.
    Str(InternedString),
    /// A list.
    List(Vec<Value>),
    /// A struct sequence: named fields in order.
    StructSeq {
        /// Type name, e.g. `sys.flags`.
        type_name: &'static str,
        /// Fields.
        fields: Vec<(&'static str, Value)>,
    },
    /// Reference to a module in the table.
    Module(Arc<str>),
    /// A built-in function.
    Builtin(&'static str),
    /// A built-in type.
    Type(&'static str),
}

impl Value {
    /// The string content, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// The integer, if this is an integer.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// The elements, if this is a list.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Named field of a struct sequence.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Self::StructSeq { fields, .. } => {
                fields.iter().find(|(field, _)| *field == name).map(|(_, v)| v)
            }
            _ => None,
        }
    }

    /// Check if this is `None`.
    #[inline]
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// A module visible in the module table.
pub trait Module: Any + Send + Sync {
    /// Get the module name.
    fn name(&self) -> &str;

    /// Get an attribute from the module.
    fn get_attr(&self, name: &str) -> ModuleResult;

    /// List all attribute names.
    fn dir(&self) -> Vec<Arc<str>> {
        Vec::new()
    }

    /// Upcast for downcasting to the concrete module.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for downcasting to the concrete module.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

// =============================================================================
// Namespace Module
// =============================================================================

/// A module that is only a namespace of values.
#[derive(Debug, Clone)]
pub struct NamespaceModule {
    name: Arc<str>,
    attrs: FxHashMap<Arc<str>, Value>,
}

impl NamespaceModule {
    /// Create an empty module.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: Arc::from(name),
            attrs: FxHashMap::default(),
        }
    }

    /// Set an attribute.
    pub fn set_attr(&mut self, name: &str, value: Value) {
        self.attrs.insert(Arc::from(name), value);
    }

    /// Check if an attribute is set.
    #[inline]
    #[must_use]
    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }

    /// Number of attributes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    /// Check if the namespace is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }
}

impl Module for NamespaceModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_attr(&self, name: &str) -> ModuleResult {
        self.attrs
            .get(name)
            .cloned()
            .ok_or_else(|| ModuleError::AttributeError {
                module: self.name.to_string(),
                name: name.to_owned(),
            })
    }

    fn dir(&self) -> Vec<Arc<str>> {
        let mut names: Vec<Arc<str>> = self.attrs.keys().cloned().collect();
        names.sort();
        names
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// =============================================================================
// Module Table
// =============================================================================

/// Modules loaded by the interpreter, in load order.
#[derive(Default)]
pub struct ModuleTable {
    modules: FxHashMap<Arc<str>, Box<dyn Module>>,
    order: Vec<Arc<str>>,
}

impl ModuleTable {
    /// Names torn down after every other module.
    const TEARDOWN_LAST: [&'static str; 2] = ["builtins", "sys"];

    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a module under its own name.
    pub fn insert(&mut self, module: Box<dyn Module>) {
        let name: Arc<str> = Arc::from(module.name());
        if self.modules.insert(name.clone(), module).is_none() {
            self.order.push(name);
        }
    }

    /// Get a module by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn Module> {
        self.modules.get(name).map(AsRef::as_ref)
    }

    /// Get a module by name as its concrete type.
    #[must_use]
    pub fn get_as<T: Module>(&self, name: &str) -> Option<&T> {
        self.modules.get(name)?.as_any().downcast_ref()
    }

    /// Get a module by name as its concrete type, mutably.
    pub fn get_as_mut<T: Module>(&mut self, name: &str) -> Option<&mut T> {
        self.modules.get_mut(name)?.as_any_mut().downcast_mut()
    }

    /// Look up `module.attr`.
    pub fn get_attr(&self, module: &str, attr: &str) -> ModuleResult {
        self.get(module)
            .ok_or_else(|| ModuleError::NotFound(module.to_owned()))?
            .get_attr(attr)
    }

    /// Check if a module is loaded.
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    /// Names in load order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.order.iter().map(AsRef::as_ref).collect()
    }

    /// Number of loaded modules.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Check if no module is loaded.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Drop every module: most recently loaded first, then `builtins` and
    /// `sys`. Returns the names in teardown order.
    pub fn clear(&mut self) -> Vec<Arc<str>> {
        let mut torn_down = Vec::with_capacity(self.order.len());
        let mut order = std::mem::take(&mut self.order);
        order.reverse();
        let (last, rest): (Vec<_>, Vec<_>) = order
            .into_iter()
            .partition(|name| Self::TEARDOWN_LAST.contains(&name.as_ref()));

        for name in rest.into_iter().chain(
            Self::TEARDOWN_LAST
                .iter()
                .filter_map(|want| last.iter().find(|name| name.as_ref() == *want).cloned()),
        ) {
            self.modules.remove(&name);
            torn_down.push(name);
        }
        torn_down
    }
}

impl std::fmt::Debug for ModuleTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleTable")
            .field("modules", &self.order)
            .finish()
    }
}
