//! Path configuration cache.
//!
//! A runtime owns one [`PathConfig`]. Embedders may fill some of its fields
//! before startup (`set_path`, `set_home`, `set_program_name`,
//! `set_program_full_path`); every field they leave unset is computed by
//! [`PathCalculator`] the first time it is needed, either by a getter or by
//! [`Config::read`].
//!
//! Priority, highest first: the [`Config`], the values set on the cache, the
//! calculation.
//!
//! Values set through the embedding API are kept apart from the published
//! results. A runtime publishes its results at core initialization, which
//! locks the setters, and [`PathConfig::reset_computed`] drops them again at
//! finalization so the next start calculates afresh.

mod calculate;
mod dump;
pub mod join;
mod path0;

pub use calculate::{
    BUILD_LANDMARK, Calculation, Found, LANDMARK, LIB_DYNLOAD, MAX_SYMLINKS, PathCalculator,
};
pub use dump::{dump_path_config, render_path_config};
pub use path0::compute_sys_path0;

use crate::config::{Config, ReadContext};
use crate::flags::GlobalFlags;
use crate::host::Host;
use crate::preconfig::PreConfig;
use prism_core::osdefs::{DELIM, split_path_list};
use prism_core::{Status, StatusResult};
use tracing::debug;

/// Values set through the embedding API.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Overrides {
    program_full_path: Option<String>,
    prefix: Option<String>,
    exec_prefix: Option<String>,
    module_search_path: Option<String>,
    program_name: Option<String>,
    home: Option<String>,
}

/// Materialized path configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathConfig {
    pub(crate) program_full_path: Option<String>,
    pub(crate) prefix: Option<String>,
    pub(crate) exec_prefix: Option<String>,
    pub(crate) module_search_path: Option<String>,
    pub(crate) program_name: Option<String>,
    pub(crate) home: Option<String>,
    overrides: Overrides,
    observed: bool,
}

impl PathConfig {
    /// Create an empty path configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset every field, forgetting that it was ever read.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Drop everything but the values set through the embedding API.
    ///
    /// The setters become usable again.
    pub fn reset_computed(&mut self) {
        *self = self.overrides_only();
    }

    fn overrides_only(&self) -> Self {
        let overrides = self.overrides.clone();
        Self {
            program_full_path: overrides.program_full_path.clone(),
            prefix: overrides.prefix.clone(),
            exec_prefix: overrides.exec_prefix.clone(),
            module_search_path: overrides.module_search_path.clone(),
            program_name: overrides.program_name.clone(),
            home: overrides.home.clone(),
            overrides,
            observed: false,
        }
    }

    /// Check if the search path was set explicitly with `set_path`.
    #[inline]
    #[must_use]
    pub fn has_explicit_path(&self) -> bool {
        self.overrides.module_search_path.is_some()
    }

    /// Check if any getter has read the configuration.
    #[inline]
    #[must_use]
    pub fn is_observed(&self) -> bool {
        self.observed
    }

    /// Check if every computed field is present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.module_search_path.is_some()
            && self.program_full_path.is_some()
            && self.prefix.is_some()
            && self.exec_prefix.is_some()
            && self.program_name.is_some()
    }

    // =========================================================================
    // Overrides
    // =========================================================================

    fn check_writable(&self, origin: &'static str) -> StatusResult {
        if self.observed {
            return Err(Status::validation(
                origin,
                "path configuration was already read; set it before first use",
            ));
        }
        Ok(())
    }

    /// Set the full module search path, skipping the calculation.
    ///
    /// `prefix` and `exec_prefix` become empty and the executable path is
    /// computed as usual. `None` clears the whole configuration.
    pub fn set_path(&mut self, host: &Host, path: Option<&str>) -> StatusResult {
        let Some(path) = path else {
            self.clear();
            return Ok(());
        };
        self.check_writable("set_path")?;

        self.compute(host)?;
        self.prefix = Some(String::new());
        self.exec_prefix = Some(String::new());
        self.module_search_path = Some(path.to_owned());

        self.overrides.program_full_path.clone_from(&self.program_full_path);
        self.overrides.prefix = Some(String::new());
        self.overrides.exec_prefix = Some(String::new());
        self.overrides.module_search_path = Some(path.to_owned());
        Ok(())
    }

    /// Set the home directory, `prefix[DELIM exec_prefix]`. `None` is ignored.
    pub fn set_home(&mut self, home: Option<&str>) -> StatusResult {
        let Some(home) = home else {
            return Ok(());
        };
        self.check_writable("set_home")?;
        self.home = Some(home.to_owned());
        self.overrides.home = Some(home.to_owned());
        Ok(())
    }

    /// Set the program name. An empty name is ignored.
    pub fn set_program_name(&mut self, program_name: &str) -> StatusResult {
        if program_name.is_empty() {
            return Ok(());
        }
        self.check_writable("set_program_name")?;
        self.program_name = Some(program_name.to_owned());
        self.overrides.program_name = Some(program_name.to_owned());
        Ok(())
    }

    /// Set the executable path. An empty path is ignored.
    pub fn set_program_full_path(&mut self, program_full_path: &str) -> StatusResult {
        if program_full_path.is_empty() {
            return Ok(());
        }
        self.check_writable("set_program_full_path")?;
        self.program_full_path = Some(program_full_path.to_owned());
        self.overrides.program_full_path = Some(program_full_path.to_owned());
        Ok(())
    }

    /// Program name set through the embedding API, without computing.
    #[must_use]
    pub fn program_name_override(&self) -> Option<&str> {
        self.overrides.program_name.as_deref()
    }

    /// Home set through the embedding API, without computing.
    #[must_use]
    pub fn home_override(&self) -> Option<&str> {
        self.overrides.home.as_deref()
    }

    /// Executable path set through the embedding API, without computing.
    #[must_use]
    pub fn program_full_path_override(&self) -> Option<&str> {
        self.overrides.program_full_path.as_deref()
    }

    // =========================================================================
    // Lazy Getters
    // =========================================================================

    /// Fill the configuration from a compat [`Config`] unless the search path
    /// is already known.
    fn compute(&mut self, host: &Host) -> StatusResult {
        if self.module_search_path.is_some() {
            return Ok(());
        }
        debug!("computing path configuration on first use");

        let preconfig = PreConfig::compat();
        let flags = GlobalFlags::default();
        let snapshot = self.clone();
        let mut config = Config::compat();
        config.read(ReadContext {
            host,
            preconfig: &preconfig,
            flags: &flags,
            path_config: &snapshot,
        })?;
        self.write_from_config(&config);
        Ok(())
    }

    fn observe(&mut self, host: &Host) -> StatusResult<&Self> {
        self.compute(host)?;
        self.observed = true;
        Ok(self)
    }

    /// The module search path, `DELIM`-joined.
    pub fn module_search_path(&mut self, host: &Host) -> StatusResult<&str> {
        Ok(self.observe(host)?.module_search_path.as_deref().unwrap_or_default())
    }

    /// `sys.prefix`.
    pub fn prefix(&mut self, host: &Host) -> StatusResult<&str> {
        Ok(self.observe(host)?.prefix.as_deref().unwrap_or_default())
    }

    /// `sys.exec_prefix`.
    pub fn exec_prefix(&mut self, host: &Host) -> StatusResult<&str> {
        Ok(self.observe(host)?.exec_prefix.as_deref().unwrap_or_default())
    }

    /// Absolute path of the executable, or empty if unknown.
    pub fn program_full_path(&mut self, host: &Host) -> StatusResult<&str> {
        Ok(self.observe(host)?.program_full_path.as_deref().unwrap_or_default())
    }

    /// Home directory, if any.
    pub fn home(&mut self, host: &Host) -> StatusResult<Option<&str>> {
        Ok(self.observe(host)?.home.as_deref())
    }

    /// Program name.
    pub fn program_name(&mut self, host: &Host) -> StatusResult<&str> {
        Ok(self.observe(host)?.program_name.as_deref().unwrap_or_default())
    }

    /// Copy the path fields that are set in `config`.
    pub fn write_from_config(&mut self, config: &Config) {
        if config.module_search_paths_set {
            self.module_search_path = Some(config.module_search_paths.join(&DELIM.to_string()));
        }
        let copy = |field: &mut Option<String>, value: &Option<String>| {
            if let Some(value) = value {
                *field = Some(value.clone());
            }
        };
        copy(&mut self.program_full_path, &config.executable);
        copy(&mut self.prefix, &config.prefix);
        copy(&mut self.exec_prefix, &config.exec_prefix);
        copy(&mut self.program_name, &config.program_name);
        copy(&mut self.home, &config.home);
    }

    /// Publish the path fields of a runtime's final `config`.
    ///
    /// The configuration counts as read afterwards, so the setters fail
    /// until [`reset_computed`](Self::reset_computed) or [`clear`](Self::clear).
    pub fn publish_from_config(&mut self, config: &Config) {
        self.write_from_config(config);
        self.observed = true;
    }
}

/// Complete the path fields of `config`.
///
/// Runs the calculation when the search path, executable, prefix or
/// exec_prefix is missing, then defaults the `base_*` fields.
pub(crate) fn init_path_config(config: &mut Config, ctx: ReadContext<'_>) -> StatusResult {
    if !config.module_search_paths_set
        || config.executable.is_none()
        || config.prefix.is_none()
        || config.exec_prefix.is_none()
    {
        calculate_into_config(config, ctx)?;
    }

    if config.base_prefix.is_none() {
        config.base_prefix.clone_from(&config.prefix);
    }
    if config.base_exec_prefix.is_none() {
        config.base_exec_prefix.clone_from(&config.exec_prefix);
    }
    if config.base_executable.is_none() {
        config.base_executable.clone_from(&config.executable);
    }
    Ok(())
}

fn calculate_into_config(config: &mut Config, ctx: ReadContext<'_>) -> StatusResult {
    let mut path_config = ctx.path_config.overrides_only();
    path_config.write_from_config(config);

    if !ctx.path_config.has_explicit_path() {
        let calculator = PathCalculator::new(ctx.host, config)?;
        calculator.calculate(&path_config)?.publish(&mut path_config);
    } else {
        debug!("search path set explicitly, skipping calculation");
    }

    if !config.module_search_paths_set {
        let search_path = path_config.module_search_path.as_deref().unwrap_or_default();
        config.module_search_paths = split_path_list(search_path).map(str::to_owned).collect();
        config.module_search_paths_set = true;
    }

    let fill = |field: &mut Option<String>, value: Option<String>| {
        if field.is_none() {
            *field = value;
        }
    };
    fill(&mut config.executable, path_config.program_full_path);
    fill(&mut config.prefix, path_config.prefix);
    fill(&mut config.exec_prefix, path_config.exec_prefix);
    Ok(())
}
