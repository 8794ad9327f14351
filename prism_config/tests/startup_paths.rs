//! Configuration reads against fixed in-memory installations.

#![cfg(not(windows))]

use prism_config::{
    BuildConfig, Config, Environment, GlobalFlags, Host, MemoryFileSystem, PathConfig, PreConfig,
    ReadContext, RunTarget, compute_sys_path0, render_path_config,
};
use prism_core::osdefs::split_path_list;
use prism_core::{ErrorKind, StatusResult};
use std::sync::Arc;

fn build() -> BuildConfig {
    BuildConfig {
        prefix: "/usr/local".to_owned(),
        exec_prefix: "/usr/local".to_owned(),
        python_path: String::new(),
        vpath: String::new(),
        platlibdir: "lib".to_owned(),
        version: "3.12".to_owned(),
    }
}

fn installed() -> MemoryFileSystem {
    MemoryFileSystem::new()
        .with_executable("/usr/local/bin/python3")
        .with_file("/usr/local/lib/python3.12/os.py")
        .with_dir("/usr/local/lib/python3.12/lib-dynload")
        .with_file("/home/user/app.py")
        .with_current_dir(Some("/home/user"))
}

fn host(fs: MemoryFileSystem, env: &[(&str, &str)]) -> Host {
    Host::new(Environment::from_pairs(env.iter().copied()), Arc::new(fs), build())
}

fn read_with(host: &Host, path_config: &PathConfig, args: &[&str]) -> StatusResult<Config> {
    let preconfig = PreConfig::python();
    let flags = GlobalFlags::default();
    let mut config = Config::python();
    config.pathconfig_warnings = Some(false);
    config.set_argv(args.iter().copied());
    config.read(ReadContext {
        host,
        preconfig: &preconfig,
        flags: &flags,
        path_config,
    })?;
    Ok(config)
}

fn read(host: &Host, args: &[&str]) -> StatusResult<Config> {
    read_with(host, &PathConfig::new(), args)
}

// =============================================================================
// Installed Layouts
// =============================================================================

#[test]
fn test_usr_local_install() {
    let host = host(installed(), &[]);
    let config = read(&host, &["/usr/local/bin/python3", "app.py"]).unwrap();

    assert_eq!(config.prefix.as_deref(), Some("/usr/local"));
    assert_eq!(config.exec_prefix.as_deref(), Some("/usr/local"));
    assert_eq!(config.base_prefix, config.prefix);
    assert_eq!(config.executable.as_deref(), Some("/usr/local/bin/python3"));
    assert_eq!(
        config.module_search_paths,
        vec![
            "/usr/local/lib/python312.zip",
            "/usr/local/lib/python3.12",
            "/usr/local/lib/python3.12/lib-dynload",
        ]
    );
    assert_eq!(config.run_filename.as_deref(), Some("/home/user/app.py"));
    assert_eq!(
        compute_sys_path0(&config.argv, host.fs.as_ref()),
        Some("/home/user".to_owned())
    );
}

#[test]
fn test_program_found_through_path() {
    let host = host(installed(), &[("PATH", "/bin:/usr/local/bin")]);
    let config = read(&host, &["python3"]).unwrap();
    assert_eq!(config.executable.as_deref(), Some("/usr/local/bin/python3"));
    assert_eq!(config.prefix.as_deref(), Some("/usr/local"));
    assert_eq!(config.run_target(), RunTarget::Stdin);
}

#[test]
fn test_pythonpath_comes_first() {
    let host = host(installed(), &[("PYTHONPATH", "/proj:/vendor")]);
    let config = read(&host, &["/usr/local/bin/python3"]).unwrap();
    assert_eq!(config.module_search_paths[..2], ["/proj", "/vendor"]);
    assert_eq!(config.module_search_paths.len(), 5);
}

// =============================================================================
// Home Override
// =============================================================================

#[test]
fn test_pythonhome_single_root() {
    let host = host(installed(), &[("PYTHONHOME", "/opt/py")]);
    let config = read(&host, &["/usr/local/bin/python3"]).unwrap();

    assert_eq!(config.home.as_deref(), Some("/opt/py"));
    assert_eq!(config.prefix.as_deref(), Some("/opt/py"));
    assert_eq!(config.exec_prefix.as_deref(), Some("/opt/py"));
    assert_eq!(
        config.module_search_paths,
        vec![
            "/opt/py/lib/python312.zip",
            "/opt/py/lib/python3.12",
            "/opt/py/lib/python3.12/lib-dynload",
        ]
    );
}

#[test]
fn test_pythonhome_two_roots() {
    let host = host(installed(), &[("PYTHONHOME", "/opt/a:/opt/b")]);
    let config = read(&host, &["/usr/local/bin/python3"]).unwrap();

    assert_eq!(config.prefix.as_deref(), Some("/opt/a"));
    assert_eq!(config.exec_prefix.as_deref(), Some("/opt/b"));
    assert_eq!(
        config.module_search_paths.last().map(String::as_str),
        Some("/opt/b/lib/python3.12/lib-dynload")
    );
}

#[test]
fn test_home_ignores_executable_location() {
    for argv0 in ["/usr/local/bin/python3", "/nowhere/python3", "python3"] {
        let host = host(installed(), &[("PYTHONHOME", "/opt/py")]);
        let config = read(&host, &[argv0]).unwrap();
        assert_eq!(config.prefix.as_deref(), Some("/opt/py"), "argv0 {argv0}");
        assert_eq!(config.exec_prefix.as_deref(), Some("/opt/py"), "argv0 {argv0}");
    }
}

#[test]
fn test_home_override_beats_environment() {
    let host = host(installed(), &[("PYTHONHOME", "/env/home")]);
    let mut path_config = PathConfig::new();
    path_config.set_home(Some("/api/home")).unwrap();

    let config = read_with(&host, &path_config, &["/usr/local/bin/python3"]).unwrap();
    assert_eq!(config.home.as_deref(), Some("/api/home"));
    assert_eq!(config.prefix.as_deref(), Some("/api/home"));
}

// =============================================================================
// Run Targets
// =============================================================================

#[test]
fn test_command_argv() {
    let host = host(installed(), &[]);
    let config = read(&host, &["python3", "-c", "print(1)"]).unwrap();
    assert_eq!(config.run_command.as_deref(), Some("print(1)\n"));
    assert_eq!(config.run_module, None);
    assert_eq!(config.argv, vec!["-c"]);
    assert_eq!(config.orig_argv, vec!["python3", "-c", "print(1)"]);
    assert_eq!(compute_sys_path0(&config.argv, host.fs.as_ref()), Some(String::new()));
}

#[test]
fn test_module_argv() {
    let host = host(installed(), &[]);
    let config = read(&host, &["python3", "-m", "foo", "bar"]).unwrap();
    assert_eq!(config.run_module.as_deref(), Some("foo"));
    assert_eq!(config.run_command, None);
    assert_eq!(config.argv, vec!["-m", "bar"]);
    assert_eq!(
        compute_sys_path0(&config.argv, host.fs.as_ref()),
        Some("/home/user".to_owned())
    );
}

#[test]
fn test_command_and_module_never_both_set() {
    let host = host(installed(), &[]);
    for args in [
        &["python3", "-c", "x", "-m", "y"][..],
        &["python3", "-m", "y", "-c", "x"][..],
        &["python3", "-i", "-mfoo", "-cbar"][..],
    ] {
        let config = read(&host, args).unwrap();
        assert!(config.run_command.is_none() || config.run_module.is_none());
    }
}

// =============================================================================
// Symbolic Links
// =============================================================================

#[test]
fn test_symlink_chain_within_bound() {
    let mut fs = installed();
    for i in 0..39 {
        let target = if i == 38 {
            "/usr/local/bin/python3".to_owned()
        } else {
            format!("/links/l{}", i + 1)
        };
        fs = fs.with_symlink(&format!("/links/l{i}"), &target);
    }
    let host = host(fs, &[]);
    let config = read(&host, &["/links/l0"]).unwrap();
    assert_eq!(config.prefix.as_deref(), Some("/usr/local"));
    assert_eq!(config.executable.as_deref(), Some("/links/l0"));
}

#[test]
fn test_symlink_cycle_is_reported() {
    let fs = installed()
        .with_symlink("/usr/bin/a", "/usr/bin/b")
        .with_symlink("/usr/bin/b", "/usr/bin/a");
    let host = host(fs, &[]);
    let err = read(&host, &["/usr/bin/a"]).unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::SymlinkLoop));
    assert_eq!(err.message(), Some("maximum number of symbolic links reached"));
}

// =============================================================================
// Build Tree
// =============================================================================

#[test]
fn test_build_tree_keeps_compiled_prefix() {
    let fs = MemoryFileSystem::new()
        .with_executable("/src/build/python")
        .with_file("/src/build/Modules/Setup.local")
        .with_file("/src/build/Lib/os.py");
    let host = host(fs, &[]);
    let config = read(&host, &["/src/build/python"]).unwrap();

    assert_eq!(config.prefix.as_deref(), Some("/usr/local"));
    assert_eq!(config.exec_prefix.as_deref(), Some("/usr/local"));
    assert_eq!(
        config.module_search_paths,
        vec![
            "/usr/local/lib/python312.zip",
            "/src/build/Lib",
            "/usr/local/lib/lib-dynload",
        ]
    );
}

// =============================================================================
// Explicit Path Configuration
// =============================================================================

#[test]
fn test_search_path_round_trips_through_cache() {
    let entries = vec![
        "/a".to_owned(),
        String::new(),
        "/b/c".to_owned(),
        "rel".to_owned(),
    ];
    let mut source = Config::python();
    source.module_search_paths = entries.clone();
    source.module_search_paths_set = true;

    let mut path_config = PathConfig::new();
    path_config.publish_from_config(&source);

    let host = host(installed(), &[]);
    let joined = path_config.module_search_path(&host).unwrap();
    assert_eq!(split_path_list(joined).collect::<Vec<_>>(), entries);

    // Published results are not overrides: a fresh read recalculates.
    let config = read_with(&host, &path_config, &["/usr/local/bin/python3"]).unwrap();
    assert_eq!(config.module_search_paths[1], "/usr/local/lib/python3.12");
}

#[test]
fn test_set_path_skips_calculation() {
    let host = host(MemoryFileSystem::new(), &[]);
    let mut path_config = PathConfig::new();
    path_config.set_program_full_path("/opt/bin/py").unwrap();
    path_config.set_path(&host, Some("/x:/y")).unwrap();

    let config = read_with(&host, &path_config, &["py"]).unwrap();
    assert_eq!(config.module_search_paths, vec!["/x", "/y"]);
    assert_eq!(config.prefix.as_deref(), Some(""));
    assert_eq!(config.exec_prefix.as_deref(), Some(""));
    assert_eq!(config.executable.as_deref(), Some("/opt/bin/py"));
}

#[test]
fn test_setters_rejected_after_first_read() {
    let host = host(installed(), &[("PATH", "/usr/local/bin")]);
    let mut path_config = PathConfig::new();
    assert_eq!(path_config.exec_prefix(&host).unwrap(), "/usr/local");

    let err = path_config.set_program_name("other").unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::Validation));

    path_config.clear();
    path_config.set_program_name("other").unwrap();
}

#[test]
fn test_dump_after_read() {
    let host = host(installed(), &[]);
    let config = read(&host, &["/usr/local/bin/python3"]).unwrap();
    let dump = render_path_config(&config);
    assert!(dump.starts_with("Python path configuration:\n"));
    assert!(dump.contains("  sys.prefix = '/usr/local'\n"));
    assert!(dump.contains("    '/usr/local/lib/python3.12/lib-dynload',\n"));
}

// =============================================================================
// Oversized Paths
// =============================================================================

#[test]
fn test_oversized_home_publishes_nothing() {
    let host = host(installed(), &[]);
    let preconfig = PreConfig::python();
    let flags = GlobalFlags::default();
    let path_config = PathConfig::new();
    let mut config = Config::python();
    config.pathconfig_warnings = Some(false);
    config.home = Some(format!("/{}", "a".repeat(5000)));
    config.set_argv(["/usr/local/bin/python3"]);

    let err = config
        .read(ReadContext {
            host: &host,
            preconfig: &preconfig,
            flags: &flags,
            path_config: &path_config,
        })
        .unwrap_err();

    assert_eq!(err.kind(), Some(ErrorKind::PathTooLong));
    assert_eq!(config.prefix, None);
    assert_eq!(config.exec_prefix, None);
    assert!(config.module_search_paths.is_empty());
    assert!(!config.module_search_paths_set);
}

#[test]
fn test_oversized_home_override_fails_lazy_getter() {
    let host = host(installed(), &[]);
    let home = format!("/{}", "a".repeat(5000));
    let mut path_config = PathConfig::new();
    path_config.set_home(Some(home.as_str())).unwrap();

    let err = path_config.prefix(&host).unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::PathTooLong));
    assert!(!path_config.is_complete());
    assert!(!path_config.is_observed());
}
