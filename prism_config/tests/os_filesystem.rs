//! Path calculation against real directory trees.

#![cfg(unix)]

use prism_config::{
    BuildConfig, Config, Environment, GlobalFlags, Host, OsFileSystem, PathConfig, PreConfig,
    ReadContext,
};
use std::os::unix::fs::{PermissionsExt, symlink};
use std::path::Path;
use std::sync::Arc;

fn host() -> Host {
    let build = BuildConfig {
        prefix: "/nonexistent/prefix".to_owned(),
        exec_prefix: "/nonexistent/prefix".to_owned(),
        python_path: String::new(),
        vpath: String::new(),
        platlibdir: "lib".to_owned(),
        version: "9.9".to_owned(),
    };
    Host::new(Environment::new(), Arc::new(OsFileSystem), build)
}

fn install(root: &Path) {
    let bin = root.join("bin");
    std::fs::create_dir_all(&bin).unwrap();
    let exe = bin.join("python3");
    std::fs::write(&exe, "").unwrap();
    std::fs::set_permissions(&exe, std::fs::Permissions::from_mode(0o755)).unwrap();

    let lib = root.join("lib/python9.9");
    std::fs::create_dir_all(lib.join("lib-dynload")).unwrap();
    std::fs::write(lib.join("os.py"), "").unwrap();
}

fn read(argv0: &str) -> Config {
    let host = host();
    let preconfig = PreConfig::python();
    let flags = GlobalFlags::default();
    let path_config = PathConfig::new();
    let mut config = Config::python();
    config.pathconfig_warnings = Some(false);
    config.set_argv([argv0, "-c", "pass"]);
    config
        .read(ReadContext {
            host: &host,
            preconfig: &preconfig,
            flags: &flags,
            path_config: &path_config,
        })
        .unwrap();
    config
}

#[test]
fn test_installed_tree() {
    let tmp = tempfile::tempdir().unwrap();
    install(tmp.path());
    let root = tmp.path().to_str().unwrap();

    let config = read(&format!("{root}/bin/python3"));
    assert_eq!(config.prefix.as_deref(), Some(root));
    assert_eq!(config.exec_prefix.as_deref(), Some(root));
    assert_eq!(
        config.module_search_paths,
        vec![
            format!("{root}/lib/python99.zip"),
            format!("{root}/lib/python9.9"),
            format!("{root}/lib/python9.9/lib-dynload"),
        ]
    );
}

#[test]
fn test_absolute_symlink_to_executable() {
    let tmp = tempfile::tempdir().unwrap();
    install(tmp.path());
    let root = tmp.path().to_str().unwrap();

    let links = tmp.path().join("links");
    std::fs::create_dir(&links).unwrap();
    symlink(tmp.path().join("bin/python3"), links.join("python")).unwrap();

    let config = read(&format!("{root}/links/python"));
    assert_eq!(config.prefix.as_deref(), Some(root));
    assert_eq!(config.executable.as_deref(), Some(format!("{root}/links/python").as_str()));
}

#[test]
fn test_relative_symlink_is_joined_not_normalized() {
    let tmp = tempfile::tempdir().unwrap();
    install(tmp.path());
    let root = tmp.path().to_str().unwrap();

    let links = tmp.path().join("links");
    std::fs::create_dir(&links).unwrap();
    symlink("../bin/python3", links.join("python")).unwrap();

    let config = read(&format!("{root}/links/python"));
    assert_eq!(config.prefix.as_deref(), Some(format!("{root}/links/..").as_str()));
}

#[test]
fn test_missing_stdlib_falls_back_to_compiled_prefix() {
    let tmp = tempfile::tempdir().unwrap();
    let bin = tmp.path().join("bin");
    std::fs::create_dir_all(&bin).unwrap();
    let root = tmp.path().to_str().unwrap();

    let config = read(&format!("{root}/bin/python3"));
    assert_eq!(config.prefix.as_deref(), Some("/nonexistent/prefix"));
    assert_eq!(config.exec_prefix.as_deref(), Some("/nonexistent/prefix"));
    assert_eq!(
        config.module_search_paths.last().map(String::as_str),
        Some("/nonexistent/prefix/lib/lib-dynload")
    );
}
