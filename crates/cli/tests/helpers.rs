use std::fs;
use std::path::Path;

use guide_sync::{canonicalize_or_current, infer_project_name, log_level};
use tempfile::tempdir;

#[test]
fn canonicalize_or_current_returns_cwd_for_dot() {
    let result = canonicalize_or_current(".").expect("canonicalize");
    let expected = std::env::current_dir().expect("cwd");
    assert_eq!(result, expected);
}

#[test]
fn canonicalize_or_current_resolves_existing_path() {
    let tmp = tempdir().expect("tempdir");
    let subdir = tmp.path().join("nested");
    fs::create_dir_all(&subdir).expect("create nested");

    let result = canonicalize_or_current(subdir.to_str().unwrap()).expect("canonicalize nested");
    assert_eq!(result, subdir.canonicalize().expect("canonicalize subdir"));
}

#[test]
fn canonicalize_or_current_joins_missing_relative_path() {
    let result = canonicalize_or_current("does-not-exist-yet").expect("fallback");
    assert!(result.is_absolute());
    assert!(result.ends_with("does-not-exist-yet"));
}

#[test]
fn infer_project_name_uses_last_path_component() {
    assert_eq!(infer_project_name(Path::new("/tmp/porting-guide")), "porting-guide");
}

#[test]
fn infer_project_name_falls_back_when_missing() {
    assert_eq!(infer_project_name(Path::new("/")), "unnamed-guide");
}

#[test]
fn log_level_follows_verbosity_flags() {
    assert_eq!(log_level(0, false), "warn");
    assert_eq!(log_level(1, false), "info");
    assert_eq!(log_level(2, false), "debug");
    assert_eq!(log_level(5, false), "trace");
    assert_eq!(log_level(3, true), "error");
}
