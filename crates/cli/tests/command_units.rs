use std::fs;

use guide_sync::commands::{
    check_command, collect_sections, compare_command, init_command, resolve_layout,
    sections_command, ADHOC_GROUP,
};
use guide_sync_core::config::{load_check_config, GuideLayout};
use tempfile::tempdir;

#[test]
fn compare_returns_drift_status() {
    let temp = tempdir().unwrap();
    let a = temp.path().join("a.md");
    let b = temp.path().join("b.md");
    fs::write(&a, "# Usage\ncall foo()\n").unwrap();
    fs::write(&b, "# Usage\ncall bar()\n").unwrap();
    let paths = vec![a.display().to_string(), b.display().to_string()];

    assert_eq!(compare_command(&paths, "#", false, false, "text").unwrap(), 1);
    assert_eq!(compare_command(&paths[..1], "#", false, false, "text").unwrap(), 1);
    assert_eq!(ADHOC_GROUP, "adhoc");
}

#[test]
fn compare_rejects_unknown_format() {
    let temp = tempdir().unwrap();
    let a = temp.path().join("a.md");
    fs::write(&a, "# Usage\n").unwrap();
    let paths = vec![a.display().to_string(), a.display().to_string()];

    let err = compare_command(&paths, "#", false, false, "xml").unwrap_err();
    assert!(err.to_string().contains("Unknown report format 'xml'"), "unexpected error: {err}");
}

#[test]
fn compare_rejects_empty_marker() {
    let temp = tempdir().unwrap();
    let a = temp.path().join("a.md");
    fs::write(&a, "x").unwrap();
    let paths = vec![a.display().to_string()];
    let err = compare_command(&paths, "", false, false, "text").unwrap_err();
    assert!(err.to_string().contains("Invalid --marker"));
}

#[test]
fn collect_sections_honors_case_sensitivity_and_fences() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("guide.md");
    fs::write(&path, "# Export TAGS\n```\n# comment\n```\n# Tie\n").unwrap();
    let path = path.display().to_string();

    let listing = collect_sections(&path, "#", false, false).unwrap();
    let keys: Vec<&str> = listing.sections.iter().map(|s| s.key.as_str()).collect();
    assert_eq!(keys, vec!["", "export tags", "tie"]);
    assert_eq!(listing.sections[1].body_lines, 3);

    let strict = collect_sections(&path, "#", true, true).unwrap();
    let keys: Vec<&str> = strict.sections.iter().map(|s| s.key.as_str()).collect();
    assert_eq!(keys, vec!["", "Export TAGS", "comment", "Tie"]);

    sections_command(&path, "#", false, false, true).unwrap();
    sections_command(&path, "#", false, false, false).unwrap();
}

#[test]
fn init_writes_config_and_refuses_to_overwrite() {
    let temp = tempdir().unwrap();
    let root = temp.path().to_string_lossy().to_string();
    fs::write(temp.path().join("raku.md"), "# A\n").unwrap();
    fs::write(temp.path().join("perl6.md"), "# A\n").unwrap();
    fs::write(temp.path().join("notes.txt"), "ignored").unwrap();

    init_command(&root, "guide", false).unwrap();
    let layout = GuideLayout::new(temp.path().canonicalize().unwrap());
    let config = load_check_config(&layout).unwrap();
    assert_eq!(config.groups["guide"], vec!["perl6.md", "raku.md"]);
    assert_eq!(config.documents.len(), 2);
    assert!(config.validate().is_ok());

    let err = init_command(&root, "guide", false).unwrap_err();
    assert!(err.to_string().contains("already exists"));
    init_command(&root, "renamed", true).unwrap();
    let config = load_check_config(&layout).unwrap();
    assert!(config.groups.contains_key("renamed"));

    assert_eq!(check_command(&root, None, "text").unwrap(), 0);
}

#[test]
fn resolve_layout_accepts_relative_config_override() {
    let temp = tempdir().unwrap();
    let root = temp.path().to_string_lossy().to_string();
    let layout = resolve_layout(&root, Some("custom/check.json")).unwrap();
    assert!(layout.config_path.ends_with("custom/check.json"));
    assert!(layout.config_path.starts_with(&layout.root));
}

#[test]
fn check_rejects_invalid_config() {
    let temp = tempdir().unwrap();
    let root = temp.path().to_string_lossy().to_string();
    let layout = GuideLayout::new(temp.path());
    fs::create_dir_all(&layout.meta_dir).unwrap();
    fs::write(
        &layout.config_path,
        "documents:\n  - path: a.md\n  - path: a.md\ngroups:\n  g: [a.md]\n",
    )
    .unwrap();

    let err = check_command(&root, None, "text").unwrap_err();
    let chain = format!("{err:#}");
    assert!(chain.contains("declared more than once"), "unexpected error: {chain}");
}
