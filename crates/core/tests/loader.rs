use guide_sync_core::loader::{DocumentLoader, LoadError};
use guide_sync_core::model::DocumentSource;
use tempfile::tempdir;

#[test]
fn load_preserves_lines_and_identity() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("README.md");
    std::fs::write(&path, "# Title\r\nbody\n\nlast").unwrap();

    let doc = DocumentLoader::new().load(&DocumentSource::new("raku", &path)).unwrap();
    assert_eq!(doc.id(), "raku");
    assert_eq!(doc.location(), path.as_path());
    assert_eq!(doc.lines(), &["# Title", "body", "", "last"]);
    assert_eq!(doc.digest().len(), 64);
}

#[test]
fn missing_file_is_unreadable() {
    let dir = tempdir().unwrap();
    let source = DocumentSource::new("ghost", dir.path().join("nope.md"));
    let err = DocumentLoader::new().load(&source).unwrap_err();

    assert!(matches!(err, LoadError::Unreadable { .. }), "unexpected error: {err}");
    assert_eq!(err.document_id(), "ghost");
    assert!(err.to_string().contains("ghost"));
}

#[test]
fn binary_content_is_not_text() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("blob.md");
    std::fs::write(&path, [0xff, 0xfe, 0x00, 0x80]).unwrap();

    let err = DocumentLoader::new().load(&DocumentSource::new("blob", &path)).unwrap_err();
    assert!(matches!(err, LoadError::NotText { .. }), "unexpected error: {err}");
}

#[test]
fn parallel_loading_keeps_input_order() {
    let dir = tempdir().unwrap();
    let sources: Vec<DocumentSource> = (0..16)
        .map(|i| {
            let path = dir.path().join(format!("doc{i}.md"));
            std::fs::write(&path, format!("# Doc {i}\n")).unwrap();
            DocumentSource::new(format!("doc{i}"), path)
        })
        .collect();

    let sequential = DocumentLoader::new().load_all(&sources).unwrap();
    let parallel = DocumentLoader::new().with_parallel(true).load_all(&sources).unwrap();

    let ids: Vec<&str> = parallel.iter().map(|d| d.id()).collect();
    let expected: Vec<String> = (0..16).map(|i| format!("doc{i}")).collect();
    assert_eq!(ids, expected);
    assert_eq!(sequential, parallel);
}

#[test]
fn load_all_reports_first_failure_in_input_order() {
    let dir = tempdir().unwrap();
    let good = dir.path().join("good.md");
    std::fs::write(&good, "ok").unwrap();
    let sources = vec![
        DocumentSource::new("good", &good),
        DocumentSource::new("first-missing", dir.path().join("a.md")),
        DocumentSource::new("second-missing", dir.path().join("b.md")),
    ];

    for parallel in [false, true] {
        let err = DocumentLoader::new().with_parallel(parallel).load_all(&sources).unwrap_err();
        assert_eq!(err.document_id(), "first-missing");
    }
}
