use guide_sync_core::diff::{DiffResult, DivergedSection, EmptyGroupError, MissingSection};
use guide_sync_core::report::{
    default_renderer_registry, GroupOutcome, RenderError, Report, ReportRenderer, TextRenderer,
};

fn drifted() -> DiffResult {
    DiffResult {
        group: "guide".into(),
        documents: vec!["A".into(), "B".into()],
        missing: vec![MissingSection {
            heading: "tie".into(),
            display: "Tie".into(),
            present_in: vec!["A".into()],
            missing_in: vec!["B".into()],
        }],
        diverged: vec![DivergedSection {
            heading: "usage".into(),
            display: "Usage".into(),
            reference: "A".into(),
            differing: vec!["B".into()],
        }],
    }
}

fn clean(name: &str) -> DiffResult {
    DiffResult {
        group: name.into(),
        documents: vec!["x".into(), "y".into()],
        missing: vec![],
        diverged: vec![],
    }
}

#[test]
fn status_code_is_zero_only_when_everything_is_consistent() {
    let mut report = Report::new(None);
    assert_eq!(report.status_code(), 0);

    report.groups.push(GroupOutcome::Compared(clean("one")));
    assert_eq!(report.status_code(), 0);

    report.groups.push(GroupOutcome::Compared(drifted()));
    assert_eq!(report.status_code(), 1);
}

#[test]
fn skipped_group_forces_failure_status() {
    let mut report = Report::new(None);
    report.groups.push(GroupOutcome::Compared(clean("one")));
    report.groups.push(GroupOutcome::from(Err::<DiffResult, _>(EmptyGroupError {
        group: "solo".into(),
        members: 1,
    })));
    assert_eq!(report.status_code(), 1);
    assert_eq!(report.skipped_groups(), 1);
}

#[test]
fn text_summary_names_headings_and_counts() {
    let mut report = Report::new(Some("porting".into()));
    report.groups.push(GroupOutcome::Compared(drifted()));
    report.groups.push(GroupOutcome::Skipped {
        group: "solo".into(),
        reason: "Variant group 'solo' has 1 document(s); at least two are required".into(),
    });

    let text = TextRenderer.render(&report).unwrap();
    assert!(text.starts_with("guide-sync report: porting\n"));
    assert!(text.contains("Group: guide (A, B)"));
    assert!(text.contains("Missing sections: 1"));
    assert!(text.contains("- tie: missing in B (present in A)"));
    assert!(text.contains("Diverged sections: 1"));
    assert!(text.contains("- usage: B differ(s) from A"));
    assert!(text.contains("Skipped: Variant group 'solo'"));
    assert!(text.contains("Summary: 2 group(s), 1 with drift, 1 skipped"));
    assert!(text.trim_end().ends_with("Status: DRIFT"));
}

#[test]
fn json_report_carries_status_and_outcomes() {
    let mut report = Report::new(None);
    report.groups.push(GroupOutcome::Compared(drifted()));

    let rendered = default_renderer_registry().render("json", &report).unwrap();
    let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
    assert_eq!(value["status"], 1);
    assert!(value["generated_at"].is_string());
    assert_eq!(value["groups"][0]["outcome"], "compared");
    assert_eq!(value["groups"][0]["diverged"][0]["heading"], "usage");
    assert_eq!(value["groups"][0]["missing"][0]["missing_in"][0], "B");
}

#[test]
fn rendering_does_not_mutate_the_report() {
    let mut report = Report::new(None);
    report.groups.push(GroupOutcome::Compared(drifted()));
    let before = report.clone();
    let registry = default_renderer_registry();
    registry.render("text", &report).unwrap();
    registry.render("json", &report).unwrap();
    assert_eq!(report, before);
}

#[test]
fn unknown_format_lists_available_renderers() {
    let registry = default_renderer_registry();
    assert_eq!(registry.names(), vec!["json", "text"]);

    let err = registry.render("sarif", &Report::new(None)).unwrap_err();
    assert!(matches!(err, RenderError::UnknownFormat { .. }));
    assert!(err.to_string().contains("json, text"));
}
