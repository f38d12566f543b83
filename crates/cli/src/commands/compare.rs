use anyhow::{anyhow, Context, Result};
use guide_sync_core::diff::{diff_group, VariantGroup};
use guide_sync_core::loader::DocumentLoader;
use guide_sync_core::model::DocumentSource;
use guide_sync_core::report::{DocumentSummary, GroupOutcome, Report};

use crate::commands::{emit_report, extractor_from_flags};

/// Group name used for ad-hoc comparisons.
pub const ADHOC_GROUP: &str = "adhoc";

/// Compare the given files as one variant group without a config file.
///
/// Document ids are the paths as given on the command line.
pub fn compare_command(
    paths: &[String],
    marker: &str,
    case_sensitive: bool,
    no_skip_fences: bool,
    format: &str,
) -> Result<i32> {
    if paths.is_empty() {
        return Err(anyhow!("compare needs at least one document path"));
    }
    let extractor = extractor_from_flags(marker, case_sensitive, no_skip_fences)?;

    let sources: Vec<DocumentSource> =
        paths.iter().map(|p| DocumentSource::new(p.clone(), p.clone())).collect();
    let documents = DocumentLoader::new().load_all(&sources).context("Failed to load documents")?;

    let mut group = VariantGroup::new(ADHOC_GROUP);
    for doc in &documents {
        group = group.member(doc.id(), extractor.extract(doc));
    }

    let mut report = Report::new(None);
    report.documents = documents.iter().map(DocumentSummary::from).collect();
    report.groups.push(GroupOutcome::from(diff_group(&group)));

    emit_report(&report, format)
}
