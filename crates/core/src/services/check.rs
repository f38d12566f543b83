use std::collections::HashMap;

use thiserror::Error;

use crate::config::{CheckConfig, ConfigError, GuideLayout};
use crate::diff::{diff_group, VariantGroup};
use crate::loader::{DocumentLoader, LoadError};
use crate::model::Document;
use crate::report::{DocumentSummary, GroupOutcome, Report};
use crate::sections::SectionExtractor;

/// Errors that abort a whole check run.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("Invalid check config: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Coordinator that loads the declared documents and compares every group.
pub struct CheckRunner<'a> {
    pub config: &'a CheckConfig,
    pub layout: &'a GuideLayout,
    pub loader: DocumentLoader,
}

impl<'a> CheckRunner<'a> {
    pub fn new(config: &'a CheckConfig, layout: &'a GuideLayout) -> Self {
        let loader = DocumentLoader::new().with_parallel(config.parallel_load);
        Self { config, layout, loader }
    }

    /// Run the check.
    ///
    /// A load failure aborts before anything is reported. A group with fewer
    /// than two members is recorded as skipped and the remaining groups still run.
    pub fn run(&self) -> Result<Report, CheckError> {
        self.config.validate()?;
        let extractor = SectionExtractor::new(self.config.heading_rule())
            .map_err(ConfigError::from)?;

        let sources = self.config.document_sources(self.layout);
        let documents = self.loader.load_all(&sources)?;

        for id in self.config.ungrouped_documents() {
            tracing::warn!(document = %id, "document is not a member of any group");
        }

        let report = compare_groups(self.config, &documents, &extractor);
        tracing::info!(
            groups = report.groups.len(),
            drifted = report.drifted_groups(),
            skipped = report.skipped_groups(),
            "check finished"
        );
        Ok(report)
    }
}

/// Compare each configured group over already-loaded documents.
///
/// Group members must name documents present in `documents`; members that do
/// not are left out of their group.
pub fn compare_groups(
    config: &CheckConfig,
    documents: &[Document],
    extractor: &SectionExtractor,
) -> Report {
    let by_id: HashMap<&str, &Document> = documents.iter().map(|d| (d.id(), d)).collect();

    let mut report = Report::new(config.name.clone());
    report.documents = documents.iter().map(DocumentSummary::from).collect();

    for (name, members) in &config.groups {
        let mut group = VariantGroup::new(name.clone());
        for member in members {
            if let Some(doc) = by_id.get(member.as_str()) {
                group = group.member(doc.id(), extractor.extract(doc));
            }
        }

        let outcome = GroupOutcome::from(diff_group(&group));
        if let GroupOutcome::Skipped { reason, .. } = &outcome {
            tracing::warn!(group = %name, "{reason}");
        }
        report.groups.push(outcome);
    }
    report
}
