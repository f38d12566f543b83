//! Report generation: projecting diff results into text or JSON plus a status code.
//!
//! Renderers are looked up by name through a [`RendererRegistry`]; frontends
//! pick one with `--format`.

use std::collections::HashMap;
use std::fmt::Write as _;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::diff::{DiffResult, EmptyGroupError};
use crate::model::Document;

/// Exit status when every group is consistent.
pub const STATUS_CONSISTENT: i32 = 0;
/// Exit status when any group drifted or could not be compared.
pub const STATUS_DRIFT: i32 = 1;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Unknown report format '{requested}'. Available: {}", available.join(", "))]
    UnknownFormat { requested: String, available: Vec<String> },

    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to format report: {0}")]
    Format(#[from] std::fmt::Error),
}

/// Per-document facts carried into the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub id: String,
    pub path: String,
    pub lines: usize,
    pub digest: String,
}

impl From<&Document> for DocumentSummary {
    fn from(doc: &Document) -> Self {
        Self {
            id: doc.id().to_string(),
            path: doc.location().display().to_string(),
            lines: doc.line_count(),
            digest: doc.digest().to_string(),
        }
    }
}

/// What happened to one declared group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GroupOutcome {
    Compared(DiffResult),
    Skipped { group: String, reason: String },
}

impl GroupOutcome {
    pub fn group(&self) -> &str {
        match self {
            GroupOutcome::Compared(result) => &result.group,
            GroupOutcome::Skipped { group, .. } => group,
        }
    }

    pub fn is_consistent(&self) -> bool {
        matches!(self, GroupOutcome::Compared(result) if result.is_consistent())
    }
}

impl From<Result<DiffResult, EmptyGroupError>> for GroupOutcome {
    fn from(outcome: Result<DiffResult, EmptyGroupError>) -> Self {
        match outcome {
            Ok(result) => GroupOutcome::Compared(result),
            Err(err) => GroupOutcome::Skipped { group: err.group.clone(), reason: err.to_string() },
        }
    }
}

/// Everything a run produced, in group declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub documents: Vec<DocumentSummary>,
    pub groups: Vec<GroupOutcome>,
}

impl Report {
    pub fn new(name: Option<String>) -> Self {
        Self { name, documents: Vec::new(), groups: Vec::new() }
    }

    /// 0 when every group was compared with no missing or diverged sections, else 1.
    pub fn status_code(&self) -> i32 {
        if self.groups.iter().all(GroupOutcome::is_consistent) {
            STATUS_CONSISTENT
        } else {
            STATUS_DRIFT
        }
    }

    pub fn drifted_groups(&self) -> usize {
        self.groups
            .iter()
            .filter(|g| matches!(g, GroupOutcome::Compared(r) if !r.is_consistent()))
            .count()
    }

    pub fn skipped_groups(&self) -> usize {
        self.groups.iter().filter(|g| matches!(g, GroupOutcome::Skipped { .. })).count()
    }
}

/// Turns a [`Report`] into output text.
pub trait ReportRenderer: Send + Sync {
    fn render(&self, report: &Report) -> Result<String, RenderError>;
    fn name(&self) -> &'static str;
}

/// Human-readable summary.
pub struct TextRenderer;

impl ReportRenderer for TextRenderer {
    fn render(&self, report: &Report) -> Result<String, RenderError> {
        let mut out = String::new();
        let title = match &report.name {
            Some(name) => format!("guide-sync report: {name}"),
            None => "guide-sync report".to_string(),
        };
        writeln!(out, "{title}")?;
        writeln!(out, "{}", "=".repeat(title.len()))?;

        if report.groups.is_empty() {
            writeln!(out, "(no groups declared)")?;
        }

        for outcome in &report.groups {
            match outcome {
                GroupOutcome::Compared(result) => {
                    writeln!(out, "Group: {} ({})", result.group, result.documents.join(", "))?;
                    writeln!(out, "  Missing sections: {}", result.missing.len())?;
                    for missing in &result.missing {
                        writeln!(
                            out,
                            "    - {}: missing in {} (present in {})",
                            missing.heading,
                            missing.missing_in.join(", "),
                            missing.present_in.join(", ")
                        )?;
                    }
                    writeln!(out, "  Diverged sections: {}", result.diverged.len())?;
                    for diverged in &result.diverged {
                        writeln!(
                            out,
                            "    - {}: {} differ(s) from {}",
                            diverged.heading,
                            diverged.differing.join(", "),
                            diverged.reference
                        )?;
                    }
                }
                GroupOutcome::Skipped { group, reason } => {
                    writeln!(out, "Group: {group}")?;
                    writeln!(out, "  Skipped: {reason}")?;
                }
            }
        }

        writeln!(out)?;
        writeln!(
            out,
            "Summary: {} group(s), {} with drift, {} skipped",
            report.groups.len(),
            report.drifted_groups(),
            report.skipped_groups()
        )?;
        let status = if report.status_code() == STATUS_CONSISTENT { "OK" } else { "DRIFT" };
        writeln!(out, "Status: {status}")?;
        Ok(out)
    }

    fn name(&self) -> &'static str {
        "text"
    }
}

#[derive(Serialize)]
struct JsonEnvelope<'r> {
    generated_at: String,
    status: i32,
    #[serde(flatten)]
    report: &'r Report,
}

/// Machine-readable report with a generation timestamp.
pub struct JsonRenderer;

impl ReportRenderer for JsonRenderer {
    fn render(&self, report: &Report) -> Result<String, RenderError> {
        let envelope = JsonEnvelope {
            generated_at: Utc::now().to_rfc3339(),
            status: report.status_code(),
            report,
        };
        Ok(serde_json::to_string_pretty(&envelope)?)
    }

    fn name(&self) -> &'static str {
        "json"
    }
}

/// Registry for report renderers; callers select by name.
#[derive(Default)]
pub struct RendererRegistry {
    renderers: HashMap<String, Box<dyn ReportRenderer>>,
}

impl RendererRegistry {
    pub fn new() -> Self {
        Self { renderers: HashMap::new() }
    }

    pub fn register<R: ReportRenderer + 'static>(&mut self, renderer: R) -> &mut Self {
        self.renderers.insert(renderer.name().to_string(), Box::new(renderer));
        self
    }

    pub fn get(&self, name: &str) -> Option<&dyn ReportRenderer> {
        self.renderers.get(name).map(|r| &**r)
    }

    /// Sorted renderer names, for help and error messages.
    pub fn names(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.renderers.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Render with the named renderer, or fail listing the known names.
    pub fn render(&self, format: &str, report: &Report) -> Result<String, RenderError> {
        let renderer = self.get(format).ok_or_else(|| RenderError::UnknownFormat {
            requested: format.to_string(),
            available: self.names(),
        })?;
        renderer.render(report)
    }
}

/// Registry populated with the text and JSON renderers.
pub fn default_renderer_registry() -> RendererRegistry {
    let mut registry = RendererRegistry::new();
    registry.register(TextRenderer);
    registry.register(JsonRenderer);
    registry
}
