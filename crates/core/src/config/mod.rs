//! Check configuration: which documents exist and which of them are variants.
//!
//! Configs live at `.guide-sync/config.yaml` by default. Files ending in
//! `.json` are read as JSON, everything else as YAML.

mod layout;

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::DocumentSource;
use crate::sections::{HeadingRule, HeadingRuleError};

pub use layout::{GuideLayout, CONFIG_FILE_NAME, META_DIR_NAME};

/// Schema/config version written by `init`.
pub const CONFIG_VERSION: &str = "0.1.0";

/// Validation failures for a [`CheckConfig`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid heading marker: {0}")]
    HeadingRule(#[from] HeadingRuleError),

    #[error("Document id '{0}' is declared more than once")]
    DuplicateDocument(String),

    #[error("Group '{group}' references undeclared document '{document}'")]
    UnknownDocument { group: String, document: String },

    #[error("Document '{document}' is listed twice in group '{group}'")]
    RepeatedInGroup { group: String, document: String },

    #[error("Document '{document}' belongs to both '{first}' and '{second}'")]
    MultipleGroups { document: String, first: String, second: String },
}

/// One declared document. The id defaults to the path as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub path: String,
}

impl DocumentEntry {
    pub fn new(path: impl Into<String>) -> Self {
        Self { id: None, path: path.into() }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn id(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.path)
    }
}

fn default_heading_marker() -> String {
    "#".to_string()
}

fn default_true() -> bool {
    true
}

/// Serializable description of a check run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_version: Option<String>,
    #[serde(default = "default_heading_marker")]
    pub heading_marker: String,
    #[serde(default)]
    pub case_sensitive_headings: bool,
    #[serde(default = "default_true")]
    pub skip_code_fences: bool,
    #[serde(default)]
    pub parallel_load: bool,
    #[serde(default)]
    pub documents: Vec<DocumentEntry>,
    /// Group name to member document ids, in declaration order.
    #[serde(default)]
    pub groups: IndexMap<String, Vec<String>>,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            name: None,
            config_version: None,
            heading_marker: default_heading_marker(),
            case_sensitive_headings: false,
            skip_code_fences: true,
            parallel_load: false,
            documents: Vec::new(),
            groups: IndexMap::new(),
        }
    }
}

impl CheckConfig {
    /// Create a named config with default heading handling and no documents.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            config_version: Some(CONFIG_VERSION.to_string()),
            ..Self::default()
        }
    }

    pub fn with_document(mut self, entry: DocumentEntry) -> Self {
        self.documents.push(entry);
        self
    }

    pub fn with_group<I, S>(mut self, name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups.insert(name.into(), members.into_iter().map(Into::into).collect());
        self
    }

    pub fn heading_rule(&self) -> HeadingRule {
        HeadingRule::new(self.heading_marker.clone())
            .with_case_sensitive(self.case_sensitive_headings)
            .with_skip_code_fences(self.skip_code_fences)
    }

    /// Check structural invariants. Groups with fewer than two members pass;
    /// they are reported when the group is compared.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.heading_rule().validate()?;

        let mut declared = HashSet::new();
        for entry in &self.documents {
            if !declared.insert(entry.id()) {
                return Err(ConfigError::DuplicateDocument(entry.id().to_string()));
            }
        }

        let mut owner: HashMap<&str, &str> = HashMap::new();
        for (group, members) in &self.groups {
            let mut in_group = HashSet::new();
            for member in members {
                if !declared.contains(member.as_str()) {
                    return Err(ConfigError::UnknownDocument {
                        group: group.clone(),
                        document: member.clone(),
                    });
                }
                if !in_group.insert(member.as_str()) {
                    return Err(ConfigError::RepeatedInGroup {
                        group: group.clone(),
                        document: member.clone(),
                    });
                }
                if let Some(first) = owner.insert(member.as_str(), group.as_str()) {
                    return Err(ConfigError::MultipleGroups {
                        document: member.clone(),
                        first: first.to_string(),
                        second: group.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Declared documents with paths resolved against the layout root.
    pub fn document_sources(&self, layout: &GuideLayout) -> Vec<DocumentSource> {
        self.documents
            .iter()
            .map(|entry| DocumentSource::new(entry.id(), layout.resolve(&entry.path)))
            .collect()
    }

    /// Ids of declared documents that are not a member of any group.
    pub fn ungrouped_documents(&self) -> Vec<&str> {
        let grouped: HashSet<&str> =
            self.groups.values().flat_map(|members| members.iter().map(String::as_str)).collect();
        self.documents.iter().map(DocumentEntry::id).filter(|id| !grouped.contains(id)).collect()
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()).is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

/// Parse config text, choosing JSON or YAML by the file extension of `path`.
pub fn parse_check_config(body: &str, path: &Path) -> Result<CheckConfig> {
    if is_json(path) {
        serde_json::from_str(body).context("Failed to parse check config JSON")
    } else {
        serde_yaml::from_str(body).context("Failed to parse check config YAML")
    }
}

/// Load the check config for a given layout from disk.
pub fn load_check_config(layout: &GuideLayout) -> Result<CheckConfig> {
    let body = std::fs::read_to_string(&layout.config_path).with_context(|| {
        format!("Failed to read check config at {}", layout.config_path.display())
    })?;
    parse_check_config(&body, &layout.config_path)
}

/// Serialize a config in the format implied by `path`.
pub fn render_check_config(config: &CheckConfig, path: &Path) -> Result<String> {
    if is_json(path) {
        serde_json::to_string_pretty(config).context("Failed to serialize check config JSON")
    } else {
        serde_yaml::to_string(config).context("Failed to serialize check config YAML")
    }
}

/// Markdown files directly under `dir`, sorted by file name.
pub fn discover_markdown(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))?
    {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        let is_markdown = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| matches!(e.to_ascii_lowercase().as_str(), "md" | "markdown"));
        if is_markdown {
            found.push(path);
        }
    }
    found.sort();
    Ok(found)
}
