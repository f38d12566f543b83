use anyhow::{Context, Result};
use guide_sync_core::loader::DocumentLoader;
use guide_sync_core::model::DocumentSource;
use serde::Serialize;

use crate::commands::extractor_from_flags;

#[derive(Debug, Serialize)]
pub struct SectionInfo {
    pub position: usize,
    pub level: usize,
    pub heading: String,
    pub key: String,
    pub occurrence: usize,
    pub body_lines: usize,
    pub fingerprint: String,
}

#[derive(Debug, Serialize)]
pub struct SectionListing {
    pub document: String,
    pub digest: String,
    pub sections: Vec<SectionInfo>,
}

/// Extract the sections of a single document.
pub fn collect_sections(
    path: &str,
    marker: &str,
    case_sensitive: bool,
    no_skip_fences: bool,
) -> Result<SectionListing> {
    let extractor = extractor_from_flags(marker, case_sensitive, no_skip_fences)?;
    let doc = DocumentLoader::new()
        .load(&DocumentSource::new(path, path))
        .with_context(|| format!("Failed to load document {path}"))?;

    let sections = extractor
        .sections(&doc)
        .map(|section| SectionInfo {
            position: section.position,
            level: section.level,
            heading: section.heading.to_string(),
            key: section.key.clone(),
            occurrence: section.occurrence,
            body_lines: section.body.len(),
            fingerprint: section.fingerprint(),
        })
        .collect();

    Ok(SectionListing { document: doc.id().to_string(), digest: doc.digest().to_string(), sections })
}

/// List the sections of a single document.
pub fn sections_command(
    path: &str,
    marker: &str,
    case_sensitive: bool,
    no_skip_fences: bool,
    json: bool,
) -> Result<()> {
    let listing = collect_sections(path, marker, case_sensitive, no_skip_fences)?;

    if json {
        let serialized = serde_json::to_string_pretty(&listing)
            .context("Failed to serialize sections to JSON")?;
        println!("{}", serialized);
        return Ok(());
    }

    println!("Sections of {} ({}):", listing.document, listing.sections.len());
    for section in &listing.sections {
        let heading = if section.level == 0 { "(preamble)" } else { section.heading.as_str() };
        let indent = "  ".repeat(section.level.max(1));
        let repeat = if section.occurrence > 1 {
            format!(" (#{})", section.occurrence)
        } else {
            String::new()
        };
        println!(
            "{}[{}] {}{} - {} line(s), {}",
            indent,
            section.position,
            heading,
            repeat,
            section.body_lines,
            &section.fingerprint[..12]
        );
    }

    Ok(())
}
