//! Cross-document comparison of variant groups.
//!
//! Sections are matched by `(normalized heading, occurrence)`, so the second
//! `## Example` of one document pairs with the second `## Example` of another.
//! Headings are reported in first-seen order walking the members in the order
//! they were added to the group.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sections::{section_label, Section};

/// A group needs at least two members to be compared.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Variant group '{group}' has {members} document(s); at least two are required")]
pub struct EmptyGroupError {
    pub group: String,
    pub members: usize,
}

/// One document of a group, already reduced to its sections.
#[derive(Debug, Clone)]
pub struct GroupMember<'a> {
    pub id: String,
    pub sections: Vec<Section<'a>>,
}

/// Declared set of documents that should carry the same content.
#[derive(Debug, Clone)]
pub struct VariantGroup<'a> {
    pub name: String,
    pub members: Vec<GroupMember<'a>>,
}

impl<'a> VariantGroup<'a> {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), members: Vec::new() }
    }

    pub fn member(mut self, id: impl Into<String>, sections: Vec<Section<'a>>) -> Self {
        self.members.push(GroupMember { id: id.into(), sections });
        self
    }

    pub fn member_ids(&self) -> Vec<String> {
        self.members.iter().map(|m| m.id.clone()).collect()
    }
}

/// A heading absent from at least one member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingSection {
    /// Normalized heading label (with `(#n)` suffix for repeats).
    pub heading: String,
    /// Heading as first written in the group.
    pub display: String,
    pub present_in: Vec<String>,
    pub missing_in: Vec<String>,
}

/// A heading present everywhere whose body differs from the reference member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivergedSection {
    pub heading: String,
    pub display: String,
    /// First member of the group; every other body is compared against it.
    pub reference: String,
    pub differing: Vec<String>,
}

/// Outcome of comparing one variant group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffResult {
    pub group: String,
    pub documents: Vec<String>,
    pub missing: Vec<MissingSection>,
    pub diverged: Vec<DivergedSection>,
}

impl DiffResult {
    pub fn is_consistent(&self) -> bool {
        self.missing.is_empty() && self.diverged.is_empty()
    }

    /// Headings recorded as missing from `document`, in report order.
    pub fn missing_in(&self, document: &str) -> Vec<&str> {
        self.missing
            .iter()
            .filter(|m| m.missing_in.iter().any(|d| d == document))
            .map(|m| m.heading.as_str())
            .collect()
    }

    pub fn diverged_headings(&self) -> Vec<&str> {
        self.diverged.iter().map(|d| d.heading.as_str()).collect()
    }
}

struct Occurrences<'s, 'a> {
    display: &'a str,
    /// (member index, section) pairs in member order.
    entries: Vec<(usize, &'s Section<'a>)>,
}

/// Compare every member of `group` section by section.
pub fn diff_group(group: &VariantGroup<'_>) -> Result<DiffResult, EmptyGroupError> {
    if group.members.len() < 2 {
        return Err(EmptyGroupError { group: group.name.clone(), members: group.members.len() });
    }

    let mut by_heading: IndexMap<(&str, usize), Occurrences<'_, '_>> = IndexMap::new();
    for (member_idx, member) in group.members.iter().enumerate() {
        for section in &member.sections {
            by_heading
                .entry((section.key.as_str(), section.occurrence))
                .or_insert_with(|| Occurrences { display: section.heading, entries: Vec::new() })
                .entries
                .push((member_idx, section));
        }
    }

    let mut missing = Vec::new();
    let mut diverged = Vec::new();

    for ((key, occurrence), occ) in &by_heading {
        let heading = section_label(key, *occurrence);
        let display = if occ.display.is_empty() { heading.clone() } else { occ.display.to_string() };

        let mut present: Vec<usize> = occ.entries.iter().map(|(idx, _)| *idx).collect();
        present.dedup();
        if present.len() < group.members.len() {
            let present_in = present.iter().map(|idx| group.members[*idx].id.clone()).collect();
            let missing_in = group
                .members
                .iter()
                .enumerate()
                .filter(|(idx, _)| !present.contains(idx))
                .map(|(_, m)| m.id.clone())
                .collect();
            missing.push(MissingSection { heading, display, present_in, missing_in });
            continue;
        }

        // Present in every member: compare against the first member's body.
        let reference_body = occ.entries[0].1.normalized_body();
        let differing: Vec<String> = occ.entries[1..]
            .iter()
            .filter(|(_, section)| section.normalized_body() != reference_body)
            .map(|(idx, _)| group.members[*idx].id.clone())
            .collect();
        if !differing.is_empty() {
            diverged.push(DivergedSection {
                heading,
                display,
                reference: group.members[occ.entries[0].0].id.clone(),
                differing,
            });
        }
    }

    tracing::debug!(
        group = %group.name,
        headings = by_heading.len(),
        missing = missing.len(),
        diverged = diverged.len(),
        "compared variant group"
    );

    Ok(DiffResult { group: group.name.clone(), documents: group.member_ids(), missing, diverged })
}
