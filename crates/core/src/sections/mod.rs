//! Section extraction: splitting a document into titled sections.
//!
//! A heading line starts a new section and closes the previous one. Everything
//! before the first heading lands in the preamble, which is always the first
//! section yielded and carries the reserved empty heading.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::model::Document;

/// Heading key reserved for the preamble section.
pub const PREAMBLE_KEY: &str = "";

/// Rejected heading-rule configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HeadingRuleError {
    #[error("Heading marker must not be empty")]
    EmptyMarker,

    #[error("Heading marker '{0}' must not contain whitespace")]
    WhitespaceInMarker(String),
}

/// Rule deciding which lines are headings and how heading text is compared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingRule {
    /// Character run that introduces a heading; repeated runs raise the level.
    pub marker: String,
    /// Compare headings with their original casing.
    pub case_sensitive: bool,
    /// Never treat lines inside ``` or ~~~ fenced blocks as headings.
    pub skip_code_fences: bool,
}

impl Default for HeadingRule {
    fn default() -> Self {
        Self { marker: "#".to_string(), case_sensitive: false, skip_code_fences: true }
    }
}

impl HeadingRule {
    pub fn new(marker: impl Into<String>) -> Self {
        Self { marker: marker.into(), ..Self::default() }
    }

    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn with_skip_code_fences(mut self, skip: bool) -> Self {
        self.skip_code_fences = skip;
        self
    }

    pub fn validate(&self) -> Result<(), HeadingRuleError> {
        if self.marker.is_empty() {
            return Err(HeadingRuleError::EmptyMarker);
        }
        if self.marker.chars().any(char::is_whitespace) {
            return Err(HeadingRuleError::WhitespaceInMarker(self.marker.clone()));
        }
        Ok(())
    }

    /// Parse a heading line into its level and display text.
    ///
    /// Returns `None` when the line does not start with the marker or when
    /// nothing but markers and whitespace follows it.
    pub fn parse_heading<'a>(&self, line: &'a str) -> Option<(usize, &'a str)> {
        if self.marker.is_empty() {
            return None;
        }
        let mut rest = line;
        let mut level = 0;
        while let Some(stripped) = rest.strip_prefix(self.marker.as_str()) {
            rest = stripped;
            level += 1;
        }
        if level == 0 {
            return None;
        }
        let text = strip_marker_runs(rest, &self.marker);
        if text.is_empty() {
            None
        } else {
            Some((level, text))
        }
    }

    /// Normalize heading text into the key used for cross-document matching.
    pub fn normalize(&self, heading: &str) -> String {
        let collapsed =
            strip_marker_runs(heading, &self.marker).split_whitespace().collect::<Vec<_>>().join(" ");
        if self.case_sensitive {
            collapsed
        } else {
            collapsed.to_lowercase()
        }
    }
}

fn strip_marker_runs<'a>(text: &'a str, marker: &str) -> &'a str {
    let mut current = text.trim();
    if marker.is_empty() {
        return current;
    }
    loop {
        let next = current.trim_start_matches(marker).trim_end_matches(marker).trim();
        if next.len() == current.len() {
            return current;
        }
        current = next;
    }
}

/// Opening fence of a fenced code block: fence character and run length.
fn fence_run(line: &str) -> Option<(char, usize)> {
    let trimmed = line.trim_start();
    let first = trimmed.chars().next()?;
    if first != '`' && first != '~' {
        return None;
    }
    let len = trimmed.chars().take_while(|c| *c == first).count();
    (len >= 3).then_some((first, len))
}

fn closes_fence(line: &str, open: (char, usize)) -> bool {
    let trimmed = line.trim();
    let (fence_char, open_len) = open;
    let len = trimmed.chars().take_while(|c| *c == fence_char).count();
    len >= open_len && trimmed.len() == len * fence_char.len_utf8()
}

/// Collapse whitespace runs to one space and trim trailing whitespace on each
/// line, then drop blank lines at either end of the body.
pub fn normalize_body(lines: &[String]) -> Vec<String> {
    let normalized: Vec<String> = lines
        .iter()
        .map(|line| {
            let mut out = String::with_capacity(line.len());
            let mut in_space = false;
            for ch in line.chars() {
                if ch.is_whitespace() {
                    if !in_space {
                        out.push(' ');
                        in_space = true;
                    }
                } else {
                    out.push(ch);
                    in_space = false;
                }
            }
            out.truncate(out.trim_end().len());
            out
        })
        .collect();

    let start = normalized.iter().position(|l| !l.is_empty()).unwrap_or(normalized.len());
    let end = normalized.iter().rposition(|l| !l.is_empty()).map_or(start, |i| i + 1);
    normalized[start..end].to_vec()
}

/// One titled section of a document; borrows its text from the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section<'a> {
    /// Heading as written, without markers. Empty for the preamble.
    pub heading: &'a str,
    /// Normalized heading used for matching.
    pub key: String,
    /// Number of marker runs on the heading line; 0 for the preamble.
    pub level: usize,
    /// Index within the document's section sequence.
    pub position: usize,
    /// 1-based ordinal of this key among the document's sections.
    pub occurrence: usize,
    /// Raw heading line, `None` for the preamble.
    pub heading_line: Option<&'a str>,
    pub body: &'a [String],
}

impl<'a> Section<'a> {
    pub fn is_preamble(&self) -> bool {
        self.heading_line.is_none()
    }

    /// Label used in reports: the key, `(preamble)`, and an ordinal suffix for repeats.
    pub fn label(&self) -> String {
        section_label(&self.key, self.occurrence)
    }

    /// The document lines this section covers, heading line first.
    pub fn source_lines(&self) -> impl Iterator<Item = &'a str> + 'a {
        self.heading_line.into_iter().chain(self.body.iter().map(String::as_str))
    }

    pub fn normalized_body(&self) -> Vec<String> {
        normalize_body(self.body)
    }

    /// Hex SHA-256 over the normalized body.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for line in self.normalized_body() {
            hasher.update(line.as_bytes());
            hasher.update(b"\n");
        }
        format!("{:x}", hasher.finalize())
    }
}

pub(crate) fn section_label(key: &str, occurrence: usize) -> String {
    let base = if key == PREAMBLE_KEY { "(preamble)" } else { key };
    if occurrence > 1 {
        format!("{base} (#{occurrence})")
    } else {
        base.to_string()
    }
}

/// Lazy section iterator over one document.
///
/// Cloning yields an independent iterator at the same point, so a fresh clone
/// taken before iteration can be replayed.
#[derive(Debug, Clone)]
pub struct Sections<'a> {
    rule: HeadingRule,
    lines: &'a [String],
    cursor: usize,
    position: usize,
    preamble_done: bool,
    seen: HashMap<String, usize>,
}

impl<'a> Sections<'a> {
    fn new(rule: HeadingRule, lines: &'a [String]) -> Self {
        Self { rule, lines, cursor: 0, position: 0, preamble_done: false, seen: HashMap::new() }
    }

    /// Index of the next heading line at or after `from`, or the line count.
    fn next_heading(&self, from: usize) -> usize {
        let mut fence: Option<(char, usize)> = None;
        for (idx, line) in self.lines.iter().enumerate().skip(from) {
            if self.rule.skip_code_fences {
                if let Some(open) = fence {
                    if closes_fence(line, open) {
                        fence = None;
                    }
                    continue;
                }
                if let Some(open) = fence_run(line) {
                    fence = Some(open);
                    continue;
                }
            }
            if self.rule.parse_heading(line).is_some() {
                return idx;
            }
        }
        self.lines.len()
    }
}

impl<'a> Iterator for Sections<'a> {
    type Item = Section<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.preamble_done {
            self.preamble_done = true;
            let end = self.next_heading(0);
            self.cursor = end;
            self.position = 1;
            return Some(Section {
                heading: "",
                key: PREAMBLE_KEY.to_string(),
                level: 0,
                position: 0,
                occurrence: 1,
                heading_line: None,
                body: &self.lines[..end],
            });
        }

        if self.cursor >= self.lines.len() {
            return None;
        }

        let lines = self.lines;
        let heading_line = lines[self.cursor].as_str();
        // The cursor only ever stops on lines `next_heading` accepted.
        let (level, heading) = self.rule.parse_heading(heading_line)?;
        let key = self.rule.normalize(heading);
        let occurrence = {
            let count = self.seen.entry(key.clone()).or_insert(0);
            *count += 1;
            *count
        };

        let body_start = self.cursor + 1;
        let end = self.next_heading(body_start);
        let position = self.position;
        self.cursor = end;
        self.position += 1;

        Some(Section {
            heading,
            key,
            level,
            position,
            occurrence,
            heading_line: Some(heading_line),
            body: &lines[body_start..end],
        })
    }
}

/// Splits documents into sections according to a [`HeadingRule`].
#[derive(Debug, Clone, Default)]
pub struct SectionExtractor {
    rule: HeadingRule,
}

impl SectionExtractor {
    pub fn new(rule: HeadingRule) -> Result<Self, HeadingRuleError> {
        rule.validate()?;
        Ok(Self { rule })
    }

    pub fn rule(&self) -> &HeadingRule {
        &self.rule
    }

    /// Lazily iterate the sections of `doc`. Each call starts from the top.
    pub fn sections<'a>(&self, doc: &'a Document) -> Sections<'a> {
        Sections::new(self.rule.clone(), doc.lines())
    }

    pub fn extract<'a>(&self, doc: &'a Document) -> Vec<Section<'a>> {
        self.sections(doc).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_heading_counts_marker_runs() {
        let rule = HeadingRule::default();
        assert_eq!(rule.parse_heading("## Usage"), Some((2, "Usage")));
        assert_eq!(rule.parse_heading("#Tight"), Some((1, "Tight")));
        assert_eq!(rule.parse_heading("### Closed ###"), Some((3, "Closed")));
        assert_eq!(rule.parse_heading("###"), None);
        assert_eq!(rule.parse_heading(" # indented"), None);
        assert_eq!(rule.parse_heading("plain text"), None);
    }

    #[test]
    fn normalize_folds_case_and_whitespace() {
        let rule = HeadingRule::default();
        assert_eq!(rule.normalize("  Export   and Import  "), "export and import");
        let strict = HeadingRule::default().with_case_sensitive(true);
        assert_eq!(strict.normalize("Export  Tags"), "Export Tags");
    }

    #[test]
    fn custom_multi_char_marker() {
        let rule = HeadingRule::new("==");
        assert_eq!(rule.parse_heading("==== Title"), Some((2, "Title")));
        assert_eq!(rule.parse_heading("= Title"), None);
    }

    #[test]
    fn validate_rejects_bad_markers() {
        assert_eq!(HeadingRule::new("").validate(), Err(HeadingRuleError::EmptyMarker));
        assert!(matches!(
            HeadingRule::new("# ").validate(),
            Err(HeadingRuleError::WhitespaceInMarker(_))
        ));
    }

    #[test]
    fn normalize_body_collapses_and_trims() {
        let body: Vec<String> =
            ["", "call   foo()  ", "\tindented", "", ""].iter().map(|s| s.to_string()).collect();
        assert_eq!(normalize_body(&body), vec!["call foo()".to_string(), " indented".to_string()]);
    }

    #[test]
    fn fence_detection_requires_three_marks() {
        assert_eq!(fence_run("```raku"), Some(('`', 3)));
        assert_eq!(fence_run("~~~~"), Some(('~', 4)));
        assert_eq!(fence_run("``"), None);
        assert!(closes_fence("````", ('`', 3)));
        assert!(!closes_fence("```raku", ('`', 3)));
        assert!(!closes_fence("~~~", ('`', 3)));
    }

    #[test]
    fn label_marks_preamble_and_repeats() {
        assert_eq!(section_label("", 1), "(preamble)");
        assert_eq!(section_label("example", 2), "example (#2)");
    }
}
