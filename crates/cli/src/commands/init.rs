use std::fs;

use anyhow::{anyhow, Context, Result};
use guide_sync_core::config::{
    discover_markdown, render_check_config, CheckConfig, DocumentEntry, GuideLayout,
};

use crate::{canonicalize_or_current, infer_project_name};

/// Scaffold `.guide-sync/config.yaml` listing every Markdown file in `root`.
///
/// All discovered files are placed in a single group named `group`.
pub fn init_command(root: &str, group: &str, force: bool) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let layout = GuideLayout::new(&root_path);

    if layout.config_path.exists() && !force {
        return Err(anyhow!(
            "Check config already exists at {} (use --force to overwrite)",
            layout.config_path.display()
        ));
    }

    let markdown = discover_markdown(&layout.root)?;
    let mut config = CheckConfig::new(infer_project_name(&layout.root));
    let mut members = Vec::new();
    for path in &markdown {
        let rel = layout.relative_string(path);
        members.push(rel.clone());
        config = config.with_document(DocumentEntry::new(rel));
    }
    config = config.with_group(group, members);

    fs::create_dir_all(&layout.meta_dir)
        .with_context(|| format!("Failed to create meta dir: {}", layout.meta_dir.display()))?;
    let body = render_check_config(&config, &layout.config_path)?;
    fs::write(&layout.config_path, body).with_context(|| {
        format!("Failed to write check config: {}", layout.config_path.display())
    })?;

    println!("Initialized guide-sync config:");
    println!("  Root: {}", layout.root.display());
    println!("  Config: {}", layout.config_path.display());
    println!("  Group: {} ({} document(s))", group, markdown.len());
    for path in &markdown {
        println!("    - {}", layout.relative_string(path));
    }
    if markdown.len() < 2 {
        println!("  Note: a group needs at least two documents before it can be checked.");
    }

    Ok(())
}
