use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use guide_sync_core::config::{load_check_config, CheckConfig, GuideLayout};
use guide_sync_core::report::{default_renderer_registry, Report};
use guide_sync_core::sections::{HeadingRule, SectionExtractor};

use crate::canonicalize_or_current;

/// Build the layout for `root`, honoring an explicit config path when given.
pub fn resolve_layout(root: &str, config: Option<&str>) -> Result<GuideLayout> {
    let root_path = canonicalize_or_current(root)?;
    let layout = GuideLayout::new(&root_path);
    Ok(match config {
        Some(path) => {
            let path = Path::new(path);
            let config_path =
                if path.is_absolute() { path.to_path_buf() } else { root_path.join(path) };
            layout.with_config_path(config_path)
        }
        None => layout,
    })
}

/// Load and validate the check config for a layout.
pub fn load_config(layout: &GuideLayout) -> Result<CheckConfig> {
    let config = load_check_config(layout)?;
    config.validate().with_context(|| {
        format!("Invalid check config at {}", layout.config_path.display())
    })?;
    tracing::debug!(
        config = %layout.config_path.display(),
        documents = config.documents.len(),
        groups = config.groups.len(),
        "loaded check config"
    );
    Ok(config)
}

/// Section extractor configured from CLI flags.
pub fn extractor_from_flags(
    marker: &str,
    case_sensitive: bool,
    no_skip_fences: bool,
) -> Result<SectionExtractor> {
    let rule = HeadingRule::new(marker)
        .with_case_sensitive(case_sensitive)
        .with_skip_code_fences(!no_skip_fences);
    SectionExtractor::new(rule).context("Invalid --marker")
}

/// Render `report` in `format`, print it, and return its status code.
pub fn emit_report(report: &Report, format: &str) -> Result<i32> {
    let rendered = default_renderer_registry().render(format, report)?;
    print!("{rendered}");
    if !rendered.ends_with('\n') {
        println!();
    }
    // The caller may exit the process right after; nothing is flushed on exit.
    std::io::stdout().flush().context("Failed to flush report to stdout")?;
    Ok(report.status_code())
}
