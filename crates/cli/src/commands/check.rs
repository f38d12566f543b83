use anyhow::{Context, Result};
use guide_sync_core::services::CheckRunner;

use crate::commands::{emit_report, load_config, resolve_layout};

/// Run the configured consistency check and print the report.
///
/// Returns the report's status code: 0 when every group is consistent, 1 otherwise.
pub fn check_command(root: &str, config: Option<&str>, format: &str) -> Result<i32> {
    let layout = resolve_layout(root, config)?;
    let config = load_config(&layout)?;

    let report = CheckRunner::new(&config, &layout)
        .run()
        .with_context(|| format!("Check failed for {}", layout.config_path.display()))?;

    emit_report(&report, format)
}
