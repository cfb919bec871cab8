//! Shared reporting for filter and apply

use crate::console::CliConsole;
use anyhow::Context;
use std::path::Path;
use tablon_core::{FilterOutcome, FilterSession};

/// Print an outcome and, on success, write the archive to `output`.
///
/// Returns whether the predicate applied.
pub async fn report(
    console: &CliConsole,
    session: &FilterSession,
    outcome: &FilterOutcome,
    output: &Path,
) -> anyhow::Result<bool> {
    console.print_predicate(outcome.predicate());

    let filtered = match outcome.result() {
        Ok(filtered) => filtered,
        Err(fault) => {
            console.print_fault(outcome.predicate(), fault);
            return Ok(false);
        }
    };

    console.print_counts(outcome.total_rows(), filtered.row_count());
    console.print_preview("Filtered", filtered.table());

    let archive = session.export(filtered)?;
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Creating {}", parent.display()))?;
    }
    tokio::fs::write(output, &archive)
        .await
        .with_context(|| format!("Writing {}", output.display()))?;
    console.success(&format!(
        "Wrote {} ({} inside, {} bytes)",
        output.display(),
        session.export_entry_name(),
        archive.len()
    ));
    Ok(true)
}
