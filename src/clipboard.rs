//! Clipboard integration.

use crate::error::Result;
use crate::export::ExportSummary;
use arboard::Clipboard;

/// Copy text to the system clipboard.
pub fn copy_text(text: &str) -> Result<()> {
    Clipboard::new()?.set_text(text)?;
    tracing::debug!("Copied {} bytes to clipboard", text.len());
    Ok(())
}

/// Copy the paths an export wrote, one per line.
pub fn copy_export_paths(summary: &ExportSummary) -> Result<()> {
    copy_text(&export_paths_text(summary))
}

fn export_paths_text(summary: &ExportSummary) -> String {
    summary
        .paths()
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
