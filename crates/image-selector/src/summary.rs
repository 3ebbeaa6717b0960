//! Human-readable messages for the operator.

use std::path::Path;

use image_selector_core::{ExportManifest, RegionMode};

/// Message when an export finds nothing to write.
pub const NOTHING_TO_EXPORT: &str = "Keine Bereiche zum Exportieren ausgewählt";

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Export summary listing every written file, then failures and warnings.
pub fn export_summary(manifest: &ExportManifest) -> String {
    if manifest.exported.is_empty() && manifest.failures.is_empty() {
        return NOTHING_TO_EXPORT.to_string();
    }

    let mut out = String::new();
    if !manifest.exported.is_empty() {
        out.push_str(&format!(
            "✓ Erfolgreich {} Bereiche von {} Bild(ern) exportiert:\n\n",
            manifest.exported.len(),
            manifest.document_count
        ));
    }

    for region in &manifest.exported {
        match (&region.mode, &region.text_file) {
            (RegionMode::Text, Some(text_file)) => {
                out.push_str(&format!("  Region {} (TEXT):\n", region.index));
                out.push_str(&format!("    - Bild: {}\n", file_name(&region.image_file)));
                out.push_str(&format!("    - Text: {}\n", file_name(text_file)));
            }
            _ => out.push_str(&format!(
                "  Region {} (FOTO): {}\n",
                region.index,
                file_name(&region.image_file)
            )),
        }
    }

    if !manifest.failures.is_empty() {
        out.push_str(&format!(
            "\n✗ {} Bereich(e) fehlgeschlagen:\n",
            manifest.failures.len()
        ));
        for failure in &manifest.failures {
            out.push_str(&format!(
                "  Region {} von {}: {}\n",
                failure.index,
                file_name(&failure.document),
                failure.error
            ));
        }
    }

    for warning in &manifest.warnings {
        out.push_str(&format!("\nHinweis: {}", warning));
    }
    if !manifest.warnings.is_empty() {
        out.push('\n');
    }

    out.push_str(&format!(
        "\nAusgabeverzeichnis: {}",
        manifest.output_dir.display()
    ));
    out
}
