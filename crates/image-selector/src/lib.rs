//! Image Selector - tool layer
//!
//! This crate exposes the region-selection engine in `image-selector-core` to
//! a host automation layer and to the standalone `image-selector` binary.
//!
//! # Module Structure
//!
//! - `tool` - `SelectorTool`, the session-level query interface
//! - `types` - serde request/response types of the JSON line protocol
//! - `summary` - German operator messages for export results
//!
//! # Protocol
//!
//! ```text
//! {"command":"open","path":"scan.pdf"}
//! {"command":"fit","canvas_width":1000,"canvas_height":700}
//! {"command":"record","x1":10,"y1":10,"x2":300,"y2":120,"mode":"text"}
//! {"command":"export"}
//! ```

mod summary;
mod tool;
mod types;

pub use summary::{export_summary, NOTHING_TO_EXPORT};
pub use tool::SelectorTool;
pub use types::{Request, Response};

/// Parse and run one protocol line.
///
/// Malformed input yields an error response; it never panics.
pub fn handle_line(tool: &mut SelectorTool, line: &str) -> Response {
    match serde_json::from_str::<Request>(line) {
        Ok(request) => tool.handle(request),
        Err(e) => Response::error(format!("Ungültige Anfrage: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use image_selector_core::{Capabilities, Config, DisplayRect, RegionMode, SelectorError};

    use super::*;

    fn write_png(dir: &Path, name: &str, width: u32, height: u32) {
        let img = image::RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 0])
        });
        img.save(dir.join(name)).unwrap();
    }

    fn tool(dir: &Path) -> SelectorTool {
        SelectorTool::new(Config::new(dir), Capabilities::none()).unwrap()
    }

    #[test]
    fn test_full_workflow_two_documents() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "doc1.png", 200, 100);
        write_png(dir.path(), "doc2.jpg", 120, 80);
        let mut tool = tool(dir.path());

        tool.open_or_switch("doc1.png").unwrap();
        tool.record_region(DisplayRect::new(10.0, 10.0, 60.0, 40.0), RegionMode::Photo)
            .unwrap();
        let status = tool.open_or_switch("doc2.jpg").unwrap();
        assert_eq!(status, vec!["  doc1.png [1 Bereiche]", "▶ doc2.jpg [0 Bereiche]"]);
        tool.record_region(DisplayRect::new(0.0, 0.0, 50.0, 20.0), RegionMode::Text)
            .unwrap();

        assert!(tool.has_unexported_regions());
        let manifest = tool.export_all().unwrap();
        assert!(!tool.has_unexported_regions());
        assert_eq!(manifest.document_count, 2);
        assert_eq!(manifest.exported.len(), 2);
        assert_eq!(manifest.file_count(), 3);
        assert!(manifest.is_complete());

        let files = tool.list_exported_files().unwrap();
        assert_eq!(files.len(), 3);
        assert!(files[0].starts_with("doc1_") && files[0].ends_with("_region01_foto.png"));
        assert!(files[1].starts_with("doc2_") && files[1].ends_with("_region01_text.png"));
        assert!(files[2].ends_with("_region01_text.txt"));
    }

    #[test]
    fn test_working_directory_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested/work");
        let tool = tool(&root);
        assert_eq!(tool.working_directory(), root.as_path());
        assert!(root.is_dir());
        assert!(tool.list_exported_files().unwrap().is_empty());
    }

    #[test]
    fn test_open_unknown_format_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), "hi").unwrap();
        let mut tool = tool(dir.path());

        let result = tool.open_or_switch("notes.txt");
        assert!(matches!(result, Err(SelectorError::UnsupportedFormat(_))));
        assert!(tool.current_status_list().is_empty());
    }

    #[test]
    fn test_handle_line_protocol() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "page.png", 400, 300);
        let mut tool = tool(dir.path());

        let response = handle_line(&mut tool, r#"{"command":"open","path":"page.png"}"#);
        assert!(response.ok, "{}", response.message);
        assert_eq!(response.message, "Aktiv: page.png");

        let response = handle_line(
            &mut tool,
            r#"{"command":"fit","canvas_width":200,"canvas_height":200}"#,
        );
        assert!(response.ok);
        assert_eq!(response.data.unwrap()["scale"], 0.5);

        // Display (10,10)-(60,35) at scale 0.5 is source (20,20)-(120,70)
        let response = handle_line(
            &mut tool,
            r#"{"command":"record","x1":10,"y1":10,"x2":60,"y2":35,"mode":"text"}"#,
        );
        assert!(response.ok);
        assert_eq!(response.message, "✓ Bereich 1 gespeichert (text)");
        let rect = &response.data.unwrap()["rect"];
        assert_eq!(rect["x_min"], 20);
        assert_eq!(rect["y_max"], 70);

        let response = handle_line(&mut tool, r#"{"command":"regions"}"#);
        assert_eq!(response.message, "1. TEXT (100x50)");

        let response = handle_line(&mut tool, r#"{"command":"export"}"#);
        assert!(response.ok);
        assert!(response
            .message
            .starts_with("✓ Erfolgreich 1 Bereiche von 1 Bild(ern) exportiert:"));
        assert!(response.message.contains("    - Text: page_"));
        let data = response.data.unwrap();
        assert_eq!(data["warnings"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_handle_line_errors() {
        let dir = tempfile::tempdir().unwrap();
        let mut tool = tool(dir.path());

        let response = handle_line(&mut tool, "not json");
        assert!(!response.ok);
        assert!(response.message.starts_with("Ungültige Anfrage"));

        let response = handle_line(&mut tool, r#"{"command":"rotate","delta":90}"#);
        assert!(!response.ok);
        assert_eq!(response.message, "No active document");

        let response = handle_line(
            &mut tool,
            r#"{"command":"record","x1":0,"y1":0,"x2":5,"y2":5,"mode":"table"}"#,
        );
        assert!(!response.ok);
        assert!(response.message.starts_with("Invalid region"));

        let response = handle_line(&mut tool, r#"{"command":"export"}"#);
        assert!(response.ok);
        assert_eq!(response.message, NOTHING_TO_EXPORT);
    }

    #[test]
    fn test_rotate_and_working_directory_commands() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "page.png", 40, 20);
        let mut tool = tool(dir.path());
        handle_line(&mut tool, r#"{"command":"open","path":"page.png"}"#);

        let response = handle_line(&mut tool, r#"{"command":"rotate","delta":-90}"#);
        assert!(response.ok);
        assert_eq!(response.data.unwrap()["rotation"], 270);

        let response = handle_line(&mut tool, r#"{"command":"rotate","delta":45}"#);
        assert!(!response.ok);
        assert_eq!(response.message, "Invalid rotation: 45 degrees");

        let response = handle_line(&mut tool, r#"{"command":"working_directory"}"#);
        assert_eq!(response.message, dir.path().display().to_string());
        let data = response.data.unwrap();
        assert_eq!(data["pdf"], false);
        assert_eq!(data["ocr"], false);
    }
}
