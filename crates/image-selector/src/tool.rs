//! The `SelectorTool` facade: one session plus its exporter.

use std::fs;
use std::path::Path;

use image_selector_core::{
    Capabilities, Config, DisplayRect, ExportManifest, Exporter, Region, RegionMode, Result,
    Rotation, Session, Viewport,
};
use serde_json::json;

use crate::summary::export_summary;
use crate::types::{Request, Response};

/// Outward interface used by the host tool layer and the standalone binary.
pub struct SelectorTool {
    session: Session,
    exporter: Exporter,
}

impl SelectorTool {
    /// Tool rooted at `config.working_dir`, which is created if missing.
    pub fn new(config: Config, capabilities: Capabilities) -> Result<Self> {
        fs::create_dir_all(&config.working_dir)?;
        let Capabilities { pdf, ocr } = capabilities;
        let exporter = Exporter::new(&config, ocr);
        let session = Session::new(config, pdf);
        Ok(Self { session, exporter })
    }

    /// Configuration from the environment, providers probed once.
    pub fn from_env() -> Result<Self> {
        Self::new(Config::from_env(), Capabilities::detect())
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn working_directory(&self) -> &Path {
        &self.session.config().working_dir
    }

    /// Load `path` or switch to it; returns the new status list.
    pub fn open_or_switch(&mut self, path: &str) -> Result<Vec<String>> {
        self.session.add_document(path)?;
        Ok(self.current_status_list())
    }

    pub fn current_status_list(&self) -> Vec<String> {
        self.session.status_list()
    }

    pub fn rotate_active(&mut self, delta: i32) -> Result<Rotation> {
        self.session.rotate_active(delta)
    }

    pub fn fit_active(&mut self, canvas_width: u32, canvas_height: u32) -> Result<Viewport> {
        self.session.fit_active(canvas_width, canvas_height)
    }

    pub fn set_viewport(&mut self, viewport: Viewport) -> Result<()> {
        self.session.set_viewport(viewport)
    }

    pub fn record_region(
        &mut self,
        display_rect: DisplayRect,
        mode: RegionMode,
    ) -> Result<Region> {
        self.session.record_region(display_rect, mode)
    }

    /// Export every recorded region of every document.
    ///
    /// Regions that failed stay unexported.
    pub fn export_all(&mut self) -> Result<ExportManifest> {
        let manifest = self.exporter.export(&self.session)?;
        self.session.mark_exported(&manifest);
        Ok(manifest)
    }

    /// True if some recorded regions have not been exported yet.
    pub fn has_unexported_regions(&self) -> bool {
        self.session.is_dirty()
    }

    /// Sorted `.png` and `.txt` file names in the output directory.
    pub fn list_exported_files(&self) -> Result<Vec<String>> {
        let dir = self.exporter.output_dir();
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(dir)? {
            let name = entry?.file_name().to_string_lossy().into_owned();
            if name.ends_with(".png") || name.ends_with(".txt") {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    /// Run one request and describe the outcome.
    pub fn handle(&mut self, request: Request) -> Response {
        match self.dispatch(request) {
            Ok(response) => response,
            Err(e) => {
                log::warn!("Request failed: {}", e);
                Response::error(e)
            }
        }
    }

    fn dispatch(&mut self, request: Request) -> Result<Response> {
        let response = match request {
            Request::Open { path } => {
                let status = self.open_or_switch(&path)?;
                let active = self
                    .session
                    .active()
                    .map(|d| d.display_name())
                    .unwrap_or_default();
                Response::ok_with(format!("Aktiv: {}", active), json!(status))
            }
            Request::Status => {
                let status = self.current_status_list();
                Response::ok_with(status.join("\n"), json!(status))
            }
            Request::Rotate { delta } => {
                let rotation = self.rotate_active(delta)?;
                Response::ok_with(
                    format!("Bild auf {}° gedreht", rotation.degrees()),
                    json!({ "rotation": rotation }),
                )
            }
            Request::Fit {
                canvas_width,
                canvas_height,
            } => {
                let viewport = self.fit_active(canvas_width, canvas_height)?;
                Response::ok_with(
                    format!("Skalierung {:.3}", viewport.scale),
                    json!(viewport),
                )
            }
            Request::Viewport {
                scale,
                pan_x,
                pan_y,
            } => {
                self.set_viewport(Viewport {
                    scale,
                    pan_x,
                    pan_y,
                })?;
                Response::ok(format!("Skalierung {:.3}", scale))
            }
            Request::Record {
                x1,
                y1,
                x2,
                y2,
                mode,
            } => {
                let mode: RegionMode = mode.parse()?;
                let region = self.record_region(DisplayRect::new(x1, y1, x2, y2), mode)?;
                let number = self.session.active().map_or(0, |d| d.regions().len());
                Response::ok_with(
                    format!("✓ Bereich {} gespeichert ({})", number, mode),
                    json!(region),
                )
            }
            Request::Regions => {
                let labels = self
                    .session
                    .active()
                    .map(|d| d.region_labels())
                    .unwrap_or_default();
                Response::ok_with(labels.join("\n"), json!(labels))
            }
            Request::Export => {
                let manifest = self.export_all()?;
                let summary = export_summary(&manifest);
                match manifest.failure_error() {
                    Some(e) => {
                        log::warn!("{}", e);
                        Response::error(summary).with_data(json!(manifest))
                    }
                    None => Response::ok_with(summary, json!(manifest)),
                }
            }
            Request::ListExported => {
                let files = self.list_exported_files()?;
                let message = if files.is_empty() {
                    "Keine exportierten Dateien gefunden".to_string()
                } else {
                    files.join("\n")
                };
                Response::ok_with(message, json!(files))
            }
            Request::WorkingDirectory => {
                let dir = self.working_directory().display().to_string();
                let data = json!({
                    "working_dir": dir,
                    "pdf": self.session.loader().supports_pdf(),
                    "ocr": self.exporter.supports_ocr(),
                });
                Response::ok_with(dir, data)
            }
        };
        Ok(response)
    }
}
