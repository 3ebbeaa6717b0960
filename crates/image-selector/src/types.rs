//! Request and response types of the line protocol.
//!
//! Each request is one JSON object tagged by `command`; each response is one
//! JSON object with an `ok` flag, a human-readable `message` and optional
//! structured `data`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single tool call.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Request {
    /// Load a document, or switch to it if it is already open.
    Open { path: String },
    /// Status line per open document.
    Status,
    /// Rotate the active document clockwise by `delta` degrees.
    Rotate { delta: i32 },
    /// Fit the active document into the canvas.
    Fit {
        canvas_width: u32,
        canvas_height: u32,
    },
    /// Report the canvas scale and pan the UI uses for the active document.
    Viewport {
        scale: f64,
        #[serde(default)]
        pan_x: f64,
        #[serde(default)]
        pan_y: f64,
    },
    /// Record a drawn rectangle (display coordinates) on the active document.
    Record {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        mode: String,
    },
    /// Region list of the active document.
    Regions,
    /// Export all regions of all documents.
    Export,
    /// Names of exported files in the output directory.
    ListExported,
    WorkingDirectory,
}

/// Reply to one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub ok: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Response {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
            data: None,
        }
    }

    pub fn ok_with(message: impl Into<String>, data: Value) -> Self {
        Self {
            ok: true,
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn error(error: impl std::fmt::Display) -> Self {
        Self {
            ok: false,
            message: error.to_string(),
            data: None,
        }
    }

    /// Attach structured data to any response.
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_requests() {
        let req: Request = serde_json::from_str(r#"{"command":"open","path":"scan.pdf"}"#).unwrap();
        assert_eq!(
            req,
            Request::Open {
                path: "scan.pdf".to_string()
            }
        );

        let req: Request = serde_json::from_str(r#"{"command":"rotate","delta":-90}"#).unwrap();
        assert_eq!(req, Request::Rotate { delta: -90 });

        let req: Request =
            serde_json::from_str(r#"{"command":"viewport","scale":0.5}"#).unwrap();
        assert_eq!(
            req,
            Request::Viewport {
                scale: 0.5,
                pan_x: 0.0,
                pan_y: 0.0
            }
        );

        let req: Request = serde_json::from_str(
            r#"{"command":"record","x1":1,"y1":2,"x2":30.5,"y2":40,"mode":"text"}"#,
        )
        .unwrap();
        assert!(matches!(req, Request::Record { x2, .. } if x2 == 30.5));

        let req: Request = serde_json::from_str(r#"{"command":"list_exported"}"#).unwrap();
        assert_eq!(req, Request::ListExported);
    }

    #[test]
    fn test_parse_rejects_unknown_command() {
        assert!(serde_json::from_str::<Request>(r#"{"command":"delete"}"#).is_err());
        assert!(serde_json::from_str::<Request>(r#"{"command":"open"}"#).is_err());
    }

    #[test]
    fn test_response_json() {
        let json = serde_json::to_string(&Response::ok("fertig")).unwrap();
        assert_eq!(json, r#"{"ok":true,"message":"fertig"}"#);

        let response = Response::error("kaputt").with_data(Value::from(3));
        let json = serde_json::to_value(response).unwrap();
        assert_eq!(json["ok"], false);
        assert_eq!(json["data"], 3);
    }
}
