//! Rendering of lookup outcomes for the command line.

use serde::Serialize;

use crate::error::{ErrorKind, ImageSizeError};
use crate::size::SizeResult;

/// Outcome of sizing one input, labelled with where it came from.
#[derive(Debug)]
pub struct Report {
    pub source: String,
    pub outcome: Result<SizeResult, ImageSizeError>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    path: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<&'a SizeResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonError>,
}

#[derive(Serialize)]
struct JsonError {
    kind: &'static str,
    message: String,
}

fn kind_name(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::EmptyInput => "empty_input",
        ErrorKind::InvalidInvocation => "invalid_invocation",
        ErrorKind::UnsupportedFormat => "unsupported_format",
        ErrorKind::DisabledFormat => "disabled_format",
        ErrorKind::Io => "io",
    }
}

impl Report {
    pub fn new(source: impl Into<String>, outcome: Result<SizeResult, ImageSizeError>) -> Self {
        Self {
            source: source.into(),
            outcome,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    /// One human-readable line, e.g. `cat.jpg: 640x480 (jpg, orientation 6)`.
    pub fn to_line(&self) -> String {
        match &self.outcome {
            Ok(result) => {
                let mut details = vec![result.format.to_string()];
                if let Some(orientation) = result.orientation {
                    details.push(format!("orientation {}", orientation));
                }
                if !result.images.is_empty() {
                    let sizes: Vec<String> = result
                        .images
                        .iter()
                        .map(|d| format!("{}x{}", d.width, d.height))
                        .collect();
                    details.push(format!("images {}", sizes.join(" ")));
                }
                format!(
                    "{}: {}x{} ({})",
                    self.source,
                    result.width,
                    result.height,
                    details.join(", ")
                )
            }
            Err(e) => format!("{}: error: {}", self.source, e),
        }
    }

    fn to_json(&self) -> JsonReport<'_> {
        let (result, error) = match &self.outcome {
            Ok(result) => (Some(result), None),
            Err(e) => (
                None,
                Some(JsonError {
                    kind: kind_name(e.kind()),
                    message: e.to_string(),
                }),
            ),
        };
        JsonReport {
            path: &self.source,
            result,
            error,
        }
    }
}

/// Serialize every report as one pretty-printed JSON array.
pub fn reports_to_json(reports: &[Report]) -> serde_json::Result<String> {
    let entries: Vec<JsonReport<'_>> = reports.iter().map(Report::to_json).collect();
    serde_json::to_string_pretty(&entries)
}
