//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Stamp
//!
//! ```text
//! ana_lpez_ana@x.com.jpg
//!     Saved: out/ana_lpez_ana@x.com.jpg
//!     Watermark: black
//!     Size: 4032x3024, 1843211 bytes
//! ```
//!
//! ## Failure
//!
//! ```text
//! There was an error processing your image. Please try again.
//!     Cause: Input error: could not decode photo: ...
//! ```
//!
//! Each output has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout or stderr.
//! Format functions are pure: no I/O, no side effects.

use crate::pipeline::{OutputArtifact, PipelineError};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Summary of a written artifact, also emitted as JSON with `--json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StampReport {
    pub filename: String,
    pub path: PathBuf,
    pub variant: String,
    pub width: u32,
    pub height: u32,
    pub bytes: usize,
}

impl StampReport {
    pub fn new(artifact: &OutputArtifact, path: &Path) -> Self {
        Self {
            filename: artifact.filename.clone(),
            path: path.to_path_buf(),
            variant: artifact.variant.to_string(),
            width: artifact.width,
            height: artifact.height,
            bytes: artifact.bytes.len(),
        }
    }
}

pub fn format_stamp_output(report: &StampReport) -> Vec<String> {
    vec![
        report.filename.clone(),
        format!("    Saved: {}", report.path.display()),
        format!("    Watermark: {}", report.variant),
        format!(
            "    Size: {}x{}, {} bytes",
            report.width, report.height, report.bytes
        ),
    ]
}

pub fn print_stamp_output(report: &StampReport) {
    for line in format_stamp_output(report) {
        println!("{}", line);
    }
}

/// The single user-facing notice, followed by the underlying cause.
pub fn format_failure(err: &PipelineError) -> Vec<String> {
    vec![
        err.user_message().to_string(),
        format!("    Cause: {}", err),
    ]
}

pub fn print_failure(err: &PipelineError) {
    for line in format_failure(err) {
        eprintln!("{}", line);
    }
}
