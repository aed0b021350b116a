//! Error types for mouseinfo-core.

use thiserror::Error;

/// A capture could not produce an image.
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("screen capture unavailable: {0}")]
    Unavailable(String),

    #[error("{program} failed: {detail}")]
    Helper { program: &'static str, detail: String },

    #[error("screen capture failed: {0}")]
    Native(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

#[derive(Error, Debug)]
#[error("{0}")]
pub struct ClipboardError(pub String);

/// Manual origin text that does not read as "X, Y".
#[derive(Error, Debug, PartialEq, Eq)]
pub enum OriginParseError {
    #[error("expected two comma-separated values")]
    Shape,

    #[error("{0:?} is not a non-negative integer")]
    Component(String),
}

/// Raised only while choosing a probe; aborts the process.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("no display available: {reason}\n{remediation}")]
    DisplayUnavailable { reason: String, remediation: &'static str },
}
