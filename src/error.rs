use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Failures of a single slide load attempt.
///
/// None of these are fatal to the application: the presenter keeps whatever
/// deck it had before the attempt, except for `NoImagesFound`, which is only
/// ever reported as a warning after the deck has been emptied.
#[derive(Debug, Error)]
pub enum SlideError {
    #[error("unsupported slide source: {0:?} (expected a .pdf file or a folder of images)")]
    UnsupportedSource(PathBuf),

    #[error(
        "PDF rasterizer not found (searched {searched:?}); set rasterizer.custom_path, \
         place the tool at the bundled path, or install MuPDF on PATH"
    )]
    ToolNotFound { searched: Vec<PathBuf> },

    #[error("PDF conversion failed ({status}): {stderr}")]
    ConversionFailed { status: ExitStatus, stderr: String },

    #[error("no slide images found in {0:?}")]
    NoImagesFound(PathBuf),

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SlideError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SlideError::Io { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, SlideError>;
