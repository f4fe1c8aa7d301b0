use std::path::{Path, PathBuf};

use crate::error::{Result, SlideError};

/// Where a slide deck comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlideSource {
    Pdf(PathBuf),
    Folder(PathBuf),
}

impl SlideSource {
    /// Route a user-selected path to PDF conversion or folder loading.
    pub fn resolve(path: &Path) -> Result<Self> {
        if path.is_file() && is_pdf(path) {
            Ok(SlideSource::Pdf(path.to_path_buf()))
        } else if path.is_dir() {
            Ok(SlideSource::Folder(path.to_path_buf()))
        } else {
            Err(SlideError::UnsupportedSource(path.to_path_buf()))
        }
    }
}

pub fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}
