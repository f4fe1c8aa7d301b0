use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::config::RasterizerSettings;
use crate::constants::PDF_PAGE_PATTERN;
use crate::error::{Result, SlideError};

#[cfg(windows)]
pub const TOOL_NAME: &str = "mutool.exe";
#[cfg(not(windows))]
pub const TOOL_NAME: &str = "mutool";

#[cfg(windows)]
const FALLBACK_PATHS: &[&str] = &[
    r"C:\Program Files\MuPDF\mutool.exe",
    r"C:\MuPDF\mutool.exe",
    r"C:\Program Files (x86)\MuPDF\mutool.exe",
];
#[cfg(not(windows))]
const FALLBACK_PATHS: &[&str] = &["/opt/homebrew/bin/mutool", "/usr/local/bin/mutool", "/usr/bin/mutool"];

/// Finds the PDF rasterizer: configured path, bundled copy, PATH, then
/// well-known install locations, in that order.
#[derive(Debug, Clone)]
pub struct ToolLocator {
    custom: Option<PathBuf>,
    bundled: PathBuf,
    search_path: Option<OsString>,
    fallbacks: Vec<PathBuf>,
}

impl ToolLocator {
    pub fn from_settings(settings: &RasterizerSettings) -> Self {
        Self {
            custom: settings.custom_path.clone(),
            bundled: settings.bundled_path.clone(),
            search_path: std::env::var_os("PATH"),
            fallbacks: FALLBACK_PATHS.iter().map(PathBuf::from).collect(),
        }
    }

    pub fn with_search_path(mut self, search_path: Option<OsString>) -> Self {
        self.search_path = search_path;
        self
    }

    pub fn with_fallbacks(mut self, fallbacks: Vec<PathBuf>) -> Self {
        self.fallbacks = fallbacks;
        self
    }

    pub fn locate(&self) -> Result<PathBuf> {
        let mut searched = Vec::new();

        // 1. Explicitly configured
        if let Some(custom) = &self.custom {
            if custom.is_file() {
                tracing::info!(path = %custom.display(), "using configured rasterizer");
                return Ok(custom.clone());
            }
            searched.push(custom.clone());
        }

        // 2. Shipped alongside the project
        if self.bundled.is_file() {
            tracing::info!(path = %self.bundled.display(), "using bundled rasterizer");
            return Ok(self.bundled.clone());
        }
        searched.push(self.bundled.clone());

        // 3. PATH lookup
        if let Some(search_path) = &self.search_path {
            for dir in std::env::split_paths(search_path) {
                let candidate = dir.join(TOOL_NAME);
                if candidate.is_file() {
                    tracing::info!(path = %candidate.display(), "found rasterizer on PATH");
                    return Ok(candidate);
                }
            }
        }

        // 4. Common install locations
        for candidate in &self.fallbacks {
            if candidate.is_file() {
                tracing::info!(path = %candidate.display(), "found rasterizer in install location");
                return Ok(candidate.clone());
            }
            searched.push(candidate.clone());
        }

        Err(SlideError::ToolNotFound { searched })
    }
}

/// Wraps one invocation style of the rasterizer:
/// `<tool> convert -o <dir>/slide_%d.png <pdf>`.
pub struct Rasterizer {
    tool: PathBuf,
}

impl Rasterizer {
    pub fn new(tool: PathBuf) -> Self {
        Self { tool }
    }

    /// Convert every page of `pdf` into `output_dir`. Blocks until the tool
    /// exits.
    ///
    /// Pages are written to a staging folder next to `output_dir` and only
    /// replace its contents when the tool succeeds, so a failed run leaves
    /// the previous document's pages untouched.
    pub fn convert(&self, pdf: &Path, output_dir: &Path) -> Result<()> {
        let staging = staging_dir(output_dir);
        prepare_dir(&staging)?;

        let pattern = staging.join(PDF_PAGE_PATTERN);
        tracing::info!(pdf = %pdf.display(), output = %output_dir.display(), "converting PDF");

        let output = match Command::new(&self.tool)
            .arg("convert")
            .arg("-o")
            .arg(&pattern)
            .arg(pdf)
            .stdin(Stdio::null())
            .output()
        {
            Ok(output) => output,
            Err(e) => {
                discard_dir(&staging);
                return Err(SlideError::io(&self.tool, e));
            }
        };

        if !output.status.success() {
            discard_dir(&staging);
            return Err(SlideError::ConversionFailed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            tracing::debug!(stdout = %stdout.trim(), "rasterizer output");
        }

        // Stale pages from a previous document must never mix with the new ones
        if output_dir.exists() {
            std::fs::remove_dir_all(output_dir).map_err(|e| SlideError::io(output_dir, e))?;
        }
        std::fs::rename(&staging, output_dir).map_err(|e| SlideError::io(output_dir, e))?;
        tracing::info!("PDF converted");
        Ok(())
    }
}

fn staging_dir(output_dir: &Path) -> PathBuf {
    let mut name = output_dir.file_name().map(OsString::from).unwrap_or_default();
    name.push(".staging");
    output_dir.with_file_name(name)
}

fn prepare_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        std::fs::remove_dir_all(dir).map_err(|e| SlideError::io(dir, e))?;
    }
    std::fs::create_dir_all(dir).map_err(|e| SlideError::io(dir, e))
}

fn discard_dir(dir: &Path) {
    if let Err(e) = std::fs::remove_dir_all(dir) {
        tracing::warn!(dir = %dir.display(), "could not remove staging folder: {e}");
    }
}
