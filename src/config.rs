use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::noise::NoiseLevel;

/// Everything the presenter reads from its JSON configuration file.
/// Every section falls back to defaults, so `{}` is a valid file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub presentation: PresentationSettings,
    pub rasterizer: RasterizerSettings,
    pub controls: ControlSettings,
    pub environment: EnvironmentSettings,
    pub session_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            presentation: PresentationSettings::default(),
            rasterizer: RasterizerSettings::default(),
            controls: ControlSettings::default(),
            environment: EnvironmentSettings::default(),
            session_path: PathBuf::from(".slide-presenter").join("session.json"),
        }
    }
}

impl Config {
    /// Load from `path`, or defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationSettings {
    pub fade_secs: f32,
    pub dim_level: f32,
    pub settle_delay_secs: f32,
    /// Keep the mouse pointer captured while presenting.
    pub capture_pointer: bool,
}

impl Default for PresentationSettings {
    fn default() -> Self {
        Self {
            fade_secs: FADE_DURATION,
            dim_level: DIM_LEVEL,
            settle_delay_secs: SETTLE_DELAY,
            capture_pointer: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterizerSettings {
    pub custom_path: Option<PathBuf>,
    pub bundled_path: PathBuf,
    /// Defaults to `<temp dir>/pdf_slides`.
    pub output_dir: Option<PathBuf>,
}

impl Default for RasterizerSettings {
    fn default() -> Self {
        Self {
            custom_path: None,
            bundled_path: PathBuf::from("tools").join("mupdf").join(crate::rasterizer::TOOL_NAME),
            output_dir: None,
        }
    }
}

impl RasterizerSettings {
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(PDF_OUTPUT_DIR_NAME))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlSettings {
    pub keys: KeyBindings,
    pub gamepad: GamepadBindings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub next: String,
    pub previous: String,
    pub open_source: String,
    pub start_timer: String,
    pub pause_timer: String,
    pub reset_timer: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            next: "RIGHT".into(),
            previous: "LEFT".into(),
            open_source: "ENTER".into(),
            start_timer: "T".into(),
            pause_timer: "P".into(),
            reset_timer: "R".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GamepadBindings {
    pub next: String,
    pub previous: String,
    pub open_source: String,
}

impl Default for GamepadBindings {
    fn default() -> Self {
        // A / X / B on an Xbox-style layout
        Self {
            next: "RIGHT_FACE_DOWN".into(),
            previous: "RIGHT_FACE_LEFT".into(),
            open_source: "RIGHT_FACE_RIGHT".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentSettings {
    pub noise_level: NoiseLevel,
    pub sounds: SoundFiles,
    pub cough_interval_secs: f32,
    pub phone_interval_secs: f32,
}

impl Default for EnvironmentSettings {
    fn default() -> Self {
        Self {
            noise_level: NoiseLevel::None,
            sounds: SoundFiles::default(),
            cough_interval_secs: COUGH_INTERVAL,
            phone_interval_secs: PHONE_INTERVAL,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundFiles {
    pub background: Option<PathBuf>,
    pub cough: Option<PathBuf>,
    pub environment: Option<PathBuf>,
    pub phone: Option<PathBuf>,
    pub people_talking: Option<PathBuf>,
}
