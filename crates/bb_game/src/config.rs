use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use bb_core::scene::{Bounds, SceneState};
use bb_platform::window::PlatformConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Startup settings. Every field has a default, so an absent `bounce.json`
/// (or one that sets only a few keys) is fine.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct BounceConfig {
    pub window: WindowSection,
    pub assets: AssetSection,
    pub label: LabelSection,
    pub motion: MotionSection,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct WindowSection {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AssetSection {
    pub top: PathBuf,
    pub bottom: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LabelSection {
    pub text: String,
    pub size: f32,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MotionSection {
    pub start_x: i32,
    pub start_y: i32,
    pub dx: i32,
    pub dy: i32,
    pub tick_ms: u64,
}

impl Default for WindowSection {
    fn default() -> Self {
        let platform = PlatformConfig::default();
        Self {
            title: platform.title,
            width: platform.width,
            height: platform.height,
        }
    }
}

impl Default for AssetSection {
    fn default() -> Self {
        Self {
            top: PathBuf::from("image").join("top_buns.png"),
            bottom: PathBuf::from("image").join("bottom_buns.png"),
        }
    }
}

impl Default for LabelSection {
    fn default() -> Self {
        Self {
            text: "loenora romero".to_string(),
            size: 16.0,
        }
    }
}

impl Default for MotionSection {
    fn default() -> Self {
        Self {
            start_x: 200,
            start_y: 200,
            dx: 5,
            dy: 4,
            tick_ms: 16,
        }
    }
}

impl BounceConfig {
    pub fn platform(&self) -> PlatformConfig {
        PlatformConfig {
            title: self.window.title.clone(),
            width: self.window.width,
            height: self.window.height,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.window.width as i32, self.window.height as i32)
    }

    pub fn initial_scene(&self) -> SceneState {
        let m = &self.motion;
        SceneState::new(m.start_x, m.start_y, m.dx, m.dy)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.motion.tick_ms)
    }
}

pub fn load_config(path: &Path) -> Result<BounceConfig, ConfigError> {
    if !path.exists() {
        log::info!("No config at '{}', using defaults", path.display());
        return Ok(BounceConfig::default());
    }

    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: BounceConfig = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    validate_config(&config)?;
    log::info!("Loaded config from '{}'", path.display());
    Ok(config)
}

fn validate_config(config: &BounceConfig) -> Result<(), ConfigError> {
    if config.window.width == 0 || config.window.height == 0 {
        return Err(ConfigError::Invalid(format!(
            "window size must be non-zero, got {}x{}",
            config.window.width, config.window.height
        )));
    }
    let max_extent = i32::MAX as u32;
    if config.window.width > max_extent || config.window.height > max_extent {
        return Err(ConfigError::Invalid(format!(
            "window size must fit in i32, got {}x{}",
            config.window.width, config.window.height
        )));
    }
    // Both extents fit in i32 from here on.
    let (width, height) = (config.window.width as i32, config.window.height as i32);
    let m = &config.motion;
    if !(0..=width).contains(&m.start_x) || !(0..=height).contains(&m.start_y) {
        return Err(ConfigError::Invalid(format!(
            "motion start ({}, {}) lies outside the {}x{} window",
            m.start_x, m.start_y, width, height
        )));
    }
    if m.dx.unsigned_abs() > width as u32 || m.dy.unsigned_abs() > height as u32 {
        return Err(ConfigError::Invalid(format!(
            "motion velocity ({}, {}) exceeds the {}x{} window",
            m.dx, m.dy, width, height
        )));
    }
    if config.motion.tick_ms == 0 {
        return Err(ConfigError::Invalid("motion.tick_ms must be > 0".to_string()));
    }
    if config.label.size <= 0.0 {
        return Err(ConfigError::Invalid("label.size must be > 0".to_string()));
    }
    Ok(())
}
