//! `skate.toml` handling
//!
//! Every section is optional; missing keys take the same defaults the libraries use.
//!
//! ```toml
//! [viewport]
//! width = 1280
//! height = 800
//!
//! [footer]
//! mobile_board_limit = 3
//!
//! [viewer]
//! replay_consumed_regions = false
//!
//! [run]
//! fps = 60
//! seed = 7
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use skate_core::Viewport;
use skate_physics::FooterConfig;
use skate_viewer::ViewerOptions;
use std::fs;
use std::path::Path;

/// Default file looked up in the working directory
pub const CONFIG_FILE: &str = "skate.toml";

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SkateConfig {
    #[serde(default)]
    pub viewport: ViewportConfig,
    #[serde(default)]
    pub footer: FooterConfig,
    #[serde(default)]
    pub viewer: ViewerOptions,
    #[serde(default)]
    pub run: RunConfig,
}

/// Simulated window
#[derive(Debug, Deserialize, Serialize)]
pub struct ViewportConfig {
    #[serde(default = "default_width")]
    pub width: f32,
    #[serde(default = "default_height")]
    pub height: f32,
    #[serde(default = "default_pixel_ratio")]
    pub pixel_ratio: f32,
}

fn default_width() -> f32 {
    1280.0
}

fn default_height() -> f32 {
    800.0
}

fn default_pixel_ratio() -> f32 {
    1.0
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            pixel_ratio: default_pixel_ratio(),
        }
    }
}

impl ViewportConfig {
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height).with_pixel_ratio(self.pixel_ratio)
    }
}

/// Headless run settings
#[derive(Debug, Deserialize, Serialize)]
pub struct RunConfig {
    /// Simulated display refresh rate
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Seed for footer spawn positions
    #[serde(default)]
    pub seed: Option<u64>,
    /// Pretend the OS asks for reduced motion
    #[serde(default)]
    pub reduced_motion: bool,
}

fn default_fps() -> u32 {
    60
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            seed: None,
            reduced_motion: false,
        }
    }
}

impl RunConfig {
    /// Seconds per simulated frame
    pub fn frame_delta(&self) -> f32 {
        1.0 / self.fps.max(1) as f32
    }
}

impl SkateConfig {
    /// Load `path`, or `skate.toml` in the working directory, or defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_file(path),
            None if Path::new(CONFIG_FILE).exists() => Self::load_file(Path::new(CONFIG_FILE)),
            None => Ok(Self::default()),
        }
    }

    fn load_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: SkateConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        config
            .footer
            .validate()
            .with_context(|| format!("Invalid [footer] section in {}", path.display()))?;
        Ok(config)
    }
}
