//! Viewport snapshot

use crate::geometry::Size;
use serde::{Deserialize, Serialize};

/// Widths strictly below this count as a mobile layout
pub const MOBILE_MAX_WIDTH: f32 = 768.0;

/// Window dimensions and pixel density at one point in time
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    #[serde(default = "default_pixel_ratio")]
    pub device_pixel_ratio: f32,
}

fn default_pixel_ratio() -> f32 {
    1.0
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio: 1.0,
        }
    }

    pub fn with_pixel_ratio(mut self, ratio: f32) -> Self {
        self.device_pixel_ratio = ratio;
        self
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn is_mobile(&self) -> bool {
        self.width < MOBILE_MAX_WIDTH
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 800.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mobile_breakpoint() {
        assert!(Viewport::new(375.0, 800.0).is_mobile());
        assert!(Viewport::new(767.0, 800.0).is_mobile());
        assert!(!Viewport::new(768.0, 800.0).is_mobile());
        assert!(!Viewport::new(1440.0, 900.0).is_mobile());
    }
}
