//! Footer tunables
//!
//! Distances are host pixels, times seconds. Gravity is given the way the scene is
//! authored (a small vertical component) and scaled to pixels per second squared.

use crate::error::{PhysicsError, Result};
use serde::{Deserialize, Serialize};
use skate_core::Vec2;

/// Footer simulation configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FooterConfig {
    /// Authored vertical gravity component
    pub gravity_y: f32,
    /// Multiplier from authored gravity to px/s²
    pub gravity_scale: f32,
    /// Thickness of each boundary wall
    pub wall_thickness: f32,
    pub board_width: f32,
    pub board_height: f32,
    pub board_corner_radius: f32,
    pub restitution: f32,
    pub friction: f32,
    /// Sprite scale applied to board textures
    pub sprite_scale: f32,
    /// Board cap on narrow viewports
    pub mobile_board_limit: usize,
    /// Fraction of the drag error corrected per step
    pub drag_stiffness: f32,
    /// Fixed physics step
    pub timestep: f32,
    /// Upper bound of steps run for one frame
    pub max_substeps: u32,
}

impl Default for FooterConfig {
    fn default() -> Self {
        Self {
            gravity_y: 0.5,
            gravity_scale: 1000.0,
            wall_thickness: 20.0,
            board_width: 80.0,
            board_height: 285.0,
            board_corner_radius: 40.0,
            restitution: 0.8,
            friction: 0.005,
            sprite_scale: 0.5,
            mobile_board_limit: 3,
            drag_stiffness: 0.2,
            timestep: 1.0 / 60.0,
            max_substeps: 4,
        }
    }
}

impl FooterConfig {
    /// Gravity in px/s², y pointing down
    pub fn gravity(&self) -> Vec2 {
        Vec2::new(0.0, self.gravity_y * self.gravity_scale)
    }

    pub fn with_gravity(mut self, gravity_y: f32) -> Self {
        self.gravity_y = gravity_y;
        self
    }

    pub fn with_timestep(mut self, timestep: f32) -> Self {
        self.timestep = timestep;
        self
    }

    pub fn with_mobile_board_limit(mut self, limit: usize) -> Self {
        self.mobile_board_limit = limit;
        self
    }

    /// Zero gravity preset, boards float where they spawn
    pub fn zero_gravity() -> Self {
        Self::default().with_gravity(0.0)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("wall_thickness", self.wall_thickness),
            ("board_width", self.board_width),
            ("board_height", self.board_height),
            ("timestep", self.timestep),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(PhysicsError::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if self.board_corner_radius < 0.0 {
            return Err(PhysicsError::InvalidConfig(
                "board_corner_radius must not be negative".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.drag_stiffness) {
            return Err(PhysicsError::InvalidConfig(format!(
                "drag_stiffness must be within 0..=1, got {}",
                self.drag_stiffness
            )));
        }
        if self.max_substeps == 0 {
            return Err(PhysicsError::InvalidConfig(
                "max_substeps must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gravity_scales_to_pixels() {
        assert_eq!(FooterConfig::default().gravity(), Vec2::new(0.0, 500.0));
        assert_eq!(FooterConfig::zero_gravity().gravity(), Vec2::ZERO);
    }

    #[test]
    fn test_default_validates() {
        assert!(FooterConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = FooterConfig::default().with_timestep(0.0);
        assert!(matches!(config.validate(), Err(PhysicsError::InvalidConfig(_))));

        let config = FooterConfig {
            drag_stiffness: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = FooterConfig {
            max_substeps: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: FooterConfig = toml::from_str("mobile_board_limit = 5\nfriction = 0.1").unwrap();
        assert_eq!(config.mobile_board_limit, 5);
        assert_eq!(config.friction, 0.1);
        assert_eq!(config.board_height, 285.0);
    }
}
