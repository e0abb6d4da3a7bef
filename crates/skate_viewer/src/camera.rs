//! Camera framing
//!
//! The camera's orientation is fixed once, looking from the reference position toward
//! the board. Only its distance changes: the reference position is scaled by a factor
//! picked from three viewport-width breakpoints, so narrow screens pull the camera back.

use crate::picking::Ray;
use skate_core::{Vec3, Viewport};
use tracing::debug;

/// Camera position at scale 1
pub const REFERENCE_POSITION: Vec3 = Vec3::new(1.5, 1.0, 1.4);
/// Point the camera looks at
pub const LOOK_AT: Vec3 = Vec3::new(-0.2, 0.15, 0.0);
/// Vertical field of view in degrees
pub const FOV_DEGREES: f32 = 55.0;

/// Widths below this use the narrow framing
pub const NARROW_MAX_WIDTH: f32 = 600.0;
/// Widths below this (and at least `NARROW_MAX_WIDTH`) use the medium framing
pub const MEDIUM_MAX_WIDTH: f32 = 1000.0;

/// Distance multiplier for a viewport width
pub fn framing_scale(viewport_width: f32) -> f32 {
    if viewport_width < NARROW_MAX_WIDTH {
        4.0
    } else if viewport_width < MEDIUM_MAX_WIDTH {
        3.0
    } else {
        2.0
    }
}

/// Perspective camera with breakpoint framing
#[derive(Clone, Debug)]
pub struct ViewerCamera {
    /// Vertical field of view in radians
    pub fov: f32,
    /// Aspect ratio (width / height)
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    position: Vec3,
    scale: f32,
    forward: Vec3,
    right: Vec3,
    up: Vec3,
}

impl ViewerCamera {
    /// Camera framed for `viewport`
    pub fn new(viewport: &Viewport) -> Self {
        let forward = (LOOK_AT - REFERENCE_POSITION).normalize();
        let right = forward.cross(Vec3::UP).normalize();
        let up = right.cross(forward);

        let mut camera = Self {
            fov: FOV_DEGREES.to_radians(),
            aspect: 1.0,
            near: 0.1,
            far: 1000.0,
            position: REFERENCE_POSITION,
            scale: 1.0,
            forward,
            right,
            up,
        };
        camera.fit(viewport);
        camera
    }

    /// Re-frame for a new viewport. Returns the applied scale.
    pub fn fit(&mut self, viewport: &Viewport) -> f32 {
        self.scale = framing_scale(viewport.width);
        self.position = REFERENCE_POSITION * self.scale;
        if viewport.height > 0.0 {
            self.aspect = viewport.width / viewport.height;
        }
        debug!(
            width = viewport.width,
            scale = self.scale,
            aspect = self.aspect,
            "camera framed"
        );
        self.scale
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Current distance multiplier relative to `REFERENCE_POSITION`
    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    /// Ray through a point given in viewport pixels (origin top-left)
    pub fn screen_ray(&self, x: f32, y: f32, viewport: &Viewport) -> Ray {
        let ndc_x = (x / viewport.width.max(1.0)) * 2.0 - 1.0;
        let ndc_y = 1.0 - (y / viewport.height.max(1.0)) * 2.0;
        let half_height = (self.fov * 0.5).tan();
        let half_width = half_height * self.aspect;

        let direction = self.forward
            + self.right * (ndc_x * half_width)
            + self.up * (ndc_y * half_height);
        Ray::new(self.position, direction)
    }

    /// Pixel position of a world point, `None` when behind the camera
    pub fn project(&self, point: Vec3, viewport: &Viewport) -> Option<(f32, f32)> {
        let rel = point - self.position;
        let depth = rel.dot(self.forward);
        if depth <= self.near {
            return None;
        }
        let half_height = (self.fov * 0.5).tan();
        let half_width = half_height * self.aspect;
        let ndc_x = rel.dot(self.right) / (depth * half_width);
        let ndc_y = rel.dot(self.up) / (depth * half_height);
        Some((
            (ndc_x + 1.0) * 0.5 * viewport.width,
            (1.0 - ndc_y) * 0.5 * viewport.height,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakpoint_scales() {
        assert_eq!(framing_scale(500.0), 4.0);
        assert_eq!(framing_scale(599.0), 4.0);
        assert_eq!(framing_scale(600.0), 3.0);
        assert_eq!(framing_scale(800.0), 3.0);
        assert_eq!(framing_scale(1000.0), 2.0);
        assert_eq!(framing_scale(1200.0), 2.0);
    }

    #[test]
    fn test_fit_scales_reference_position() {
        for (width, scale) in [(500.0, 4.0), (800.0, 3.0), (1200.0, 2.0)] {
            let camera = ViewerCamera::new(&Viewport::new(width, 700.0));
            assert_eq!(camera.scale(), scale);
            assert!(camera
                .position()
                .approx_eq(REFERENCE_POSITION * scale, 1e-6));
        }
    }

    #[test]
    fn test_orientation_is_fixed_across_resizes() {
        let mut camera = ViewerCamera::new(&Viewport::new(1200.0, 700.0));
        let forward = camera.forward();
        camera.fit(&Viewport::new(400.0, 700.0));
        assert_eq!(camera.forward(), forward);
        assert!((camera.aspect - 400.0 / 700.0).abs() < 1e-6);
    }

    #[test]
    fn test_center_ray_follows_forward() {
        let vp = Viewport::new(1000.0, 500.0);
        let camera = ViewerCamera::new(&vp);
        let ray = camera.screen_ray(500.0, 250.0, &vp);
        assert!(ray.direction.approx_eq(camera.forward(), 1e-5));
    }

    #[test]
    fn test_project_inverts_screen_ray() {
        let vp = Viewport::new(1200.0, 800.0);
        let camera = ViewerCamera::new(&vp);
        let ray = camera.screen_ray(300.0, 200.0, &vp);
        let (x, y) = camera.project(ray.point_at(3.0), &vp).unwrap();
        assert!((x - 300.0).abs() < 1e-2);
        assert!((y - 200.0).abs() < 1e-2);
    }
}
