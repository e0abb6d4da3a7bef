//! Geometry primitives
//!
//! Small value types shared by the 2D footer and the 3D viewer. Rotations on scene nodes
//! are Euler angles in XYZ order, matching how the animation engine addresses
//! `rotation.x`/`rotation.y`/`rotation.z` as independent numeric fields.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// 2D vector
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };
    pub const ONE: Vec2 = Vec2 { x: 1.0, y: 1.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self::new(self.x / len, self.y / len)
        } else {
            Self::ZERO
        }
    }

    pub fn lerp(&self, other: Vec2, t: f32) -> Self {
        Self::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    /// Rotate counter-clockwise by `angle` radians
    pub fn rotate(&self, angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// 3D vector
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
    pub const ONE: Vec3 = Vec3 {
        x: 1.0,
        y: 1.0,
        z: 1.0,
    };
    pub const UP: Vec3 = Vec3 {
        x: 0.0,
        y: 1.0,
        z: 0.0,
    };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self::new(self.x / len, self.y / len, self.z / len)
        } else {
            Self::ZERO
        }
    }

    pub fn dot(&self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: Vec3) -> Vec3 {
        Vec3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn lerp(&self, other: Vec3, t: f32) -> Self {
        *self + (other - *self) * t
    }

    /// Component-wise approximate equality
    pub fn approx_eq(&self, other: Vec3, epsilon: f32) -> bool {
        (self.x - other.x).abs() <= epsilon
            && (self.y - other.y).abs() <= epsilon
            && (self.z - other.z).abs() <= epsilon
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

/// Width/height pair in CSS pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// True when either side is zero, negative or not finite
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }
}

/// RGBA color, components in 0..=1
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let b = (hex & 0xFF) as f32 / 255.0;
        Self::rgb(r, g, b)
    }

    /// Parse a CSS-style `#RRGGBB` or `#RGB` string (the leading `#` is optional)
    pub fn parse_hex(input: &str) -> Result<Self> {
        let digits = input.trim().trim_start_matches('#');
        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_string(),
            _ => return Err(CoreError::InvalidColor(input.to_string())),
        };
        u32::from_str_radix(&expanded, 16)
            .map(Self::from_hex)
            .map_err(|_| CoreError::InvalidColor(input.to_string()))
    }

    /// Back to `#rrggbb`, alpha dropped
    pub fn to_hex_string(&self) -> String {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            channel(self.r),
            channel(self.g),
            channel(self.b)
        )
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.a = alpha;
        self
    }

    pub fn lerp(&self, other: &Color, t: f32) -> Self {
        Self::rgba(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
            self.a + (other.a - self.a) * t,
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Rigid transform: a rotation matrix followed by a translation
///
/// Scene nodes never scale non-uniformly, so the inverse is a transpose.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Affine3 {
    /// Row-major 3x3 rotation
    pub rotation: [[f32; 3]; 3],
    pub translation: Vec3,
}

impl Affine3 {
    pub const IDENTITY: Affine3 = Affine3 {
        rotation: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        translation: Vec3::ZERO,
    };

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    /// Rotation from XYZ-ordered Euler angles (radians)
    pub fn from_euler_xyz(euler: Vec3) -> Self {
        let (b, a) = euler.x.sin_cos();
        let (d, c) = euler.y.sin_cos();
        let (f, e) = euler.z.sin_cos();
        let (ae, af, be, bf) = (a * e, a * f, b * e, b * f);

        Self {
            rotation: [
                [c * e, -c * f, d],
                [af + be * d, ae - bf * d, -b * c],
                [bf - ae * d, be + af * d, a * c],
            ],
            translation: Vec3::ZERO,
        }
    }

    pub fn from_translation_euler(translation: Vec3, euler: Vec3) -> Self {
        Self {
            translation,
            ..Self::from_euler_xyz(euler)
        }
    }

    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        let r = &self.rotation;
        Vec3::new(
            r[0][0] * v.x + r[0][1] * v.y + r[0][2] * v.z,
            r[1][0] * v.x + r[1][1] * v.y + r[1][2] * v.z,
            r[2][0] * v.x + r[2][1] * v.y + r[2][2] * v.z,
        )
    }

    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.transform_vector(p) + self.translation
    }

    /// `self * other`: apply `other` first, then `self`
    pub fn then(&self, other: &Affine3) -> Affine3 {
        let a = &self.rotation;
        let b = &other.rotation;
        let mut rotation = [[0.0; 3]; 3];
        for (i, row) in rotation.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = a[i][0] * b[0][j] + a[i][1] * b[1][j] + a[i][2] * b[2][j];
            }
        }
        Affine3 {
            rotation,
            translation: self.transform_point(other.translation),
        }
    }

    pub fn inverse(&self) -> Affine3 {
        let r = &self.rotation;
        let rotation = [
            [r[0][0], r[1][0], r[2][0]],
            [r[0][1], r[1][1], r[2][1]],
            [r[0][2], r[1][2], r[2][2]],
        ];
        let inverse = Affine3 {
            rotation,
            translation: Vec3::ZERO,
        };
        Affine3 {
            rotation,
            translation: -inverse.transform_vector(self.translation),
        }
    }
}

impl Default for Affine3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_parse_hex_long_and_short() {
        let c = Color::parse_hex("#6F6E6A").unwrap();
        assert!((c.r - 0x6F as f32 / 255.0).abs() < 1e-6);
        assert!((c.b - 0x6A as f32 / 255.0).abs() < 1e-6);

        let short = Color::parse_hex("fff").unwrap();
        assert_eq!(short, Color::WHITE);
    }

    #[test]
    fn test_parse_hex_rejects_garbage() {
        assert!(Color::parse_hex("#12345").is_err());
        assert!(Color::parse_hex("#zzzzzz").is_err());
        assert!(Color::parse_hex("").is_err());
    }

    #[test]
    fn test_hex_string_round_trip() {
        assert_eq!(Color::parse_hex("#B8FC39").unwrap().to_hex_string(), "#b8fc39");
    }

    #[test]
    fn test_euler_rotation_about_y() {
        let rot = Affine3::from_euler_xyz(Vec3::new(0.0, FRAC_PI_2, 0.0));
        let v = rot.transform_vector(Vec3::new(0.0, 0.0, 1.0));
        assert!(v.approx_eq(Vec3::new(1.0, 0.0, 0.0), 1e-5));
    }

    #[test]
    fn test_affine_inverse_round_trips_points() {
        let t = Affine3::from_translation_euler(Vec3::new(1.0, -2.0, 0.5), Vec3::new(0.3, -0.6, 1.2));
        let p = Vec3::new(0.25, 0.7, -3.0);
        let back = t.inverse().transform_point(t.transform_point(p));
        assert!(back.approx_eq(p, 1e-5));
    }

    #[test]
    fn test_then_applies_right_operand_first() {
        let parent = Affine3::from_translation(Vec3::new(0.0, 1.0, 0.0));
        let child = Affine3::from_translation_euler(Vec3::new(1.0, 0.0, 0.0), Vec3::ZERO);
        let world = parent.then(&child);
        assert!(world
            .transform_point(Vec3::ZERO)
            .approx_eq(Vec3::new(1.0, 1.0, 0.0), 1e-6));
    }

    #[test]
    fn test_vec2_rotate_quarter_turn() {
        let v = Vec2::new(1.0, 0.0).rotate(FRAC_PI_2);
        assert!((v.x).abs() < 1e-6 && (v.y - 1.0).abs() < 1e-6);
    }
}
