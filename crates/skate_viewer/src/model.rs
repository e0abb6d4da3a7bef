//! Parameterised skateboard model
//!
//! The mesh itself belongs to the renderer; this is the part list and the materials the
//! appearance drives, plus the wheel spin that runs for as long as the board is mounted.

use crate::appearance::BoardAppearance;
use skate_core::Color;
use std::f32::consts::TAU;

/// Wheel spin in radians per second
pub const WHEEL_SPIN_SPEED: f32 = 12.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PartKind {
    Deck,
    Truck,
    Wheel,
    Bolt,
    Grip,
}

/// Surface of one part
#[derive(Clone, Debug, PartialEq)]
pub enum Material {
    /// Image-mapped surface
    Textured { url: String, roughness: f32 },
    /// Painted metal
    Metal {
        color: Color,
        metalness: f32,
        roughness: f32,
    },
    /// Flat rough surface
    Matte { color: Color },
}

#[derive(Clone, Debug, PartialEq)]
pub struct ModelPart {
    pub name: &'static str,
    pub kind: PartKind,
    pub material: Material,
}

/// A board assembled from an appearance
#[derive(Clone, Debug)]
pub struct SkateboardModel {
    parts: Vec<ModelPart>,
    constant_wheel_spin: bool,
    wheel_angle: f32,
}

impl SkateboardModel {
    pub fn new(appearance: &BoardAppearance) -> Self {
        let metal = |color: Color| Material::Metal {
            color,
            metalness: 0.8,
            roughness: 0.25,
        };
        let wheel = || Material::Textured {
            url: appearance.wheel_texture_url.clone(),
            roughness: 0.35,
        };

        let parts = vec![
            ModelPart {
                name: "deck",
                kind: PartKind::Deck,
                material: Material::Textured {
                    url: appearance.deck_texture_url.clone(),
                    roughness: 0.1,
                },
            },
            ModelPart {
                name: "grip_tape",
                kind: PartKind::Grip,
                material: Material::Matte {
                    color: Color::from_hex(0x555555),
                },
            },
            ModelPart {
                name: "front_truck",
                kind: PartKind::Truck,
                material: metal(appearance.truck_color),
            },
            ModelPart {
                name: "back_truck",
                kind: PartKind::Truck,
                material: metal(appearance.truck_color),
            },
            ModelPart {
                name: "front_left_wheel",
                kind: PartKind::Wheel,
                material: wheel(),
            },
            ModelPart {
                name: "front_right_wheel",
                kind: PartKind::Wheel,
                material: wheel(),
            },
            ModelPart {
                name: "back_left_wheel",
                kind: PartKind::Wheel,
                material: wheel(),
            },
            ModelPart {
                name: "back_right_wheel",
                kind: PartKind::Wheel,
                material: wheel(),
            },
            ModelPart {
                name: "bolts",
                kind: PartKind::Bolt,
                material: metal(appearance.bolt_color),
            },
        ];

        Self {
            parts,
            constant_wheel_spin: true,
            wheel_angle: 0.0,
        }
    }

    pub fn with_constant_wheel_spin(mut self, enabled: bool) -> Self {
        self.constant_wheel_spin = enabled;
        self
    }

    pub fn parts(&self) -> &[ModelPart] {
        &self.parts
    }

    pub fn parts_of(&self, kind: PartKind) -> impl Iterator<Item = &ModelPart> {
        self.parts.iter().filter(move |p| p.kind == kind)
    }

    /// Current wheel rotation about the axle, wrapped to `0..TAU`
    pub fn wheel_angle(&self) -> f32 {
        self.wheel_angle
    }

    /// Advance per-frame model motion
    pub fn advance(&mut self, dt: f32) {
        if self.constant_wheel_spin {
            self.wheel_angle = (self.wheel_angle + WHEEL_SPIN_SPEED * dt).rem_euclid(TAU);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appearance_drives_materials() {
        let appearance = BoardAppearance {
            truck_color: Color::from_hex(0x112233),
            ..Default::default()
        };
        let model = SkateboardModel::new(&appearance);

        assert_eq!(model.parts_of(PartKind::Wheel).count(), 4);
        assert_eq!(model.parts_of(PartKind::Truck).count(), 2);
        for truck in model.parts_of(PartKind::Truck) {
            match &truck.material {
                Material::Metal { color, .. } => assert_eq!(*color, Color::from_hex(0x112233)),
                other => panic!("unexpected truck material {other:?}"),
            }
        }
        match &model.parts_of(PartKind::Deck).next().unwrap().material {
            Material::Textured { url, .. } => assert_eq!(url, &appearance.deck_texture_url),
            other => panic!("unexpected deck material {other:?}"),
        };
    }

    #[test]
    fn test_wheels_spin_only_when_enabled() {
        let mut spinning = SkateboardModel::new(&BoardAppearance::default());
        spinning.advance(0.1);
        assert!((spinning.wheel_angle() - 1.2).abs() < 1e-5);

        let mut still =
            SkateboardModel::new(&BoardAppearance::default()).with_constant_wheel_spin(false);
        still.advance(0.1);
        assert_eq!(still.wheel_angle(), 0.0);
    }
}
