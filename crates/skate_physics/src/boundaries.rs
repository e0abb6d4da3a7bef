//! Containing walls
//!
//! Four static rectangles hug the host's edges from outside. Each wall spans the full
//! host dimension along its edge and is centred half a thickness past the edge, so it
//! overlaps the edge by `thickness / 2` and corners stay closed.

use crate::backend::{BodyHandle, PhysicsBackend};
use skate_core::{Size, Vec2};
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Wall {
    Top,
    Left,
    Bottom,
    Right,
}

impl Wall {
    pub const ALL: [Wall; 4] = [Wall::Top, Wall::Left, Wall::Bottom, Wall::Right];
}

/// Centre and size of one wall
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallRect {
    pub wall: Wall,
    pub center: Vec2,
    pub size: Size,
}

impl WallRect {
    /// Axis-aligned extents as (min, max)
    pub fn extents(&self) -> (Vec2, Vec2) {
        let half = Vec2::new(self.size.width * 0.5, self.size.height * 0.5);
        (self.center - half, self.center + half)
    }
}

/// Wall rectangles for a host of `host` size
pub fn boundary_rects(host: Size, thickness: f32) -> [WallRect; 4] {
    let (w, h) = (host.width, host.height);
    let half = thickness * 0.5;
    Wall::ALL.map(|wall| match wall {
        Wall::Top => WallRect {
            wall,
            center: Vec2::new(w * 0.5, -half),
            size: Size::new(w, thickness),
        },
        Wall::Left => WallRect {
            wall,
            center: Vec2::new(-half, h * 0.5),
            size: Size::new(thickness, h),
        },
        Wall::Bottom => WallRect {
            wall,
            center: Vec2::new(w * 0.5, h + half),
            size: Size::new(w, thickness),
        },
        Wall::Right => WallRect {
            wall,
            center: Vec2::new(w + half, h * 0.5),
            size: Size::new(thickness, h),
        },
    })
}

/// The four wall bodies currently in a world
#[derive(Debug, Default)]
pub struct Boundaries {
    walls: Vec<(WallRect, BodyHandle)>,
}

impl Boundaries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any existing walls with walls sized for `host`
    pub fn rebuild(&mut self, engine: &mut dyn PhysicsBackend, host: Size, thickness: f32) {
        let removed = self.remove(engine);
        for rect in boundary_rects(host, thickness) {
            let handle = engine.add_static_rect(rect.center, rect.size);
            self.walls.push((rect, handle));
        }
        debug!(
            width = host.width,
            height = host.height,
            removed,
            "boundaries rebuilt"
        );
    }

    /// Remove every wall body. Returns how many were removed.
    pub fn remove(&mut self, engine: &mut dyn PhysicsBackend) -> usize {
        self.walls
            .drain(..)
            .filter(|(_, handle)| engine.remove(*handle))
            .count()
    }

    pub fn rects(&self) -> Vec<WallRect> {
        self.walls.iter().map(|(rect, _)| *rect).collect()
    }

    pub fn len(&self) -> usize {
        self.walls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.walls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::RapierBackend;

    #[test]
    fn test_rects_span_host_and_overlap_edges() {
        let rects = boundary_rects(Size::new(800.0, 400.0), 20.0);

        let top = rects[0];
        assert_eq!(top.center, Vec2::new(400.0, -10.0));
        assert_eq!(top.extents(), (Vec2::new(0.0, -20.0), Vec2::new(800.0, 0.0)));

        let left = rects[1];
        assert_eq!(left.center, Vec2::new(-10.0, 200.0));
        assert_eq!(left.size, Size::new(20.0, 400.0));

        let bottom = rects[2];
        assert_eq!(bottom.center, Vec2::new(400.0, 410.0));
        assert_eq!(bottom.size.width, 800.0);

        let right = rects[3];
        assert_eq!(right.center, Vec2::new(810.0, 200.0));
        assert_eq!(right.size.height, 400.0);
    }

    #[test]
    fn test_rebuild_never_leaks_walls() {
        let mut engine = RapierBackend::new();
        let mut walls = Boundaries::new();

        walls.rebuild(&mut engine, Size::new(800.0, 400.0), 20.0);
        walls.rebuild(&mut engine, Size::new(1200.0, 500.0), 20.0);
        assert_eq!(walls.len(), 4);
        assert_eq!(engine.body_count(), 4);
        assert_eq!(walls.rects()[2].center, Vec2::new(600.0, 510.0));

        assert_eq!(walls.remove(&mut engine), 4);
        assert_eq!(walls.remove(&mut engine), 0);
        assert_eq!(engine.body_count(), 0);
    }
}
