//! Hotspot markers
//!
//! Each region gets a small billboarded marker made of two concentric discs: a lit inner
//! disc and a slightly larger unlit disc behind it. A marker is visible only while no
//! trick is playing and its region has not been triggered yet. Triggering is one-shot
//! for the lifetime of the mount.

use crate::region::BoardRegion;
use skate_core::{Color, Vec3};

/// Radius of the lit inner disc
pub const INNER_RING_RADIUS: f32 = 0.02;
/// Radius of the unlit outer disc, also the hover target
pub const OUTER_RING_RADIUS: f32 = 0.03;
/// Segments used to tessellate each disc
pub const RING_SEGMENTS: u32 = 32;

/// Per-region "not yet triggered" flags
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HotspotState {
    untriggered: [bool; 3],
}

impl HotspotState {
    /// All three hotspots shown
    pub fn new() -> Self {
        Self {
            untriggered: [true; 3],
        }
    }

    /// Whether the region has not been triggered in this mount
    pub fn is_untriggered(&self, region: BoardRegion) -> bool {
        self.untriggered[region.index()]
    }

    /// Visibility rule: untriggered and nothing animating
    pub fn is_visible(&self, region: BoardRegion, animating: bool) -> bool {
        !animating && self.is_untriggered(region)
    }

    /// Mark a region as triggered. Returns true the first time only.
    pub fn consume(&mut self, region: BoardRegion) -> bool {
        std::mem::replace(&mut self.untriggered[region.index()], false)
    }

    pub fn remaining(&self) -> usize {
        self.untriggered.iter().filter(|v| **v).count()
    }
}

impl Default for HotspotState {
    fn default() -> Self {
        Self::new()
    }
}

/// Shading of a disc
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RingMaterial {
    /// Responds to scene lighting
    Lit,
    /// Flat color
    Unlit,
}

/// One disc of a marker
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HotspotRing {
    pub radius: f32,
    pub color: Color,
    pub material: RingMaterial,
    pub segments: u32,
}

/// Render description of one hotspot for the current frame
#[derive(Clone, Debug, PartialEq)]
pub struct HotspotMarker {
    pub region: BoardRegion,
    /// World-space centre
    pub position: Vec3,
    /// Disc normal; points back at the camera
    pub normal: Vec3,
    pub rings: [HotspotRing; 2],
    pub visible: bool,
}

impl HotspotMarker {
    pub fn new(region: BoardRegion, position: Vec3, camera_forward: Vec3, visible: bool) -> Self {
        let color = region.hotspot_color();
        Self {
            region,
            position,
            normal: -camera_forward,
            rings: [
                HotspotRing {
                    radius: INNER_RING_RADIUS,
                    color,
                    material: RingMaterial::Lit,
                    segments: RING_SEGMENTS,
                },
                HotspotRing {
                    radius: OUTER_RING_RADIUS,
                    color,
                    material: RingMaterial::Unlit,
                    segments: RING_SEGMENTS,
                },
            ],
            visible,
        }
    }
}
