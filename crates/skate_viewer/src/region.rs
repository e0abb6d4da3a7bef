//! Clickable board regions
//!
//! All positions are in deck space (the group that holds the model).

use crate::error::{Result, ViewerError};
use crate::picking::BoundingBox;
use crate::tricks::Trick;
use skate_core::{Color, Vec3};
use std::fmt;
use std::str::FromStr;

/// One of the three click targets on the board
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoardRegion {
    Front,
    Middle,
    Back,
}

impl BoardRegion {
    pub const ALL: [BoardRegion; 3] = [BoardRegion::Front, BoardRegion::Middle, BoardRegion::Back];

    pub fn name(&self) -> &'static str {
        match self {
            BoardRegion::Front => "front",
            BoardRegion::Middle => "middle",
            BoardRegion::Back => "back",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            BoardRegion::Front => 0,
            BoardRegion::Middle => 1,
            BoardRegion::Back => 2,
        }
    }

    /// Trick the region triggers
    pub fn trick(&self) -> Trick {
        match self {
            BoardRegion::Back => Trick::Ollie,
            BoardRegion::Middle => Trick::Kickflip,
            BoardRegion::Front => Trick::Frontside360,
        }
    }

    /// Where the hotspot marker floats
    pub fn hotspot_position(&self) -> Vec3 {
        match self {
            BoardRegion::Front => Vec3::new(0.0, 0.38, 1.0),
            BoardRegion::Middle => Vec3::new(0.0, 0.33, 0.0),
            BoardRegion::Back => Vec3::new(0.0, 0.35, -0.9),
        }
    }

    pub fn hotspot_color(&self) -> Color {
        match self {
            BoardRegion::Front => Color::from_hex(0xB8FC39),
            BoardRegion::Middle => Color::from_hex(0xFF7A51),
            BoardRegion::Back => Color::from_hex(0x46ACFA),
        }
    }

    /// Invisible click volume
    pub fn hit_box(&self) -> BoundingBox {
        match self {
            BoardRegion::Front => {
                BoundingBox::from_center_size(Vec3::new(0.0, 0.27, 0.9), Vec3::new(0.6, 0.2, 0.58))
            }
            BoardRegion::Middle => {
                BoundingBox::from_center_size(Vec3::new(0.0, 0.27, 0.0), Vec3::new(0.6, 0.1, 1.2))
            }
            BoardRegion::Back => BoundingBox::from_center_size(
                Vec3::new(0.0, 0.27, -0.9),
                Vec3::new(0.6, 0.2, 0.58),
            ),
        }
    }
}

impl fmt::Display for BoardRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BoardRegion {
    type Err = ViewerError;

    fn from_str(s: &str) -> Result<Self> {
        BoardRegion::ALL
            .into_iter()
            .find(|r| r.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ViewerError::UnknownRegion(s.to_string()))
    }
}
