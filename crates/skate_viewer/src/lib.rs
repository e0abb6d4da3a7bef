//! Skate Viewer
//!
//! The interactive hero board. One textured skateboard sits in a small scene-node tree;
//! three invisible click boxes (front, middle, back) map to the ollie, kickflip and
//! frontside 360 tricks. At most one trick plays at a time, each region's hotspot marker
//! disappears the first time it is used, and the camera keeps its framing across
//! viewport breakpoints.
//!
//! # Layout
//!
//! ```text
//! origin            idle yaw sway
//! └── container     idle lateral sway, trick rotation and jump
//!     └── deck      model, hotspots and click boxes live in this space
//! ```

pub mod appearance;
pub mod camera;
pub mod error;
pub mod hotspot;
pub mod lock;
pub mod model;
pub mod mount;
pub mod picking;
pub mod region;
pub mod scene;
pub mod tricks;
pub mod viewer;

pub use appearance::{AppearanceFields, BoardAppearance};
pub use camera::{framing_scale, ViewerCamera};
pub use error::{Result, ViewerError};
pub use hotspot::{HotspotMarker, HotspotRing, HotspotState, RingMaterial};
pub use lock::AnimationLock;
pub use model::{Material, ModelPart, PartKind, SkateboardModel};
pub use mount::ViewerMount;
pub use picking::{BoundingBox, BoundingSphere, Ray};
pub use region::BoardRegion;
pub use scene::{NodeId, SceneGraph, SceneNode, Transform};
pub use tricks::Trick;
pub use viewer::{ClickOutcome, SkateboardViewer, ViewerOptions};
