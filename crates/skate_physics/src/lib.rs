//! Skate Physics
//!
//! The physics footer: textured skateboard bodies tumbling inside the footer element,
//! draggable with the pointer, running only while the footer is on screen.
//!
//! ```ignore
//! use skate_physics::{FooterConfig, FooterSimulation};
//!
//! let mut footer = FooterSimulation::mount(host, frames.handle(), bus.handle(), motion, FooterConfig::default())?;
//! footer.set_textures(urls);
//! footer.set_intersection(0.8); // gate opens, world is built
//! ```

pub mod backend;
pub mod boards;
pub mod boundaries;
pub mod config;
pub mod error;
pub mod footer;
pub mod pointer;
pub mod render;
pub mod runner;

pub use backend::{BoardBody, BodyHandle, PhysicsBackend, Pose, RapierBackend};
pub use boards::{spawn_pose, visible_textures, Board, BoardKey, BoardSet};
pub use boundaries::{boundary_rects, Boundaries, Wall, WallRect};
pub use config::FooterConfig;
pub use error::{PhysicsError, Result};
pub use footer::{FooterSimulation, FooterStats};
pub use pointer::PointerDrag;
pub use render::{board_sprites, RenderSurface, Sprite, TextureCache, TextureId};
pub use runner::FixedStepRunner;
