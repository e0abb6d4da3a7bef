//! Skate Core
//!
//! Plumbing shared by every real-time scene in the workspace:
//!
//! - **Geometry**: `Vec2`, `Vec3`, `Size`, `Color` and rigid `Affine3` transforms
//! - **Events**: pointer input and cursor styles
//! - **Host**: the element a scene attaches its render surface to
//! - **Frames**: a display-refresh style scheduler with cancellable handles
//! - **Resize**: a listener bus for viewport changes
//! - **Mount control**: the visibility/reduced-motion gate that decides when a scene runs

pub mod error;
pub mod event;
pub mod frame;
pub mod geometry;
pub mod host;
pub mod mount;
pub mod resize;
pub mod viewport;

pub use error::{CoreError, Result};
pub use event::{Cursor, PointerButton, PointerEvent};
pub use frame::{FrameCallback, FrameHandle, FrameScheduler, FrameSchedulerHandle, FrameTime};
pub use geometry::{Affine3, Color, Size, Vec2, Vec3};
pub use host::{HostElement, MemoryHost, SurfaceDescriptor, SurfaceId};
pub use mount::{
    GateTransition, MotionPreference, MountController, SceneVisibility, StaticMotionPreference,
    VISIBILITY_THRESHOLD,
};
pub use resize::{ListenerId, ResizeBus, ResizeBusHandle, ResizeListener};
pub use viewport::{Viewport, MOBILE_MAX_WIDTH};
