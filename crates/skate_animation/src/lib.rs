//! Skate Animation
//!
//! A small GSAP-style tweening system that mutates numeric fields on scene nodes.
//!
//! # Features
//!
//! - **Easing**: linear, cubic in/out/in-out and sine in-out curves
//! - **Tweens**: absolute (`to`) or relative (`by`) moves of one numeric field
//! - **Timelines**: sequenced and explicitly positioned tweens, repeat and yoyo,
//!   a completion callback fired exactly once
//! - **Scheduler**: owns running timelines and advances them each frame
//! - **Parallax**: the lagging pointer offset used by layered hero images

pub mod easing;
pub mod parallax;
pub mod scheduler;
pub mod timeline;
pub mod tween;

pub use easing::Easing;
pub use parallax::{ParallaxFilter, ParallaxLayers, ParallaxOffsets};
pub use scheduler::{AnimationScheduler, TimelineId};
pub use timeline::{CompletionCallback, Timeline, TimelineStatus};
pub use tween::{Animatable, AnimationTargets, Property, Tween, TweenValue};
