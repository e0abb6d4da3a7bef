//! Trick presets
//!
//! Every trick is two timelines started together: the shared jump (vertical hop, which
//! releases the animation lock when it lands) and a rotation timeline. The rotation
//! timelines share one pitch envelope; kickflip adds a roll and frontside 360 a yaw,
//! both positioned 0.3s in so they overlap the pitch.
//!
//! Times are seconds, angles radians.

use crate::lock::AnimationLock;
use crate::scene::NodeId;
use skate_animation::{Easing, Property, Timeline, Tween};
use std::f32::consts::{PI, TAU};
use std::fmt;

/// Pitch reached while popping the tail
pub const POP_PITCH: f32 = -0.6;
/// Pitch reached while levelling out in the air
pub const CATCH_PITCH: f32 = 0.4;
/// Offset of the kickflip roll and the 360 yaw
pub const SPIN_OFFSET: f32 = 0.3;

/// Peak of the jump above the resting height
pub const JUMP_HEIGHT: f32 = 0.8;
/// Delay before the board leaves the ground
pub const JUMP_DELAY: f32 = 0.26;
pub const JUMP_RISE: f32 = 0.51;
pub const JUMP_FALL: f32 = 0.43;

/// Idle sway: lateral travel target of the container
pub const SWAY_X: f32 = 0.2;
/// Idle sway: yaw target of the origin
pub const SWAY_YAW: f32 = PI / 64.0;
/// Idle sway: seconds per half cycle
pub const SWAY_PERIOD: f32 = 3.0;

/// The three canned tricks
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Trick {
    Ollie,
    Kickflip,
    Frontside360,
}

impl Trick {
    pub fn name(&self) -> &'static str {
        match self {
            Trick::Ollie => "ollie",
            Trick::Kickflip => "kickflip",
            Trick::Frontside360 => "frontside360",
        }
    }

    /// Rotation timeline for `board`
    pub fn rotation_timeline(&self, board: NodeId) -> Timeline<NodeId> {
        let pitch = Timeline::new()
            .then(
                Tween::to(board, Property::RotationX, POP_PITCH)
                    .duration(0.26)
                    .ease(Easing::Linear),
            )
            .then(
                Tween::to(board, Property::RotationX, CATCH_PITCH)
                    .duration(0.82)
                    .ease(Easing::EaseIn),
            );

        let (pitch, settle) = match self {
            Trick::Ollie => (pitch, 0.12),
            Trick::Kickflip => (
                pitch.insert(
                    Tween::by(board, Property::RotationZ, TAU)
                        .duration(0.78)
                        .ease(Easing::Linear),
                    SPIN_OFFSET,
                ),
                0.12,
            ),
            Trick::Frontside360 => (
                pitch.insert(
                    Tween::by(board, Property::RotationY, TAU)
                        .duration(0.77)
                        .ease(Easing::Linear),
                    SPIN_OFFSET,
                ),
                0.14,
            ),
        };

        pitch.then(
            Tween::to(board, Property::RotationX, 0.0)
                .duration(settle)
                .ease(Easing::Linear),
        )
    }
}

impl fmt::Display for Trick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Hop up and back down; landing releases `lock`
pub fn jump_timeline(board: NodeId, lock: AnimationLock) -> Timeline<NodeId> {
    Timeline::new()
        .then(
            Tween::to(board, Property::PositionY, JUMP_HEIGHT)
                .duration(JUMP_RISE)
                .ease(Easing::EaseOut)
                .delay(JUMP_DELAY),
        )
        .then(
            Tween::to(board, Property::PositionY, 0.0)
                .duration(JUMP_FALL)
                .ease(Easing::EaseIn),
        )
        .on_complete(move || lock.release())
}

/// The two endless sway loops: container drift and origin yaw
pub fn idle_sway(container: NodeId, origin: NodeId) -> [Timeline<NodeId>; 2] {
    let drift = Timeline::new()
        .then(
            Tween::to(container, Property::PositionX, SWAY_X)
                .duration(SWAY_PERIOD)
                .ease(Easing::SineInOut),
        )
        .set_loop(-1)
        .set_alternate(true);

    let yaw = Timeline::new()
        .then(
            Tween::to(origin, Property::RotationY, SWAY_YAW)
                .duration(SWAY_PERIOD)
                .ease(Easing::SineInOut),
        )
        .set_loop(-1)
        .set_alternate(true);

    [drift, yaw]
}
