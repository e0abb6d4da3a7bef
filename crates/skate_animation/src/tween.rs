//! Tweens and animatable targets

use crate::easing::Easing;
use slotmap::{Key, SlotMap};

/// Numeric field of a scene node a tween can drive
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Property {
    PositionX,
    PositionY,
    PositionZ,
    RotationX,
    RotationY,
    RotationZ,
}

/// Anything exposing animatable numeric fields
pub trait Animatable {
    fn get(&self, property: Property) -> f32;
    fn set(&mut self, property: Property, value: f32);
}

/// Resolves tween targets to mutable fields
///
/// Returning `None` (a target that no longer exists) makes the tween skip silently.
pub trait AnimationTargets<K> {
    fn target_mut(&mut self, key: K) -> Option<&mut dyn Animatable>;
}

impl<K: Key, T: Animatable> AnimationTargets<K> for SlotMap<K, T> {
    fn target_mut(&mut self, key: K) -> Option<&mut dyn Animatable> {
        self.get_mut(key).map(|t| t as &mut dyn Animatable)
    }
}

/// End value of a tween
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TweenValue {
    /// Move to an absolute value
    To(f32),
    /// Move by a delta relative to the value when the tween starts
    By(f32),
}

impl TweenValue {
    /// Resolve against the value captured at tween start
    pub fn resolve(&self, from: f32) -> f32 {
        match *self {
            TweenValue::To(v) => v,
            TweenValue::By(delta) => from + delta,
        }
    }
}

/// One eased transition of one field
#[derive(Clone, Debug, PartialEq)]
pub struct Tween<K> {
    pub target: K,
    pub property: Property,
    pub value: TweenValue,
    /// Seconds
    pub duration: f32,
    pub easing: Easing,
    /// Seconds added to the tween's position in its timeline
    pub delay: f32,
}

impl<K> Tween<K> {
    /// Tween `property` of `target` to an absolute value
    pub fn to(target: K, property: Property, value: f32) -> Self {
        Self::new(target, property, TweenValue::To(value))
    }

    /// Tween `property` of `target` by a relative amount
    pub fn by(target: K, property: Property, delta: f32) -> Self {
        Self::new(target, property, TweenValue::By(delta))
    }

    fn new(target: K, property: Property, value: TweenValue) -> Self {
        Self {
            target,
            property,
            value,
            duration: 0.5,
            easing: Easing::default(),
            delay: 0.0,
        }
    }

    pub fn duration(mut self, seconds: f32) -> Self {
        self.duration = seconds.max(0.0);
        self
    }

    pub fn ease(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn delay(mut self, seconds: f32) -> Self {
        self.delay = seconds.max(0.0);
        self
    }
}
