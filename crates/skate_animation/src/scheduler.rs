//! Animation scheduler
//!
//! Owns every running timeline of one scene and advances them together each frame.
//! Finished timelines are removed after their values are written, and their completion
//! callbacks run after the scheduler's own bookkeeping, so a callback never observes a
//! half-updated scheduler. Killed timelines are dropped without firing callbacks.

use crate::timeline::{Timeline, TimelineStatus};
use crate::tween::AnimationTargets;
use slotmap::{new_key_type, SlotMap};
use tracing::{debug, trace};

new_key_type! {
    /// Handle to a registered timeline
    pub struct TimelineId;
}

/// Runs timelines against a set of animation targets
pub struct AnimationScheduler<K> {
    timelines: SlotMap<TimelineId, Timeline<K>>,
    /// Seconds advanced since creation
    elapsed: f32,
}

impl<K: Copy> AnimationScheduler<K> {
    pub fn new() -> Self {
        Self {
            timelines: SlotMap::with_key(),
            elapsed: 0.0,
        }
    }

    /// Register and start a timeline
    pub fn play(&mut self, mut timeline: Timeline<K>) -> TimelineId {
        timeline.start();
        let duration = timeline.duration();
        let id = self.timelines.insert(timeline);
        debug!(?id, duration, "timeline started");
        id
    }

    /// Abandon a timeline without firing its completion callback
    pub fn kill(&mut self, id: TimelineId) -> bool {
        self.timelines.remove(id).is_some()
    }

    /// Abandon every timeline. Returns how many were running.
    pub fn kill_all(&mut self) -> usize {
        let count = self.timelines.len();
        self.timelines.clear();
        if count > 0 {
            debug!(count, "killed all timelines");
        }
        count
    }

    pub fn is_active(&self, id: TimelineId) -> bool {
        self.timelines.contains_key(id)
    }

    pub fn active_count(&self) -> usize {
        self.timelines.len()
    }

    pub fn has_active_animations(&self) -> bool {
        !self.timelines.is_empty()
    }

    pub fn get(&self, id: TimelineId) -> Option<&Timeline<K>> {
        self.timelines.get(id)
    }

    pub fn pause(&mut self, id: TimelineId) {
        if let Some(timeline) = self.timelines.get_mut(id) {
            timeline.pause();
        }
    }

    pub fn resume(&mut self, id: TimelineId) {
        if let Some(timeline) = self.timelines.get_mut(id) {
            timeline.resume();
        }
    }

    /// Advance every timeline by `dt` seconds
    ///
    /// Returns the number of timelines that completed on this tick.
    pub fn tick(&mut self, dt: f32, targets: &mut dyn AnimationTargets<K>) -> usize {
        self.elapsed += dt;

        let mut finished = Vec::new();
        for (id, timeline) in self.timelines.iter_mut() {
            if timeline.advance(dt, targets) == TimelineStatus::Completed {
                finished.push(id);
            }
        }

        let mut callbacks = Vec::with_capacity(finished.len());
        for id in &finished {
            if let Some(mut timeline) = self.timelines.remove(*id) {
                debug!(id = ?id, "timeline completed");
                callbacks.extend(timeline.take_on_complete());
            }
        }
        for callback in callbacks {
            callback();
        }

        trace!(active = self.timelines.len(), elapsed = self.elapsed, "animation tick");
        finished.len()
    }
}

impl<K: Copy> Default for AnimationScheduler<K> {
    fn default() -> Self {
        Self::new()
    }
}
