//! Timeline sequencing
//!
//! A timeline places tweens on a shared clock. Placement follows the rules of common web
//! tweening libraries:
//!
//! - `then(tween)` appends at the current end of the timeline (the latest end time of
//!   everything added so far), plus the tween's own delay.
//! - `insert(tween, at)` places the tween at an absolute offset, independent of the
//!   other entries' durations. This is how overlapping motion is written.
//!
//! An entry captures its start value from the target the first time the clock reaches
//! it, so a tween that follows another on the same field starts where the previous one
//! ended. Entries are evaluated in start order each tick; on a shared field the later
//! entry wins.
//!
//! ```ignore
//! let timeline = Timeline::new()
//!     .then(Tween::to(board, Property::RotationX, -0.6).duration(0.26))
//!     .then(Tween::to(board, Property::RotationX, 0.4).duration(0.82).ease(Easing::EaseIn))
//!     .insert(Tween::by(board, Property::RotationZ, TAU).duration(0.78), 0.3)
//!     .then(Tween::to(board, Property::RotationX, 0.0).duration(0.12));
//! ```

use crate::tween::{AnimationTargets, Tween};
use smallvec::SmallVec;

/// Callback fired once when a timeline completes
pub type CompletionCallback = Box<dyn FnOnce() + Send>;

/// Result of advancing a timeline
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimelineStatus {
    /// Not started, or paused
    Idle,
    Running,
    /// Reached its end on this advance
    Completed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PlaybackState {
    Idle,
    Playing,
    Paused,
    Finished,
}

struct TimelineEntry<K> {
    tween: Tween<K>,
    start: f32,
    /// Start and end values, captured when the clock first reaches `start`
    resolved: Option<(f32, f32)>,
}

impl<K> TimelineEntry<K> {
    fn end(&self) -> f32 {
        self.start + self.tween.duration
    }
}

/// A sequence of tweens on one clock
pub struct Timeline<K> {
    entries: SmallVec<[TimelineEntry<K>; 4]>,
    state: PlaybackState,
    /// Clock within the current iteration, in seconds
    time: f32,
    /// Extra iterations after the first, `-1` for forever
    repeat: i32,
    iteration: u32,
    /// Reverse direction on every other iteration
    alternate: bool,
    reversed: bool,
    on_complete: Option<CompletionCallback>,
}

impl<K: Copy> Timeline<K> {
    pub fn new() -> Self {
        Self {
            entries: SmallVec::new(),
            state: PlaybackState::Idle,
            time: 0.0,
            repeat: 0,
            iteration: 0,
            alternate: false,
            reversed: false,
            on_complete: None,
        }
    }

    /// Append a tween at the current end of the timeline
    pub fn then(mut self, tween: Tween<K>) -> Self {
        let at = self.duration() + tween.delay;
        self.push(tween, at);
        self
    }

    /// Place a tween at an absolute offset (seconds from timeline start)
    pub fn insert(mut self, tween: Tween<K>, at: f32) -> Self {
        let at = at.max(0.0) + tween.delay;
        self.push(tween, at);
        self
    }

    /// Callback fired once when the last iteration ends
    pub fn on_complete(mut self, callback: impl FnOnce() + Send + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    /// Extra iterations after the first (`-1` repeats forever)
    pub fn set_loop(mut self, count: i32) -> Self {
        self.repeat = count;
        self
    }

    /// Play every other iteration backwards
    pub fn set_alternate(mut self, enabled: bool) -> Self {
        self.alternate = enabled;
        self
    }

    fn push(&mut self, tween: Tween<K>, start: f32) {
        // Keep entries ordered by start; ties keep insertion order
        let index = self.entries.partition_point(|e| e.start <= start);
        self.entries.insert(
            index,
            TimelineEntry {
                tween,
                start,
                resolved: None,
            },
        );
    }

    /// Length of one iteration in seconds
    pub fn duration(&self) -> f32 {
        self.entries.iter().map(|e| e.end()).fold(0.0, f32::max)
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// `(start, end)` of every entry, in evaluation order
    pub fn spans(&self) -> Vec<(f32, f32)> {
        self.entries.iter().map(|e| (e.start, e.end())).collect()
    }

    /// Start (or restart) playback from zero
    pub fn start(&mut self) {
        self.state = PlaybackState::Playing;
        self.time = 0.0;
        self.iteration = 0;
        self.reversed = false;
    }

    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == PlaybackState::Paused {
            self.state = PlaybackState::Playing;
        }
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn is_finished(&self) -> bool {
        self.state == PlaybackState::Finished
    }

    /// Progress of the current iteration in `0..=1`
    pub fn progress(&self) -> f32 {
        let duration = self.duration();
        if duration <= 0.0 {
            return if self.is_finished() { 1.0 } else { 0.0 };
        }
        (self.time / duration).clamp(0.0, 1.0)
    }

    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    /// Take the completion callback, leaving none behind
    pub fn take_on_complete(&mut self) -> Option<CompletionCallback> {
        self.on_complete.take()
    }

    /// Advance the clock by `dt` seconds and write values to the targets
    pub fn advance(&mut self, dt: f32, targets: &mut dyn AnimationTargets<K>) -> TimelineStatus {
        if self.state != PlaybackState::Playing {
            return TimelineStatus::Idle;
        }

        let duration = self.duration();
        self.time += dt.max(0.0);

        while self.time >= duration && self.has_iterations_left() && duration > 0.0 {
            // Land exactly on the iteration boundary before wrapping
            self.apply(self.local_time(duration, duration), targets);
            self.time -= duration;
            self.iteration += 1;
            if self.alternate {
                self.reversed = !self.reversed;
            }
        }

        if self.time >= duration && !self.has_iterations_left() {
            self.time = duration;
            self.apply(self.local_time(duration, duration), targets);
            self.state = PlaybackState::Finished;
            return TimelineStatus::Completed;
        }

        self.apply(self.local_time(self.time, duration), targets);
        TimelineStatus::Running
    }

    fn has_iterations_left(&self) -> bool {
        self.repeat < 0 || (self.iteration as i64) < self.repeat as i64
    }

    fn local_time(&self, time: f32, duration: f32) -> f32 {
        if self.reversed {
            duration - time
        } else {
            time
        }
    }

    fn apply(&mut self, t: f32, targets: &mut dyn AnimationTargets<K>) {
        // Entries already resolved but not yet reached on this pass (repeats, reversed
        // yoyo) rewind to their start value, latest first, so the earliest one wins and
        // any entry that has started overwrites them on the shared field.
        for entry in self.entries.iter().rev() {
            let Some((from, _)) = entry.resolved else {
                continue;
            };
            if entry.start <= t {
                continue;
            }
            if let Some(target) = targets.target_mut(entry.tween.target) {
                target.set(entry.tween.property, from);
            }
        }

        for entry in self.entries.iter_mut() {
            if t < entry.start {
                continue;
            }
            let Some(target) = targets.target_mut(entry.tween.target) else {
                continue;
            };
            let property = entry.tween.property;

            let (from, to) = match entry.resolved {
                Some(pair) => pair,
                None => {
                    let from = target.get(property);
                    let pair = (from, entry.tween.value.resolve(from));
                    entry.resolved = Some(pair);
                    pair
                }
            };

            let progress = if entry.tween.duration <= 0.0 {
                1.0
            } else {
                (t - entry.start) / entry.tween.duration
            };
            let eased = entry.tween.easing.apply(progress);
            target.set(property, from + (to - from) * eased);
        }
    }
}

impl<K: Copy> Default for Timeline<K> {
    fn default() -> Self {
        Self::new()
    }
}
