//! Frame scheduler
//!
//! Models the display refresh callback: scenes register a per-frame callback and get a
//! `FrameHandle` back. The callback keeps firing on every `tick()` until the handle is
//! cancelled. Scenes hold a `FrameSchedulerHandle` (a weak reference) so a dropped
//! scheduler turns every schedule/cancel into a no-op instead of a panic.

use slotmap::{new_key_type, SlotMap};
use std::sync::{Arc, Mutex, Weak};
use tracing::trace;

new_key_type! {
    /// Handle to a registered frame callback
    pub struct FrameHandle;
}

/// Timing information passed to frame callbacks
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTime {
    /// Seconds since the previous frame
    pub delta: f32,
    /// Seconds since the scheduler was created
    pub elapsed: f64,
    /// Frame counter, starting at 1 for the first tick
    pub frame: u64,
}

/// Per-frame callback
pub type FrameCallback = Box<dyn FnMut(FrameTime) + Send>;

struct FrameInner {
    /// `None` while the callback is being invoked
    callbacks: SlotMap<FrameHandle, Option<FrameCallback>>,
    elapsed: f64,
    frame: u64,
}

/// Owner of all frame callbacks
pub struct FrameScheduler {
    inner: Arc<Mutex<FrameInner>>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FrameInner {
                callbacks: SlotMap::with_key(),
                elapsed: 0.0,
                frame: 0,
            })),
        }
    }

    /// Weak handle for scenes
    pub fn handle(&self) -> FrameSchedulerHandle {
        FrameSchedulerHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Register a callback that runs on every tick until cancelled
    pub fn request(&self, callback: FrameCallback) -> FrameHandle {
        request(&self.inner, callback)
    }

    /// Cancel a callback. Returns false if it was already gone.
    pub fn cancel(&self, handle: FrameHandle) -> bool {
        cancel(&self.inner, handle)
    }

    pub fn is_armed(&self, handle: FrameHandle) -> bool {
        self.inner.lock().unwrap().callbacks.contains_key(handle)
    }

    /// Number of armed callbacks
    pub fn armed_count(&self) -> usize {
        self.inner.lock().unwrap().callbacks.len()
    }

    /// Advance one frame, invoking every armed callback once
    ///
    /// The lock is released around each callback, so callbacks may request or cancel
    /// frames (including their own). Callbacks requested during a tick first run on the
    /// next tick. Returns the number of callbacks invoked.
    pub fn tick(&self, delta: f32) -> usize {
        let (keys, time) = {
            let mut inner = self.inner.lock().unwrap();
            inner.elapsed += delta as f64;
            inner.frame += 1;
            let time = FrameTime {
                delta,
                elapsed: inner.elapsed,
                frame: inner.frame,
            };
            (inner.callbacks.keys().collect::<Vec<_>>(), time)
        };

        let mut invoked = 0;
        for key in keys {
            let taken = self
                .inner
                .lock()
                .unwrap()
                .callbacks
                .get_mut(key)
                .and_then(Option::take);

            let Some(mut callback) = taken else {
                continue;
            };
            callback(time);
            invoked += 1;

            // Put it back unless it was cancelled while running
            if let Some(slot) = self.inner.lock().unwrap().callbacks.get_mut(key) {
                *slot = Some(callback);
            }
        }

        trace!(frame = time.frame, invoked, "frame tick");
        invoked
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// Weak reference to a `FrameScheduler`
#[derive(Clone)]
pub struct FrameSchedulerHandle {
    inner: Weak<Mutex<FrameInner>>,
}

impl FrameSchedulerHandle {
    /// Register a callback. Returns `None` if the scheduler has been dropped.
    pub fn request(&self, callback: FrameCallback) -> Option<FrameHandle> {
        self.inner.upgrade().map(|inner| request(&inner, callback))
    }

    /// Cancel a callback. Safe to call repeatedly or after the scheduler is gone.
    pub fn cancel(&self, handle: FrameHandle) -> bool {
        self.inner
            .upgrade()
            .map(|inner| cancel(&inner, handle))
            .unwrap_or(false)
    }

    pub fn is_armed(&self, handle: FrameHandle) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.lock().unwrap().callbacks.contains_key(handle))
            .unwrap_or(false)
    }

    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

fn request(inner: &Mutex<FrameInner>, callback: FrameCallback) -> FrameHandle {
    inner.lock().unwrap().callbacks.insert(Some(callback))
}

fn cancel(inner: &Mutex<FrameInner>, handle: FrameHandle) -> bool {
    inner.lock().unwrap().callbacks.remove(handle).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> (Arc<AtomicUsize>, FrameCallback) {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        (
            count,
            Box::new(move |_| {
                c.fetch_add(1, Ordering::SeqCst);
            }),
        )
    }

    #[test]
    fn test_callback_rearms_until_cancelled() {
        let scheduler = FrameScheduler::new();
        let (count, cb) = counter();
        let handle = scheduler.request(cb);

        scheduler.tick(1.0 / 60.0);
        scheduler.tick(1.0 / 60.0);
        assert_eq!(count.load(Ordering::SeqCst), 2);

        assert!(scheduler.cancel(handle));
        assert!(!scheduler.cancel(handle));
        scheduler.tick(1.0 / 60.0);
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert_eq!(scheduler.armed_count(), 0);
    }

    #[test]
    fn test_callback_can_cancel_itself() {
        let scheduler = FrameScheduler::new();
        let handle_slot: Arc<Mutex<Option<FrameHandle>>> = Arc::new(Mutex::new(None));
        let weak = scheduler.handle();
        let slot = handle_slot.clone();
        let handle = scheduler.request(Box::new(move |_| {
            if let Some(h) = *slot.lock().unwrap() {
                weak.cancel(h);
            }
        }));
        *handle_slot.lock().unwrap() = Some(handle);

        assert_eq!(scheduler.tick(0.016), 1);
        assert!(!scheduler.is_armed(handle));
        assert_eq!(scheduler.tick(0.016), 0);
    }

    #[test]
    fn test_frame_time_accumulates() {
        let scheduler = FrameScheduler::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = seen.clone();
        scheduler.request(Box::new(move |t| s.lock().unwrap().push(t)));
        scheduler.tick(0.5);
        scheduler.tick(0.25);
        let seen = seen.lock().unwrap();
        assert_eq!(seen[1].frame, 2);
        assert!((seen[1].elapsed - 0.75).abs() < 1e-9);
        assert_eq!(seen[1].delta, 0.25);
    }

    #[test]
    fn test_handle_is_noop_after_drop() {
        let scheduler = FrameScheduler::new();
        let handle = scheduler.handle();
        let (_, cb) = counter();
        let id = handle.request(cb).unwrap();
        drop(scheduler);

        assert!(!handle.is_alive());
        assert!(!handle.cancel(id));
        let (_, cb) = counter();
        assert!(handle.request(cb).is_none());
    }
}
