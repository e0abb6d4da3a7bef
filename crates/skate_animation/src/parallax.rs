//! Pointer parallax
//!
//! Two stacked images drift against the pointer. The pointer position maps to a target
//! offset of at most `PARALLAX_RANGE` pixels; every frame the current offset closes
//! `PARALLAX_SMOOTHING` of the remaining gap, which gives the lagging feel.

use skate_core::{FrameHandle, FrameSchedulerHandle, PointerEvent, Vec2, Viewport};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Largest offset in pixels, reached at the viewport edges
pub const PARALLAX_RANGE: f32 = 20.0;
/// Fraction of the remaining distance covered per frame
pub const PARALLAX_SMOOTHING: f32 = 0.1;
/// Foreground travels this much further than the background
pub const FOREGROUND_DEPTH: f32 = 2.5;

/// Translations to apply to the two layers
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ParallaxOffsets {
    pub background: Vec2,
    pub foreground: Vec2,
}

/// Exponential smoothing of the pointer offset
#[derive(Clone, Debug, Default)]
pub struct ParallaxFilter {
    target: Vec2,
    current: Vec2,
}

impl ParallaxFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retarget from a pointer position in viewport pixels
    pub fn pointer_moved(&mut self, x: f32, y: f32, viewport: &Viewport) {
        if viewport.width <= 0.0 || viewport.height <= 0.0 {
            return;
        }
        self.target = Vec2::new(
            (x / viewport.width - 0.5) * 2.0 * -PARALLAX_RANGE,
            (y / viewport.height - 0.5) * 2.0 * -PARALLAX_RANGE,
        );
    }

    /// Advance one frame and return the layer offsets
    pub fn step(&mut self) -> ParallaxOffsets {
        self.current += (self.target - self.current) * PARALLAX_SMOOTHING;
        self.offsets()
    }

    pub fn target(&self) -> Vec2 {
        self.target
    }

    pub fn current(&self) -> Vec2 {
        self.current
    }

    /// The foreground follows the vertical offset on both axes
    pub fn offsets(&self) -> ParallaxOffsets {
        ParallaxOffsets {
            background: self.current,
            foreground: Vec2::new(
                self.current.y * FOREGROUND_DEPTH,
                self.current.y * FOREGROUND_DEPTH,
            ),
        }
    }
}

/// A mounted parallax effect driven by the frame scheduler
pub struct ParallaxLayers {
    filter: Arc<Mutex<ParallaxFilter>>,
    offsets: Arc<Mutex<ParallaxOffsets>>,
    frames: FrameSchedulerHandle,
    frame: Option<FrameHandle>,
}

impl ParallaxLayers {
    /// Start smoothing on every frame
    pub fn mount(frames: FrameSchedulerHandle) -> Self {
        let filter = Arc::new(Mutex::new(ParallaxFilter::new()));
        let offsets = Arc::new(Mutex::new(ParallaxOffsets::default()));

        let (f, o) = (filter.clone(), offsets.clone());
        let frame = frames.request(Box::new(move |_| {
            let next = f.lock().unwrap().step();
            *o.lock().unwrap() = next;
        }));
        debug!(armed = frame.is_some(), "parallax mounted");

        Self {
            filter,
            offsets,
            frames,
            frame,
        }
    }

    /// Feed pointer input; only moves are used
    pub fn pointer(&self, event: &PointerEvent, viewport: &Viewport) {
        if let PointerEvent::Moved { x, y } = *event {
            self.filter.lock().unwrap().pointer_moved(x, y, viewport);
        }
    }

    /// Offsets computed on the latest frame
    pub fn offsets(&self) -> ParallaxOffsets {
        *self.offsets.lock().unwrap()
    }

    pub fn is_mounted(&self) -> bool {
        self.frame.is_some()
    }

    /// Cancel the frame callback. Idempotent.
    pub fn unmount(&mut self) {
        if let Some(frame) = self.frame.take() {
            self.frames.cancel(frame);
            debug!("parallax unmounted");
        }
    }
}

impl Drop for ParallaxLayers {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skate_core::FrameScheduler;

    #[test]
    fn test_pointer_maps_to_target_range() {
        let vp = Viewport::new(1000.0, 500.0);
        let mut filter = ParallaxFilter::new();

        filter.pointer_moved(0.0, 0.0, &vp);
        assert_eq!(filter.target(), Vec2::new(20.0, 20.0));
        filter.pointer_moved(1000.0, 500.0, &vp);
        assert_eq!(filter.target(), Vec2::new(-20.0, -20.0));
        filter.pointer_moved(500.0, 250.0, &vp);
        assert_eq!(filter.target(), Vec2::ZERO);
    }

    #[test]
    fn test_step_closes_a_tenth_of_the_gap() {
        let vp = Viewport::new(1000.0, 1000.0);
        let mut filter = ParallaxFilter::new();
        filter.pointer_moved(0.0, 1000.0, &vp);

        let first = filter.step();
        assert!((first.background.x - 2.0).abs() < 1e-5);
        assert!((first.background.y + 2.0).abs() < 1e-5);
        assert!((first.foreground.x + 5.0).abs() < 1e-5);
        assert!((first.foreground.y + 5.0).abs() < 1e-5);

        filter.step();
        assert!((filter.current().x - 3.8).abs() < 1e-4);
    }

    #[test]
    fn test_mount_runs_per_frame_and_unmount_cancels() {
        let scheduler = FrameScheduler::new();
        let mut layers = ParallaxLayers::mount(scheduler.handle());
        let vp = Viewport::new(100.0, 100.0);
        layers.pointer(&PointerEvent::Moved { x: 0.0, y: 50.0 }, &vp);
        layers.pointer(&PointerEvent::Wheel { delta_x: 0.0, delta_y: 3.0 }, &vp);

        scheduler.tick(1.0 / 60.0);
        assert!((layers.offsets().background.x - 2.0).abs() < 1e-5);
        assert_eq!(scheduler.armed_count(), 1);

        layers.unmount();
        layers.unmount();
        assert_eq!(scheduler.armed_count(), 0);
        assert!(!layers.is_mounted());
    }
}
