//! Mount controller
//!
//! Decides when a real-time scene may run. The controller watches the host element's
//! intersection with the viewport (threshold 50% of its area), the viewport width and the
//! reduced-motion preference, and reduces them to one boolean gate:
//!
//! ```text
//! gate = observing && in_viewport && !reduced_motion_preferred
//! ```
//!
//! `is_mobile` is tracked alongside but never affects the gate; scenes use it to size
//! their content. The controller has no side effects of its own; callers act on the
//! `GateTransition` values it returns.

use crate::host::HostElement;
use crate::viewport::Viewport;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Fraction of the host's area that must be visible
pub const VISIBILITY_THRESHOLD: f32 = 0.5;

/// Source of the OS-level reduced-motion preference
pub trait MotionPreference: Send + Sync {
    fn prefers_reduced_motion(&self) -> bool;
}

/// Preference backed by a flag, settable at runtime
#[derive(Debug, Default)]
pub struct StaticMotionPreference {
    reduced: AtomicBool,
}

impl StaticMotionPreference {
    pub fn new(reduced: bool) -> Self {
        Self {
            reduced: AtomicBool::new(reduced),
        }
    }

    pub fn set(&self, reduced: bool) {
        self.reduced.store(reduced, Ordering::SeqCst);
    }
}

impl MotionPreference for StaticMotionPreference {
    fn prefers_reduced_motion(&self) -> bool {
        self.reduced.load(Ordering::SeqCst)
    }
}

/// Derived visibility state of one scene
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SceneVisibility {
    pub in_viewport: bool,
    pub reduced_motion_preferred: bool,
    pub is_mobile: bool,
}

impl SceneVisibility {
    /// Whether the simulation may run
    pub fn should_run(&self) -> bool {
        self.in_viewport && !self.reduced_motion_preferred
    }
}

/// Change of the run gate
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateTransition {
    /// The scene should set up
    Opened,
    /// The scene should tear down
    Closed,
}

/// Visibility and motion gate for one host element
pub struct MountController {
    motion: Arc<dyn MotionPreference>,
    observing: bool,
    visibility: SceneVisibility,
    gate: bool,
}

impl MountController {
    pub fn new(motion: Arc<dyn MotionPreference>) -> Self {
        Self {
            motion,
            observing: false,
            visibility: SceneVisibility::default(),
            gate: false,
        }
    }

    /// Start observing `host`
    ///
    /// A host that is not laid out yet gets no watcher and the gate stays closed.
    /// Returns whether observation started.
    pub fn attach(&mut self, host: &dyn HostElement, viewport: &Viewport) -> bool {
        if host.client_size().is_none() {
            debug!("host element not mounted, intersection watcher not attached");
            return false;
        }
        self.observing = true;
        self.visibility.is_mobile = viewport.is_mobile();
        self.visibility.reduced_motion_preferred = self.motion.prefers_reduced_motion();
        debug!(
            reduced_motion = self.visibility.reduced_motion_preferred,
            is_mobile = self.visibility.is_mobile,
            "mount controller attached"
        );
        true
    }

    /// Stop observing. Closes the gate if it was open.
    pub fn detach(&mut self) -> Option<GateTransition> {
        if !self.observing {
            return None;
        }
        self.observing = false;
        self.visibility.in_viewport = false;
        self.recompute()
    }

    /// Feed an intersection ratio (0..=1) reported by the watcher
    pub fn observe_intersection(&mut self, ratio: f32) -> Option<GateTransition> {
        if !self.observing {
            return None;
        }
        let in_viewport = ratio >= VISIBILITY_THRESHOLD;
        if in_viewport && !self.visibility.in_viewport {
            // The scene would start: the preference may have changed since mount
            self.visibility.reduced_motion_preferred = self.motion.prefers_reduced_motion();
        }
        self.visibility.in_viewport = in_viewport;
        self.recompute()
    }

    /// Track a viewport change. Returns true when `is_mobile` flipped.
    pub fn resize(&mut self, viewport: &Viewport) -> bool {
        let is_mobile = viewport.is_mobile();
        let changed = is_mobile != self.visibility.is_mobile;
        self.visibility.is_mobile = is_mobile;
        changed
    }

    pub fn gate(&self) -> bool {
        self.gate
    }

    pub fn visibility(&self) -> SceneVisibility {
        self.visibility
    }

    pub fn is_observing(&self) -> bool {
        self.observing
    }

    fn recompute(&mut self) -> Option<GateTransition> {
        let gate = self.observing && self.visibility.should_run();
        if gate == self.gate {
            return None;
        }
        self.gate = gate;
        let transition = if gate {
            GateTransition::Opened
        } else {
            GateTransition::Closed
        };
        debug!(?transition, "scene gate changed");
        Some(transition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;

    fn controller(reduced: bool) -> (MountController, Arc<StaticMotionPreference>) {
        let pref = Arc::new(StaticMotionPreference::new(reduced));
        (MountController::new(pref.clone()), pref)
    }

    #[test]
    fn test_gate_truth_table() {
        for in_viewport in [false, true] {
            for reduced in [false, true] {
                let (mut mount, _) = controller(reduced);
                let host = MemoryHost::new(800.0, 600.0);
                assert!(mount.attach(&host, &Viewport::default()));
                mount.observe_intersection(if in_viewport { 1.0 } else { 0.0 });
                assert_eq!(
                    mount.gate(),
                    in_viewport && !reduced,
                    "in_viewport={in_viewport} reduced={reduced}"
                );
                assert_eq!(mount.gate(), mount.visibility().should_run());
            }
        }
    }

    #[test]
    fn test_unmounted_host_never_opens() {
        let (mut mount, _) = controller(false);
        let host = MemoryHost::unattached();
        assert!(!mount.attach(&host, &Viewport::default()));
        assert_eq!(mount.observe_intersection(1.0), None);
        assert!(!mount.gate());
    }

    #[test]
    fn test_threshold_crossings_report_transitions() {
        let (mut mount, _) = controller(false);
        mount.attach(&MemoryHost::new(100.0, 100.0), &Viewport::default());

        assert_eq!(mount.observe_intersection(0.49), None);
        assert_eq!(mount.observe_intersection(0.5), Some(GateTransition::Opened));
        assert_eq!(mount.observe_intersection(0.8), None);
        assert_eq!(mount.observe_intersection(0.1), Some(GateTransition::Closed));
        assert_eq!(mount.observe_intersection(0.0), None);
    }

    #[test]
    fn test_reduced_motion_rechecked_on_start() {
        let (mut mount, pref) = controller(false);
        mount.attach(&MemoryHost::new(100.0, 100.0), &Viewport::default());
        pref.set(true);
        assert_eq!(mount.observe_intersection(1.0), None);
        assert!(!mount.gate());
        assert!(mount.visibility().reduced_motion_preferred);
    }

    #[test]
    fn test_mobile_does_not_affect_gate() {
        let (mut mount, _) = controller(false);
        mount.attach(&MemoryHost::new(100.0, 100.0), &Viewport::new(1200.0, 800.0));
        mount.observe_intersection(1.0);
        assert!(mount.resize(&Viewport::new(400.0, 800.0)));
        assert!(mount.visibility().is_mobile);
        assert!(mount.gate());
        assert!(!mount.resize(&Viewport::new(500.0, 800.0)));
    }

    #[test]
    fn test_detach_closes_gate_once() {
        let (mut mount, _) = controller(false);
        mount.attach(&MemoryHost::new(100.0, 100.0), &Viewport::default());
        mount.observe_intersection(1.0);
        assert_eq!(mount.detach(), Some(GateTransition::Closed));
        assert_eq!(mount.detach(), None);
        assert!(!mount.is_observing());
    }
}
