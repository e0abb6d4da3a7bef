//! Viewer lifecycle wiring
//!
//! Connects a `SkateboardViewer` to the frame scheduler and the resize bus for as long
//! as it is mounted. Both registrations go away on `unmount` or drop.

use crate::viewer::{ClickOutcome, SkateboardViewer};
use skate_core::{
    FrameHandle, FrameSchedulerHandle, ListenerId, PointerEvent, ResizeBusHandle, Viewport,
};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// A viewer driven by host frames and resizes
pub struct ViewerMount {
    viewer: Arc<Mutex<SkateboardViewer>>,
    frames: FrameSchedulerHandle,
    frame: Option<FrameHandle>,
    resize: ResizeBusHandle,
    listener: Option<ListenerId>,
}

impl ViewerMount {
    /// Load the model, start the idle sway and register with the host loops
    pub fn mount(
        mut viewer: SkateboardViewer,
        frames: FrameSchedulerHandle,
        resize: ResizeBusHandle,
    ) -> Self {
        if let Some(viewport) = resize.viewport() {
            viewer.resize(&viewport);
        }
        viewer.mount();
        let viewer = Arc::new(Mutex::new(viewer));

        let v = viewer.clone();
        let frame = frames.request(Box::new(move |time| {
            v.lock().unwrap().advance(time.delta);
        }));

        let v = viewer.clone();
        let listener = resize.add(Box::new(move |viewport: &Viewport| {
            v.lock().unwrap().resize(viewport);
        }));

        debug!(
            frame = frame.is_some(),
            resize = listener.is_some(),
            "viewer mounted"
        );

        Self {
            viewer,
            frames,
            frame,
            resize,
            listener,
        }
    }

    /// Forward pointer input to the viewer
    pub fn pointer(&self, event: &PointerEvent) -> Option<ClickOutcome> {
        self.viewer.lock().unwrap().pointer(event)
    }

    /// Run `f` against the viewer
    pub fn with_viewer<R>(&self, f: impl FnOnce(&mut SkateboardViewer) -> R) -> R {
        f(&mut self.viewer.lock().unwrap())
    }

    pub fn is_mounted(&self) -> bool {
        self.frame.is_some() || self.listener.is_some()
    }

    /// Drop both registrations and abandon running timelines. Idempotent.
    pub fn unmount(&mut self) {
        let frame = self.frame.take();
        let listener = self.listener.take();
        if frame.is_none() && listener.is_none() {
            return;
        }
        if let Some(frame) = frame {
            self.frames.cancel(frame);
        }
        if let Some(listener) = listener {
            self.resize.remove(listener);
        }
        self.viewer.lock().unwrap().teardown();
        debug!("viewer unmounted");
    }
}

impl Drop for ViewerMount {
    fn drop(&mut self) {
        self.unmount();
    }
}
