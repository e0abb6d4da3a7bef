//! Resize listener bus
//!
//! Stands in for the window's resize event target. Scenes add a listener during setup and
//! remove it in the paired teardown; `len()` makes leaked listeners observable.

use crate::viewport::Viewport;
use slotmap::{new_key_type, SlotMap};
use std::sync::{Arc, Mutex, Weak};
use tracing::debug;

new_key_type! {
    /// Handle to a registered resize listener
    pub struct ListenerId;
}

/// Resize callback
pub type ResizeListener = Box<dyn FnMut(&Viewport) + Send>;

struct BusInner {
    listeners: SlotMap<ListenerId, Option<ResizeListener>>,
    viewport: Viewport,
}

/// Broadcasts viewport changes to registered listeners
pub struct ResizeBus {
    inner: Arc<Mutex<BusInner>>,
}

impl ResizeBus {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            inner: Arc::new(Mutex::new(BusInner {
                listeners: SlotMap::with_key(),
                viewport,
            })),
        }
    }

    pub fn handle(&self) -> ResizeBusHandle {
        ResizeBusHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Current viewport
    pub fn viewport(&self) -> Viewport {
        self.inner.lock().unwrap().viewport
    }

    pub fn add(&self, listener: ResizeListener) -> ListenerId {
        self.inner.lock().unwrap().listeners.insert(Some(listener))
    }

    pub fn remove(&self, id: ListenerId) -> bool {
        self.inner.lock().unwrap().listeners.remove(id).is_some()
    }

    /// Number of registered listeners
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Record the new viewport and notify every listener
    pub fn dispatch(&self, viewport: Viewport) -> usize {
        let keys: Vec<ListenerId> = {
            let mut inner = self.inner.lock().unwrap();
            inner.viewport = viewport;
            inner.listeners.keys().collect()
        };
        debug!(
            width = viewport.width,
            height = viewport.height,
            listeners = keys.len(),
            "viewport resized"
        );

        let mut notified = 0;
        for key in keys {
            let taken = self
                .inner
                .lock()
                .unwrap()
                .listeners
                .get_mut(key)
                .and_then(Option::take);
            let Some(mut listener) = taken else {
                continue;
            };
            listener(&viewport);
            notified += 1;
            if let Some(slot) = self.inner.lock().unwrap().listeners.get_mut(key) {
                *slot = Some(listener);
            }
        }
        notified
    }
}

/// Weak reference to a `ResizeBus`
#[derive(Clone)]
pub struct ResizeBusHandle {
    inner: Weak<Mutex<BusInner>>,
}

impl ResizeBusHandle {
    pub fn add(&self, listener: ResizeListener) -> Option<ListenerId> {
        self.inner
            .upgrade()
            .map(|inner| inner.lock().unwrap().listeners.insert(Some(listener)))
    }

    /// Remove a listener. Idempotent, and a no-op once the bus is gone.
    pub fn remove(&self, id: ListenerId) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.lock().unwrap().listeners.remove(id).is_some())
            .unwrap_or(false)
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.inner
            .upgrade()
            .map(|inner| inner.lock().unwrap().viewport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_reaches_listeners() {
        let bus = ResizeBus::new(Viewport::default());
        let widths = Arc::new(Mutex::new(Vec::new()));
        let w = widths.clone();
        let id = bus.add(Box::new(move |vp: &Viewport| w.lock().unwrap().push(vp.width)));

        assert_eq!(bus.dispatch(Viewport::new(500.0, 300.0)), 1);
        assert_eq!(*widths.lock().unwrap(), vec![500.0]);
        assert_eq!(bus.viewport().width, 500.0);

        assert!(bus.remove(id));
        assert!(!bus.remove(id));
        assert_eq!(bus.dispatch(Viewport::new(600.0, 300.0)), 0);
        assert!(bus.is_empty());
    }

    #[test]
    fn test_handle_after_bus_dropped() {
        let bus = ResizeBus::new(Viewport::default());
        let handle = bus.handle();
        let id = handle.add(Box::new(|_| {})).unwrap();
        drop(bus);
        assert!(!handle.remove(id));
        assert!(handle.add(Box::new(|_| {})).is_none());
        assert_eq!(handle.viewport(), None);
    }
}
