//! Host element abstraction
//!
//! A scene is mounted into exactly one host element. The host reports its laid-out size
//! and pixel density, accepts render surfaces the scene injects, and applies cursor
//! styles. `MemoryHost` is a headless implementation used by the CLI and by tests.

use crate::event::Cursor;
use crate::geometry::Size;
use rustc_hash::FxHashMap;
use std::sync::Mutex;

/// Opaque identifier of a surface attached to a host
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(u64);

impl SurfaceId {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn to_raw(self) -> u64 {
        self.0
    }
}

/// What a scene asks its host to create
#[derive(Clone, Debug, PartialEq)]
pub struct SurfaceDescriptor {
    /// Debug label
    pub label: String,
    /// Client (CSS pixel) size
    pub size: Size,
    /// Backing store density
    pub pixel_ratio: f32,
}

impl SurfaceDescriptor {
    pub fn new(label: impl Into<String>, size: Size, pixel_ratio: f32) -> Self {
        Self {
            label: label.into(),
            size,
            pixel_ratio,
        }
    }

    /// Backing store size in physical pixels
    pub fn physical_size(&self) -> (u32, u32) {
        (
            (self.size.width * self.pixel_ratio).round().max(0.0) as u32,
            (self.size.height * self.pixel_ratio).round().max(0.0) as u32,
        )
    }
}

/// Element a real-time scene mounts into
pub trait HostElement: Send + Sync {
    /// Laid-out size, `None` while the element is not in the document
    fn client_size(&self) -> Option<Size>;

    /// Device pixel ratio of the display showing the element
    fn device_pixel_ratio(&self) -> f32 {
        1.0
    }

    /// Inject a render surface into the element
    fn attach_surface(&self, descriptor: &SurfaceDescriptor) -> SurfaceId;

    /// Update an attached surface's size and density. Returns false for unknown ids.
    fn resize_surface(&self, id: SurfaceId, descriptor: &SurfaceDescriptor) -> bool;

    /// Remove a surface. Returns false if it was not attached.
    fn detach_surface(&self, id: SurfaceId) -> bool;

    /// Set the pointer cursor shown over the element
    fn set_cursor(&self, cursor: Cursor);
}

#[derive(Default)]
struct MemoryHostState {
    size: Option<Size>,
    pixel_ratio: f32,
    surfaces: FxHashMap<SurfaceId, SurfaceDescriptor>,
    next_surface: u64,
    attach_calls: usize,
    cursor: Cursor,
    cursor_history: Vec<Cursor>,
}

/// In-memory host that records what scenes do to it
pub struct MemoryHost {
    state: Mutex<MemoryHostState>,
}

impl MemoryHost {
    /// Host laid out at `width` x `height`
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            state: Mutex::new(MemoryHostState {
                size: Some(Size::new(width, height)),
                pixel_ratio: 1.0,
                ..Default::default()
            }),
        }
    }

    /// Host that is not in the document yet
    pub fn unattached() -> Self {
        Self {
            state: Mutex::new(MemoryHostState {
                pixel_ratio: 1.0,
                ..Default::default()
            }),
        }
    }

    pub fn with_pixel_ratio(self, ratio: f32) -> Self {
        self.state.lock().unwrap().pixel_ratio = ratio;
        self
    }

    pub fn set_client_size(&self, size: Option<Size>) {
        self.state.lock().unwrap().size = size;
    }

    pub fn set_pixel_ratio(&self, ratio: f32) {
        self.state.lock().unwrap().pixel_ratio = ratio;
    }

    /// Number of surfaces currently attached
    pub fn surface_count(&self) -> usize {
        self.state.lock().unwrap().surfaces.len()
    }

    /// Total attach calls over the host's lifetime
    pub fn attach_calls(&self) -> usize {
        self.state.lock().unwrap().attach_calls
    }

    pub fn surface(&self, id: SurfaceId) -> Option<SurfaceDescriptor> {
        self.state.lock().unwrap().surfaces.get(&id).cloned()
    }

    pub fn cursor(&self) -> Cursor {
        self.state.lock().unwrap().cursor
    }

    /// Every cursor change, in order
    pub fn cursor_history(&self) -> Vec<Cursor> {
        self.state.lock().unwrap().cursor_history.clone()
    }
}

impl HostElement for MemoryHost {
    fn client_size(&self) -> Option<Size> {
        self.state.lock().unwrap().size
    }

    fn device_pixel_ratio(&self) -> f32 {
        self.state.lock().unwrap().pixel_ratio
    }

    fn attach_surface(&self, descriptor: &SurfaceDescriptor) -> SurfaceId {
        let mut state = self.state.lock().unwrap();
        state.next_surface += 1;
        state.attach_calls += 1;
        let id = SurfaceId(state.next_surface);
        state.surfaces.insert(id, descriptor.clone());
        id
    }

    fn resize_surface(&self, id: SurfaceId, descriptor: &SurfaceDescriptor) -> bool {
        match self.state.lock().unwrap().surfaces.get_mut(&id) {
            Some(existing) => {
                *existing = descriptor.clone();
                true
            }
            None => false,
        }
    }

    fn detach_surface(&self, id: SurfaceId) -> bool {
        self.state.lock().unwrap().surfaces.remove(&id).is_some()
    }

    fn set_cursor(&self, cursor: Cursor) {
        let mut state = self.state.lock().unwrap();
        if state.cursor != cursor {
            state.cursor = cursor;
            state.cursor_history.push(cursor);
        }
    }
}
