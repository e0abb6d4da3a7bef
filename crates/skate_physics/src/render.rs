//! Footer rendering state
//!
//! The footer draws into one surface attached to its host element. The surface backing
//! store is the client size times the device pixel ratio. Drawing itself happens in the
//! host; each frame the simulation hands over a list of sprites.

use crate::backend::{PhysicsBackend, Pose};
use crate::boards::BoardSet;
use rustc_hash::FxHashMap;
use skate_core::{HostElement, Size, SurfaceDescriptor, SurfaceId};
use tracing::debug;

const SURFACE_LABEL: &str = "physics-footer";

/// Surface attached to the host for the lifetime of one session
#[derive(Debug)]
pub struct RenderSurface {
    id: SurfaceId,
    descriptor: SurfaceDescriptor,
}

impl RenderSurface {
    /// Attach a new surface sized to `size` at `pixel_ratio`
    pub fn attach(host: &dyn HostElement, size: Size, pixel_ratio: f32) -> Self {
        let descriptor = SurfaceDescriptor::new(SURFACE_LABEL, size, pixel_ratio);
        let id = host.attach_surface(&descriptor);
        debug!(?id, width = size.width, height = size.height, pixel_ratio, "surface attached");
        Self { id, descriptor }
    }

    /// Resize the backing store. Returns false if the host lost the surface.
    pub fn resize(&mut self, host: &dyn HostElement, size: Size, pixel_ratio: f32) -> bool {
        self.descriptor = SurfaceDescriptor::new(SURFACE_LABEL, size, pixel_ratio);
        host.resize_surface(self.id, &self.descriptor)
    }

    /// Remove the surface from the host
    pub fn detach(self, host: &dyn HostElement) -> bool {
        let detached = host.detach_surface(self.id);
        debug!(id = ?self.id, detached, "surface detached");
        detached
    }

    pub fn id(&self) -> SurfaceId {
        self.id
    }

    pub fn descriptor(&self) -> &SurfaceDescriptor {
        &self.descriptor
    }
}

/// Index of a loaded texture
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureId(u32);

/// Textures loaded for the current session, by URL
#[derive(Debug, Default)]
pub struct TextureCache {
    by_url: FxHashMap<String, TextureId>,
    next: u32,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_insert(&mut self, url: &str) -> TextureId {
        if let Some(id) = self.by_url.get(url) {
            return *id;
        }
        let id = TextureId(self.next);
        self.next += 1;
        self.by_url.insert(url.to_string(), id);
        id
    }

    pub fn get(&self, url: &str) -> Option<TextureId> {
        self.by_url.get(url).copied()
    }

    /// Release every texture. Returns how many were held.
    pub fn clear(&mut self) -> usize {
        let count = self.by_url.len();
        self.by_url.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.by_url.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_url.is_empty()
    }
}

/// One board as drawn this frame
#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    pub texture: TextureId,
    pub url: String,
    pub pose: Pose,
    pub scale: f32,
}

/// Sprites for every live board, loading textures on first use
pub fn board_sprites(
    boards: &BoardSet,
    engine: &dyn PhysicsBackend,
    textures: &mut TextureCache,
    scale: f32,
) -> Vec<Sprite> {
    boards
        .iter()
        .filter_map(|board| {
            let pose = engine.pose(board.handle)?;
            Some(Sprite {
                texture: textures.get_or_insert(&board.texture),
                url: board.texture.clone(),
                pose,
                scale,
            })
        })
        .collect()
}
