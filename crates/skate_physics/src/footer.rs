//! Physics footer simulation
//!
//! A walled 2D sandbox of draggable board bodies living inside one host element. The
//! world exists only while the mount gate is open (host at least half visible, reduced
//! motion not preferred). Opening the gate runs `setup`, closing it runs `teardown`;
//! every setup registers exactly one frame callback, one resize listener and one render
//! surface, and its teardown releases exactly those.
//!
//! A second resize listener lives for the whole mount. It tracks the mobile breakpoint
//! and re-syncs the boards when it flips, without touching the walls or the drag.

use crate::backend::{PhysicsBackend, RapierBackend};
use crate::boards::{visible_textures, BoardSet};
use crate::boundaries::{Boundaries, WallRect};
use crate::config::FooterConfig;
use crate::error::{PhysicsError, Result};
use crate::pointer::PointerDrag;
use crate::render::{board_sprites, RenderSurface, Sprite, TextureCache};
use crate::runner::FixedStepRunner;
use rand::rngs::StdRng;
use rand::SeedableRng;
use skate_core::{
    FrameHandle, FrameSchedulerHandle, GateTransition, HostElement, ListenerId,
    MotionPreference, MountController, PointerEvent, ResizeBusHandle, SceneVisibility, Size,
    SurfaceId, Viewport,
};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

// =============================================================================
// World
// =============================================================================

/// Everything one session owns
struct World {
    engine: RapierBackend,
    boundaries: Boundaries,
    boards: BoardSet,
    drag: PointerDrag,
    runner: FixedStepRunner,
    surface: RenderSurface,
    textures: TextureCache,
    size: Size,
    sprites: Vec<Sprite>,
}

impl World {
    fn build(config: &FooterConfig, host: &dyn HostElement, size: Size) -> Result<Self> {
        if size.is_degenerate() {
            return Err(PhysicsError::DegenerateHost {
                width: size.width,
                height: size.height,
            });
        }

        let mut engine = RapierBackend::new();
        engine.set_gravity(config.gravity());
        let mut boundaries = Boundaries::new();
        boundaries.rebuild(&mut engine, size, config.wall_thickness);

        Ok(Self {
            engine,
            boundaries,
            boards: BoardSet::new(),
            drag: PointerDrag::new(config.drag_stiffness),
            runner: FixedStepRunner::new(config.timestep, config.max_substeps),
            surface: RenderSurface::attach(host, size, host.device_pixel_ratio()),
            textures: TextureCache::new(),
            size,
            sprites: Vec::new(),
        })
    }

    fn frame(&mut self, delta: f32, sprite_scale: f32) {
        let dt = self.runner.timestep();
        for _ in 0..self.runner.advance(delta) {
            self.drag.apply(&mut self.engine, dt);
            self.engine.step(dt);
        }
        self.sprites = board_sprites(&self.boards, &self.engine, &mut self.textures, sprite_scale);
    }

    fn dispose(mut self, host: &dyn HostElement) {
        self.drag.reset();
        let boards = self.boards.remove_all(&mut self.engine);
        let walls = self.boundaries.remove(&mut self.engine);
        self.engine.clear();
        let textures = self.textures.clear();
        self.surface.detach(host);
        debug!(boards, walls, textures, "footer world disposed");
    }
}

// =============================================================================
// Shared state
// =============================================================================

struct FooterState {
    config: FooterConfig,
    gate: MountController,
    textures: Vec<String>,
    rng: StdRng,
    world: Option<World>,
    session: Option<Session>,
}

impl FooterState {
    fn sync_boards(&mut self) -> (usize, usize) {
        let Some(world) = self.world.as_mut() else {
            return (0, 0);
        };
        let visible = visible_textures(
            &self.textures,
            self.gate.visibility().is_mobile,
            self.config.mobile_board_limit,
        );
        world
            .boards
            .sync(&mut world.engine, visible, world.size, &self.config, &mut self.rng)
    }

    fn frame(&mut self, delta: f32) {
        let scale = self.config.sprite_scale;
        if let Some(world) = self.world.as_mut() {
            world.frame(delta, scale);
        }
    }

    fn resize(&mut self, host: &dyn HostElement) {
        let Some(world) = self.world.as_mut() else {
            return;
        };
        let Some(size) = host.client_size().filter(|s| !s.is_degenerate()) else {
            debug!("resize ignored, host has no usable size");
            return;
        };
        world.size = size;
        if !world.surface.resize(host, size, host.device_pixel_ratio()) {
            warn!(id = ?world.surface.id(), "host lost the footer surface");
        }
        world
            .boundaries
            .rebuild(&mut world.engine, size, self.config.wall_thickness);
    }
}

// =============================================================================
// Sessions
// =============================================================================

/// Callbacks registered by one setup
struct Session {
    frame: Option<FrameHandle>,
    resize: Option<ListenerId>,
}

/// Everything a setup or teardown touches, shared with the mount-lifetime listener
#[derive(Clone)]
struct Scene {
    host: Arc<dyn HostElement>,
    frames: FrameSchedulerHandle,
    resize: ResizeBusHandle,
    state: Arc<Mutex<FooterState>>,
}

impl Scene {
    fn setup(&self) -> bool {
        {
            let mut state = self.state.lock().unwrap();
            if state.session.is_some() {
                return false;
            }
            if !state.gate.gate() {
                debug!("footer setup skipped, gate closed");
                return false;
            }
            let Some(size) = self.host.client_size() else {
                debug!("footer setup skipped, host not mounted");
                return false;
            };
            let world = match World::build(&state.config, &*self.host, size) {
                Ok(world) => world,
                Err(err) => {
                    warn!(%err, "footer setup skipped");
                    return false;
                }
            };
            state.world = Some(world);
            state.sync_boards();
        }

        let s = self.state.clone();
        let frame = self.frames.request(Box::new(move |time| {
            s.lock().unwrap().frame(time.delta);
        }));

        let s = self.state.clone();
        let host = self.host.clone();
        let resize = self.resize.add(Box::new(move |_: &Viewport| {
            s.lock().unwrap().resize(&*host);
        }));

        let mut state = self.state.lock().unwrap();
        state.session = Some(Session { frame, resize });
        let boards = state.world.as_ref().map_or(0, |w| w.boards.len());
        info!(boards, "footer simulation started");
        true
    }

    /// Set up if the gate is open but no session is running, e.g. after the host
    /// had no usable size when the gate opened
    fn catch_up(&self) -> bool {
        let pending = {
            let state = self.state.lock().unwrap();
            state.gate.gate() && state.session.is_none()
        };
        pending && self.setup()
    }

    fn teardown(&self) -> bool {
        let (session, world) = {
            let mut state = self.state.lock().unwrap();
            (state.session.take(), state.world.take())
        };
        if let Some(session) = &session {
            if let Some(frame) = session.frame {
                self.frames.cancel(frame);
            }
            if let Some(listener) = session.resize {
                self.resize.remove(listener);
            }
        }
        if let Some(world) = world {
            world.dispose(&*self.host);
        }
        if session.is_some() {
            info!("footer simulation stopped");
        }
        session.is_some()
    }
}

// =============================================================================
// Public surface
// =============================================================================

/// Snapshot of the footer for logging and tests
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FooterStats {
    pub running: bool,
    pub bodies: usize,
    pub boards: usize,
    pub walls: usize,
    pub textures_loaded: usize,
    pub steps: u64,
    pub surface: Option<SurfaceId>,
}

/// The physics footer mounted into one host element
pub struct FooterSimulation {
    scene: Scene,
    mobile_listener: Option<ListenerId>,
}

impl FooterSimulation {
    /// Mount into `host`. The world is only built once the gate opens.
    pub fn mount(
        host: Arc<dyn HostElement>,
        frames: FrameSchedulerHandle,
        resize: ResizeBusHandle,
        motion: Arc<dyn MotionPreference>,
        config: FooterConfig,
    ) -> Result<Self> {
        config.validate()?;

        let viewport = resize.viewport().unwrap_or_default();
        let mut gate = MountController::new(motion);
        gate.attach(&*host, &viewport);

        let state = Arc::new(Mutex::new(FooterState {
            config,
            gate,
            textures: Vec::new(),
            rng: StdRng::from_entropy(),
            world: None,
            session: None,
        }));
        let scene = Scene {
            host,
            frames,
            resize,
            state,
        };

        let listener_scene = scene.clone();
        let mobile_listener = scene.resize.add(Box::new(move |viewport: &Viewport| {
            {
                let mut state = listener_scene.state.lock().unwrap();
                if state.gate.resize(viewport) {
                    // New boards spawn inside the current host, so refresh it first
                    state.resize(&*listener_scene.host);
                    let (added, removed) = state.sync_boards();
                    debug!(
                        is_mobile = viewport.is_mobile(),
                        added, removed, "mobile breakpoint crossed"
                    );
                }
            }
            listener_scene.catch_up();
        }));

        Ok(Self {
            scene,
            mobile_listener,
        })
    }

    /// Use a seeded generator for spawn positions
    pub fn with_seed(self, seed: u64) -> Self {
        self.scene.state.lock().unwrap().rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Replace the board textures. Running worlds add and remove boards to match.
    pub fn set_textures(&mut self, textures: Vec<String>) {
        let mut state = self.scene.state.lock().unwrap();
        state.textures = textures;
        state.sync_boards();
    }

    /// Feed the visible fraction of the host. Sets up or tears down on gate changes,
    /// and retries a setup the host was not ready for while the gate stays open.
    pub fn set_intersection(&mut self, ratio: f32) -> Option<GateTransition> {
        let transition = self.scene.state.lock().unwrap().gate.observe_intersection(ratio);
        match transition {
            Some(GateTransition::Opened) => {
                self.setup();
            }
            Some(GateTransition::Closed) => {
                self.teardown();
            }
            None => {
                self.scene.catch_up();
            }
        }
        transition
    }

    /// Build the world and register the session's callbacks
    ///
    /// No-op returning false when a session is already running, the gate is closed, or
    /// the host has no usable size.
    pub fn setup(&mut self) -> bool {
        self.scene.setup()
    }

    /// Stop the loops, clear the world and detach the surface. Idempotent.
    pub fn teardown(&mut self) -> bool {
        self.scene.teardown()
    }

    /// Route pointer input to the drag. Returns whether it was consumed.
    pub fn pointer(&self, event: &PointerEvent) -> bool {
        let mut state = self.scene.state.lock().unwrap();
        match state.world.as_mut() {
            Some(world) => world.drag.handle(event, &world.engine),
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.scene.state.lock().unwrap().session.is_some()
    }

    pub fn visibility(&self) -> SceneVisibility {
        self.scene.state.lock().unwrap().gate.visibility()
    }

    /// Sprites produced by the latest frame
    pub fn sprites(&self) -> Vec<Sprite> {
        let state = self.scene.state.lock().unwrap();
        state
            .world
            .as_ref()
            .map(|w| w.sprites.clone())
            .unwrap_or_default()
    }

    /// Current wall rectangles
    pub fn boundary_rects(&self) -> Vec<WallRect> {
        let state = self.scene.state.lock().unwrap();
        state
            .world
            .as_ref()
            .map(|w| w.boundaries.rects())
            .unwrap_or_default()
    }

    pub fn stats(&self) -> FooterStats {
        let state = self.scene.state.lock().unwrap();
        let running = state.session.is_some();
        match state.world.as_ref() {
            Some(world) => FooterStats {
                running,
                bodies: world.engine.body_count(),
                boards: world.boards.len(),
                walls: world.boundaries.len(),
                textures_loaded: world.textures.len(),
                steps: world.runner.total_steps(),
                surface: Some(world.surface.id()),
            },
            None => FooterStats {
                running,
                ..Default::default()
            },
        }
    }

    /// Tear down and stop watching the host. Idempotent.
    pub fn unmount(&mut self) {
        self.scene.teardown();
        if let Some(listener) = self.mobile_listener.take() {
            self.scene.resize.remove(listener);
        }
        self.scene.state.lock().unwrap().gate.detach();
    }
}

impl Drop for FooterSimulation {
    fn drop(&mut self) {
        self.unmount();
    }
}
