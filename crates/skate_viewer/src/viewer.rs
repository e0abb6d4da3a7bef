//! Skateboard viewer state machine
//!
//! Owns the scene tree, camera, running timelines, hotspot flags and the animation lock.
//! Everything happens on the caller's thread: a click is handled to completion (lock
//! taken, timelines started) before the next event is looked at, so two tricks can never
//! start together. Clicks that arrive while a trick is in flight are dropped.

use crate::appearance::BoardAppearance;
use crate::camera::ViewerCamera;
use crate::hotspot::{HotspotMarker, HotspotState, OUTER_RING_RADIUS};
use crate::lock::AnimationLock;
use crate::model::SkateboardModel;
use crate::picking::BoundingSphere;
use crate::region::BoardRegion;
use crate::scene::{NodeId, SceneGraph, Transform};
use crate::tricks::{idle_sway, jump_timeline, Trick};
use serde::{Deserialize, Serialize};
use skate_animation::{AnimationScheduler, TimelineId};
use skate_core::{Cursor, HostElement, PointerButton, PointerEvent, Vec3, Viewport};
use std::sync::Arc;
use tracing::{debug, info};

/// Resting position of the board container inside the origin
pub const CONTAINER_REST: Vec3 = Vec3::new(-0.25, 0.0, -0.635);
/// Offset of the deck group inside the container
pub const DECK_OFFSET: Vec3 = Vec3::new(0.0, -0.086, 0.635);

/// Behaviour switches
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewerOptions {
    /// Let an already-triggered region start its trick again once unlocked.
    /// Its hotspot stays hidden either way.
    #[serde(default)]
    pub replay_consumed_regions: bool,
}

/// What happened to a click
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The trick started and the lock is held
    Started(Trick),
    /// A trick is in flight; the click was dropped
    Locked,
    /// The region was already triggered in this mount
    Consumed,
    /// The model is not loaded yet
    Unavailable,
    /// The pointer did not hit a region
    Missed,
}

#[derive(Clone, Copy, Debug)]
struct BoardNodes {
    origin: NodeId,
    container: NodeId,
    deck: NodeId,
}

/// The interactive hero board
pub struct SkateboardViewer {
    appearance: BoardAppearance,
    options: ViewerOptions,
    scene: SceneGraph,
    nodes: Option<BoardNodes>,
    model: Option<SkateboardModel>,
    camera: ViewerCamera,
    viewport: Viewport,
    animations: AnimationScheduler<NodeId>,
    idle: Vec<TimelineId>,
    lock: AnimationLock,
    hotspots: HotspotState,
    hovered: Option<BoardRegion>,
    host: Option<Arc<dyn HostElement>>,
}

impl SkateboardViewer {
    /// Viewer with its camera framed for `viewport`; the model is not loaded yet
    pub fn new(appearance: BoardAppearance, viewport: Viewport, options: ViewerOptions) -> Self {
        Self {
            appearance,
            options,
            scene: SceneGraph::new(),
            nodes: None,
            model: None,
            camera: ViewerCamera::new(&viewport),
            viewport,
            animations: AnimationScheduler::new(),
            idle: Vec::new(),
            lock: AnimationLock::new(),
            hotspots: HotspotState::new(),
            hovered: None,
            host: None,
        }
    }

    /// Route cursor changes to a host element
    pub fn with_host(mut self, host: Arc<dyn HostElement>) -> Self {
        self.host = Some(host);
        self
    }

    /// Build the node tree and model. Idempotent.
    pub fn load_model(&mut self) {
        if self.nodes.is_some() {
            return;
        }
        let origin = self.scene.add("origin", Transform::default(), None);
        let container = self.scene.add(
            "container",
            Transform::at(CONTAINER_REST.x, CONTAINER_REST.y, CONTAINER_REST.z),
            Some(origin),
        );
        let deck = self.scene.add(
            "deck",
            Transform::at(DECK_OFFSET.x, DECK_OFFSET.y, DECK_OFFSET.z),
            Some(container),
        );
        self.nodes = Some(BoardNodes {
            origin,
            container,
            deck,
        });
        self.model = Some(SkateboardModel::new(&self.appearance));
        debug!(deck = %self.appearance.deck_texture_url, "skateboard model loaded");
    }

    pub fn is_loaded(&self) -> bool {
        self.nodes.is_some()
    }

    /// Start the endless idle sway. No-op without a model or when already swaying.
    pub fn start_idle(&mut self) -> bool {
        let Some(nodes) = self.nodes else {
            debug!("idle sway skipped, model not loaded");
            return false;
        };
        if !self.idle.is_empty() {
            return false;
        }
        for timeline in idle_sway(nodes.container, nodes.origin) {
            self.idle.push(self.animations.play(timeline));
        }
        true
    }

    /// Load and start idling
    pub fn mount(&mut self) {
        self.load_model();
        self.start_idle();
    }

    /// Re-frame the camera. Running tricks are untouched.
    pub fn resize(&mut self, viewport: &Viewport) -> f32 {
        self.viewport = *viewport;
        self.camera.fit(viewport)
    }

    /// Dispatch a click on a region
    pub fn click_region(&mut self, region: BoardRegion) -> ClickOutcome {
        let Some(nodes) = self.nodes else {
            debug!(%region, "click ignored, model not loaded");
            return ClickOutcome::Unavailable;
        };
        if self.lock.is_held() {
            debug!(%region, "click ignored, trick in flight");
            return ClickOutcome::Locked;
        }
        if !self.hotspots.is_untriggered(region) && !self.options.replay_consumed_regions {
            debug!(%region, "click ignored, region already used");
            return ClickOutcome::Consumed;
        }
        if !self.lock.try_acquire() {
            return ClickOutcome::Locked;
        }

        self.hotspots.consume(region);
        let trick = region.trick();
        self.animations
            .play(jump_timeline(nodes.container, self.lock.clone()));
        self.animations.play(trick.rotation_timeline(nodes.container));
        // Every marker hides while animating
        self.set_hovered(None);

        info!(%region, %trick, "trick started");
        ClickOutcome::Started(trick)
    }

    /// Region under a viewport pixel, nearest first
    pub fn pick(&self, x: f32, y: f32) -> Option<BoardRegion> {
        let nodes = self.nodes?;
        let deck_from_world = self.scene.world_transform(nodes.deck)?.inverse();
        let ray = self
            .camera
            .screen_ray(x, y, &self.viewport)
            .transformed(&deck_from_world);

        BoardRegion::ALL
            .into_iter()
            .filter_map(|region| region.hit_box().intersect_ray(&ray).map(|t| (region, t)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(region, _)| region)
    }

    /// Visible hotspot under a viewport pixel
    pub fn hotspot_at(&self, x: f32, y: f32) -> Option<BoardRegion> {
        let ray = self.camera.screen_ray(x, y, &self.viewport);
        self.hotspot_markers()
            .into_iter()
            .filter(|m| m.visible)
            .filter_map(|m| {
                BoundingSphere::new(m.position, OUTER_RING_RADIUS)
                    .intersect_ray(&ray)
                    .map(|t| (m.region, t))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(region, _)| region)
    }

    /// Handle pointer input. Returns the click outcome for primary presses.
    pub fn pointer(&mut self, event: &PointerEvent) -> Option<ClickOutcome> {
        match *event {
            PointerEvent::Pressed {
                button: PointerButton::Primary,
                x,
                y,
            } => Some(match self.pick(x, y) {
                Some(region) => self.click_region(region),
                None if !self.is_loaded() => ClickOutcome::Unavailable,
                None => ClickOutcome::Missed,
            }),
            PointerEvent::Moved { x, y } => {
                let hovered = self.hotspot_at(x, y);
                self.set_hovered(hovered);
                None
            }
            PointerEvent::Left => {
                self.set_hovered(None);
                None
            }
            _ => None,
        }
    }

    fn set_hovered(&mut self, region: Option<BoardRegion>) {
        if self.hovered == region {
            return;
        }
        let was_over = self.hovered.is_some();
        self.hovered = region;
        if was_over != region.is_some() {
            if let Some(host) = &self.host {
                host.set_cursor(self.cursor());
            }
        }
    }

    /// Cursor the host should show
    pub fn cursor(&self) -> Cursor {
        if self.hovered.is_some() {
            Cursor::Pointer
        } else {
            Cursor::Default
        }
    }

    /// Advance animations and model motion by `dt` seconds
    pub fn advance(&mut self, dt: f32) {
        self.animations.tick(dt, &mut self.scene);
        if let Some(model) = self.model.as_mut() {
            model.advance(dt);
        }
    }

    pub fn is_animating(&self) -> bool {
        self.lock.is_held()
    }

    pub fn hotspot_visible(&self, region: BoardRegion) -> bool {
        self.is_loaded() && self.hotspots.is_visible(region, self.is_animating())
    }

    pub fn hotspots(&self) -> &HotspotState {
        &self.hotspots
    }

    /// Render description of the three markers
    pub fn hotspot_markers(&self) -> Vec<HotspotMarker> {
        let Some(nodes) = self.nodes else {
            return Vec::new();
        };
        BoardRegion::ALL
            .into_iter()
            .filter_map(|region| {
                let position = self.scene.to_world(nodes.deck, region.hotspot_position())?;
                Some(HotspotMarker::new(
                    region,
                    position,
                    self.camera.forward(),
                    self.hotspot_visible(region),
                ))
            })
            .collect()
    }

    /// Pixel position of a region's click box centre
    pub fn region_screen_position(&self, region: BoardRegion) -> Option<(f32, f32)> {
        let nodes = self.nodes?;
        let world = self.scene.to_world(nodes.deck, region.hit_box().center())?;
        self.camera.project(world, &self.viewport)
    }

    /// Transform of the board container (trick and sway target)
    pub fn board_transform(&self) -> Option<Transform> {
        self.nodes.and_then(|n| self.scene.transform(n.container))
    }

    /// Transform of the mounting origin (yaw sway target)
    pub fn origin_transform(&self) -> Option<Transform> {
        self.nodes.and_then(|n| self.scene.transform(n.origin))
    }

    pub fn camera(&self) -> &ViewerCamera {
        &self.camera
    }

    pub fn model(&self) -> Option<&SkateboardModel> {
        self.model.as_ref()
    }

    pub fn appearance(&self) -> &BoardAppearance {
        &self.appearance
    }

    pub fn active_timelines(&self) -> usize {
        self.animations.active_count()
    }

    /// Abandon every timeline and drop hover state. Safe to call repeatedly.
    pub fn teardown(&mut self) {
        let killed = self.animations.kill_all();
        self.idle.clear();
        self.lock.release();
        self.set_hovered(None);
        if killed > 0 {
            debug!(killed, "viewer torn down");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skate_core::MemoryHost;
    use std::f32::consts::TAU;

    const DT: f32 = 0.01;

    fn mounted(width: f32) -> SkateboardViewer {
        let mut viewer = SkateboardViewer::new(
            BoardAppearance::default(),
            Viewport::new(width, 800.0),
            ViewerOptions::default(),
        );
        viewer.load_model();
        viewer
    }

    fn run(viewer: &mut SkateboardViewer, seconds: f32) {
        let steps = (seconds / DT).round() as usize;
        for _ in 0..steps {
            viewer.advance(DT);
        }
    }

    fn rotation(viewer: &SkateboardViewer) -> Vec3 {
        viewer.board_transform().unwrap().rotation
    }

    #[test]
    fn test_ollie_scenario() {
        let mut viewer = mounted(1200.0);
        assert_eq!(
            viewer.click_region(BoardRegion::Back),
            ClickOutcome::Started(Trick::Ollie)
        );
        assert!(viewer.is_animating());
        assert!(!viewer.hotspots().is_untriggered(BoardRegion::Back));

        viewer.advance(0.26);
        assert!((rotation(&viewer).x + 0.6).abs() < 1e-5);

        viewer.advance(0.82);
        assert!((rotation(&viewer).x - 0.4).abs() < 1e-4);
        assert!(viewer.is_animating());

        viewer.advance(0.13);
        assert!(rotation(&viewer).x.abs() < 1e-4);
        assert!(!viewer.is_animating());
        assert!(viewer.board_transform().unwrap().position.y.abs() < 1e-5);
    }

    #[test]
    fn test_kickflip_rolls_full_turn() {
        let mut viewer = mounted(1200.0);
        assert_eq!(
            viewer.click_region(BoardRegion::Middle),
            ClickOutcome::Started(Trick::Kickflip)
        );
        viewer.advance(0.3);
        assert!(rotation(&viewer).z.abs() < 1e-5);
        viewer.advance(0.39);
        assert!((rotation(&viewer).z - TAU / 2.0).abs() < 1e-3);
        viewer.advance(0.39);
        assert!((rotation(&viewer).z - TAU).abs() < 1e-4);
        assert!((rotation(&viewer).x - 0.4).abs() < 1e-4);
        viewer.advance(0.2);
        assert!((rotation(&viewer).z - TAU).abs() < 1e-4);
        assert!(rotation(&viewer).x.abs() < 1e-4);
    }

    #[test]
    fn test_frontside360_spins_yaw() {
        let mut viewer = mounted(1200.0);
        viewer.click_region(BoardRegion::Front);
        run(&mut viewer, 1.3);
        let r = rotation(&viewer);
        assert!((r.y - TAU).abs() < 1e-3);
        assert!(r.x.abs() < 1e-4);
        assert!(!viewer.is_animating());
    }

    #[test]
    fn test_clicks_while_locked_change_nothing() {
        let mut viewer = mounted(1200.0);
        viewer.click_region(BoardRegion::Back);
        viewer.advance(0.5);
        let before = viewer.hotspots().clone();

        assert_eq!(viewer.click_region(BoardRegion::Front), ClickOutcome::Locked);
        assert_eq!(viewer.click_region(BoardRegion::Middle), ClickOutcome::Locked);
        assert_eq!(viewer.hotspots(), &before);
        assert!(viewer.is_animating());
        assert_eq!(viewer.active_timelines(), 2);
    }

    #[test]
    fn test_lock_releases_when_jump_lands() {
        let mut viewer = mounted(1200.0);
        viewer.click_region(BoardRegion::Back);
        viewer.advance(1.19);
        assert!(viewer.is_animating());
        viewer.advance(0.02);
        assert!(!viewer.is_animating());
        assert_eq!(
            viewer.click_region(BoardRegion::Front),
            ClickOutcome::Started(Trick::Frontside360)
        );
    }

    #[test]
    fn test_hotspot_is_one_shot() {
        let mut viewer = mounted(1200.0);
        assert!(viewer.hotspot_visible(BoardRegion::Back));
        viewer.click_region(BoardRegion::Back);
        for region in BoardRegion::ALL {
            assert!(!viewer.hotspot_visible(region));
        }
        run(&mut viewer, 2.0);
        assert!(!viewer.hotspot_visible(BoardRegion::Back));
        assert!(viewer.hotspot_visible(BoardRegion::Front));

        assert_eq!(viewer.click_region(BoardRegion::Back), ClickOutcome::Consumed);
        assert!(!viewer.is_animating());
        assert!(!viewer.hotspot_visible(BoardRegion::Back));
    }

    #[test]
    fn test_replay_option_allows_used_region() {
        let mut viewer = SkateboardViewer::new(
            BoardAppearance::default(),
            Viewport::new(1200.0, 800.0),
            ViewerOptions {
                replay_consumed_regions: true,
            },
        );
        viewer.load_model();
        viewer.click_region(BoardRegion::Back);
        run(&mut viewer, 1.5);
        assert_eq!(
            viewer.click_region(BoardRegion::Back),
            ClickOutcome::Started(Trick::Ollie)
        );
        assert!(!viewer.hotspot_visible(BoardRegion::Back));
    }

    #[test]
    fn test_unloaded_viewer_is_inert() {
        let mut viewer = SkateboardViewer::new(
            BoardAppearance::default(),
            Viewport::new(1200.0, 800.0),
            ViewerOptions::default(),
        );
        assert_eq!(viewer.click_region(BoardRegion::Back), ClickOutcome::Unavailable);
        assert!(!viewer.start_idle());
        assert!(viewer.hotspot_markers().is_empty());
        assert_eq!(
            viewer.pointer(&PointerEvent::Pressed {
                button: PointerButton::Primary,
                x: 600.0,
                y: 400.0
            }),
            Some(ClickOutcome::Unavailable)
        );
        viewer.advance(1.0);
        assert_eq!(viewer.active_timelines(), 0);
    }

    #[test]
    fn test_idle_sway_runs_through_tricks() {
        let mut viewer = mounted(1200.0);
        assert!(viewer.start_idle());
        assert!(!viewer.start_idle());

        viewer.click_region(BoardRegion::Middle);
        viewer.advance(1.5);
        assert_eq!(viewer.active_timelines(), 2);
        assert!(viewer.board_transform().unwrap().position.x > CONTAINER_REST.x);

        viewer.advance(1.5);
        let board = viewer.board_transform().unwrap();
        let origin = viewer.origin_transform().unwrap();
        assert!((board.position.x - 0.2).abs() < 1e-4);
        assert!((origin.rotation.y - std::f32::consts::PI / 64.0).abs() < 1e-5);

        viewer.advance(3.0);
        let board = viewer.board_transform().unwrap();
        assert!((board.position.x - CONTAINER_REST.x).abs() < 1e-4);
    }

    #[test]
    fn test_resize_breakpoints_do_not_interrupt_tricks() {
        let mut viewer = mounted(1200.0);
        viewer.click_region(BoardRegion::Back);
        viewer.advance(0.2);
        assert_eq!(viewer.resize(&Viewport::new(500.0, 800.0)), 4.0);
        assert_eq!(viewer.resize(&Viewport::new(800.0, 800.0)), 3.0);
        assert_eq!(viewer.resize(&Viewport::new(1200.0, 800.0)), 2.0);
        assert!(viewer.is_animating());
        assert_eq!(viewer.active_timelines(), 2);
    }

    #[test]
    fn test_pointer_press_picks_each_region() {
        for width in [500.0, 800.0, 1200.0] {
            for region in BoardRegion::ALL {
                let viewer = mounted(width);
                let (x, y) = viewer.region_screen_position(region).unwrap();
                assert_eq!(viewer.pick(x, y), Some(region), "width={width} region={region}");
            }
        }
        let viewer = mounted(1200.0);
        assert_eq!(viewer.pick(2.0, 2.0), None);
    }

    #[test]
    fn test_pointer_press_dispatches_trick() {
        let mut viewer = mounted(1200.0);
        let (x, y) = viewer.region_screen_position(BoardRegion::Middle).unwrap();
        let outcome = viewer.pointer(&PointerEvent::Pressed {
            button: PointerButton::Primary,
            x,
            y,
        });
        assert_eq!(outcome, Some(ClickOutcome::Started(Trick::Kickflip)));
        let miss = viewer.pointer(&PointerEvent::Pressed {
            button: PointerButton::Primary,
            x: 1.0,
            y: 1.0,
        });
        assert_eq!(miss, Some(ClickOutcome::Missed));
    }

    #[test]
    fn test_hover_sets_pointer_cursor() {
        let host = Arc::new(MemoryHost::new(1200.0, 800.0));
        let mut viewer = SkateboardViewer::new(
            BoardAppearance::default(),
            Viewport::new(1200.0, 800.0),
            ViewerOptions::default(),
        )
        .with_host(host.clone());
        viewer.load_model();

        let marker = viewer
            .hotspot_markers()
            .into_iter()
            .find(|m| m.region == BoardRegion::Front)
            .unwrap();
        let (x, y) = viewer
            .camera()
            .project(marker.position, &Viewport::new(1200.0, 800.0))
            .unwrap();

        viewer.pointer(&PointerEvent::Moved { x, y });
        assert_eq!(viewer.cursor(), Cursor::Pointer);
        assert_eq!(host.cursor(), Cursor::Pointer);

        viewer.pointer(&PointerEvent::Moved { x: 1.0, y: 1.0 });
        assert_eq!(host.cursor(), Cursor::Default);
        assert_eq!(host.cursor_history(), vec![Cursor::Pointer, Cursor::Default]);
    }

    #[test]
    fn test_teardown_is_idempotent() {
        let mut viewer = mounted(1200.0);
        viewer.start_idle();
        viewer.click_region(BoardRegion::Back);
        viewer.teardown();
        viewer.teardown();
        assert_eq!(viewer.active_timelines(), 0);
        assert!(!viewer.is_animating());
        viewer.advance(1.0);
    }
}
