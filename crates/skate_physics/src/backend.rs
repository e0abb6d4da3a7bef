//! Rigid-body backend
//!
//! The footer only needs a handful of operations from its physics engine, collected in
//! `PhysicsBackend`. `RapierBackend` implements them on rapier2d. All coordinates are
//! host pixels with y pointing down.

use rapier2d::parry::query::PointQuery;
use rapier2d::prelude::*;
use skate_core::{Size, Vec2};
use slotmap::{new_key_type, SlotMap};
use tracing::trace;

new_key_type! {
    /// Handle to a body owned by a backend
    pub struct BodyHandle;
}

/// Position and angle of a body
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pose {
    pub position: Vec2,
    /// Radians, clockwise on screen
    pub angle: f32,
}

impl Pose {
    pub fn new(position: Vec2, angle: f32) -> Self {
        Self { position, angle }
    }

    /// Body-local point to world
    pub fn to_world(&self, local: Vec2) -> Vec2 {
        self.position + local.rotate(self.angle)
    }

    /// World point to body-local
    pub fn to_local(&self, world: Vec2) -> Vec2 {
        (world - self.position).rotate(-self.angle)
    }
}

/// Material and shape of a dynamic board body
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoardBody {
    pub pose: Pose,
    pub width: f32,
    pub height: f32,
    pub corner_radius: f32,
    pub restitution: f32,
    pub friction: f32,
}

/// What the footer needs from a physics engine
pub trait PhysicsBackend: Send + Sync {
    /// Set gravity in px/s²
    fn set_gravity(&mut self, gravity: Vec2);

    /// Add a fixed rectangle centred at `center`
    fn add_static_rect(&mut self, center: Vec2, size: Size) -> BodyHandle;

    /// Add a dynamic rounded-rectangle body
    fn add_board(&mut self, board: &BoardBody) -> BodyHandle;

    /// Remove a body and its collider. Returns false for unknown handles.
    fn remove(&mut self, handle: BodyHandle) -> bool;

    /// Advance the world by `dt` seconds
    fn step(&mut self, dt: f32);

    /// Remove every body
    fn clear(&mut self);

    fn body_count(&self) -> usize;

    fn pose(&self, handle: BodyHandle) -> Option<Pose>;

    fn linear_velocity(&self, handle: BodyHandle) -> Option<Vec2>;

    fn set_linear_velocity(&mut self, handle: BodyHandle, velocity: Vec2);

    /// Topmost dynamic body containing `point`
    fn body_at_point(&self, point: Vec2) -> Option<BodyHandle>;
}

/// rapier2d world
pub struct RapierBackend {
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    gravity: Vector<Real>,

    handles: SlotMap<BodyHandle, RigidBodyHandle>,
}

impl RapierBackend {
    pub fn new() -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        // Bodies are a few hundred pixels across
        integration_parameters.length_unit = 100.0;

        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            gravity: vector![0.0, 0.0],
            handles: SlotMap::with_key(),
        }
    }

    fn body(&self, handle: BodyHandle) -> Option<&RigidBody> {
        self.handles
            .get(handle)
            .and_then(|h| self.rigid_body_set.get(*h))
    }

    fn insert(&mut self, body: RigidBody, collider: Collider) -> BodyHandle {
        let rapier_handle = self.rigid_body_set.insert(body);
        self.collider_set
            .insert_with_parent(collider, rapier_handle, &mut self.rigid_body_set);
        self.handles.insert(rapier_handle)
    }
}

impl Default for RapierBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsBackend for RapierBackend {
    fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = vector![gravity.x, gravity.y];
    }

    fn add_static_rect(&mut self, center: Vec2, size: Size) -> BodyHandle {
        let body = RigidBodyBuilder::fixed()
            .translation(vector![center.x, center.y])
            .build();
        let collider = ColliderBuilder::cuboid(size.width * 0.5, size.height * 0.5).build();
        self.insert(body, collider)
    }

    fn add_board(&mut self, board: &BoardBody) -> BodyHandle {
        let half_w = board.width * 0.5;
        let half_h = board.height * 0.5;
        let radius = board.corner_radius.min(half_w).min(half_h);

        let body = RigidBodyBuilder::dynamic()
            .translation(vector![board.pose.position.x, board.pose.position.y])
            .rotation(board.pose.angle)
            .build();
        // A rounded cuboid needs a non-empty core; a fully rounded end becomes a capsule
        let collider = ColliderBuilder::round_cuboid(
            (half_w - radius).max(f32::EPSILON),
            (half_h - radius).max(f32::EPSILON),
            radius,
        )
        .restitution(board.restitution)
        .friction(board.friction)
        .build();
        self.insert(body, collider)
    }

    fn remove(&mut self, handle: BodyHandle) -> bool {
        let Some(rapier_handle) = self.handles.remove(handle) else {
            return false;
        };
        self.rigid_body_set.remove(
            rapier_handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
        true
    }

    fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;

        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
        trace!(bodies = self.handles.len(), dt, "physics step");
    }

    fn clear(&mut self) {
        let handles: Vec<BodyHandle> = self.handles.keys().collect();
        for handle in handles {
            self.remove(handle);
        }
    }

    fn body_count(&self) -> usize {
        self.handles.len()
    }

    fn pose(&self, handle: BodyHandle) -> Option<Pose> {
        self.body(handle).map(|body| {
            let t = body.translation();
            Pose::new(Vec2::new(t.x, t.y), body.rotation().angle())
        })
    }

    fn linear_velocity(&self, handle: BodyHandle) -> Option<Vec2> {
        self.body(handle).map(|body| {
            let v = body.linvel();
            Vec2::new(v.x, v.y)
        })
    }

    fn set_linear_velocity(&mut self, handle: BodyHandle, velocity: Vec2) {
        if let Some(rapier_handle) = self.handles.get(handle) {
            if let Some(body) = self.rigid_body_set.get_mut(*rapier_handle) {
                body.set_linvel(vector![velocity.x, velocity.y], true);
            }
        }
    }

    fn body_at_point(&self, point: Vec2) -> Option<BodyHandle> {
        let p = point![point.x, point.y];
        // Later bodies draw on top
        self.handles
            .iter()
            .filter(|(_, rapier_handle)| {
                let Some(body) = self.rigid_body_set.get(**rapier_handle) else {
                    return false;
                };
                body.is_dynamic()
                    && body.colliders().iter().any(|c| {
                        self.collider_set
                            .get(*c)
                            .is_some_and(|collider| {
                                collider.shape().contains_point(collider.position(), &p)
                            })
                    })
            })
            .last()
            .map(|(handle, _)| handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_at(x: f32, y: f32) -> BoardBody {
        BoardBody {
            pose: Pose::new(Vec2::new(x, y), 0.0),
            width: 80.0,
            height: 285.0,
            corner_radius: 40.0,
            restitution: 0.8,
            friction: 0.005,
        }
    }

    #[test]
    fn test_pose_round_trips_points() {
        let pose = Pose::new(Vec2::new(10.0, 20.0), std::f32::consts::FRAC_PI_2);
        let world = pose.to_world(Vec2::new(5.0, 0.0));
        assert!((world.x - 10.0).abs() < 1e-4);
        assert!((world.y - 25.0).abs() < 1e-4);
        let local = pose.to_local(world);
        assert!((local.x - 5.0).abs() < 1e-4 && local.y.abs() < 1e-4);
    }

    #[test]
    fn test_add_and_remove_bodies() {
        let mut backend = RapierBackend::new();
        let wall = backend.add_static_rect(Vec2::new(0.0, 0.0), Size::new(100.0, 20.0));
        let board = backend.add_board(&board_at(50.0, 50.0));
        assert_eq!(backend.body_count(), 2);

        assert!(backend.remove(wall));
        assert!(!backend.remove(wall));
        assert_eq!(backend.body_count(), 1);

        backend.clear();
        assert_eq!(backend.body_count(), 0);
        assert!(backend.pose(board).is_none());
    }

    #[test]
    fn test_gravity_pulls_boards_down() {
        let mut backend = RapierBackend::new();
        backend.set_gravity(Vec2::new(0.0, 500.0));
        let board = backend.add_board(&board_at(100.0, 100.0));
        for _ in 0..30 {
            backend.step(1.0 / 60.0);
        }
        let pose = backend.pose(board).unwrap();
        assert!(pose.position.y > 150.0);
        assert!(backend.linear_velocity(board).unwrap().y > 0.0);
    }

    #[test]
    fn test_floor_stops_falling_board() {
        let mut backend = RapierBackend::new();
        backend.set_gravity(Vec2::new(0.0, 500.0));
        backend.add_static_rect(Vec2::new(200.0, 410.0), Size::new(400.0, 20.0));
        let board = backend.add_board(&board_at(200.0, 100.0));
        for _ in 0..600 {
            backend.step(1.0 / 60.0);
        }
        assert!(backend.pose(board).unwrap().position.y < 400.0);
    }

    #[test]
    fn test_body_at_point_finds_dynamic_bodies_only() {
        let mut backend = RapierBackend::new();
        backend.add_static_rect(Vec2::new(0.0, 0.0), Size::new(100.0, 100.0));
        let board = backend.add_board(&board_at(300.0, 300.0));

        assert_eq!(backend.body_at_point(Vec2::new(300.0, 300.0)), Some(board));
        assert_eq!(backend.body_at_point(Vec2::new(300.0, 420.0)), Some(board));
        assert_eq!(backend.body_at_point(Vec2::new(0.0, 0.0)), None);
        assert_eq!(backend.body_at_point(Vec2::new(500.0, 500.0)), None);
    }
}
