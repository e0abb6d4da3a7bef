//! Scene-node tree
//!
//! Nodes own plain numeric transform fields. The animation scheduler writes those fields
//! directly every frame and the renderer reads them back; nothing is diffed.

use skate_animation::{Animatable, AnimationTargets, Property};
use skate_core::{Affine3, Vec3};
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle to a node in a `SceneGraph`
    pub struct NodeId;
}

/// Local transform: translation plus XYZ Euler rotation (radians)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
}

impl Transform {
    /// Transform at a position with no rotation
    pub fn at(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vec3::new(x, y, z),
            rotation: Vec3::ZERO,
        }
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    /// Parent-from-local matrix
    pub fn matrix(&self) -> Affine3 {
        Affine3::from_translation_euler(self.position, self.rotation)
    }
}

impl Animatable for Transform {
    fn get(&self, property: Property) -> f32 {
        match property {
            Property::PositionX => self.position.x,
            Property::PositionY => self.position.y,
            Property::PositionZ => self.position.z,
            Property::RotationX => self.rotation.x,
            Property::RotationY => self.rotation.y,
            Property::RotationZ => self.rotation.z,
        }
    }

    fn set(&mut self, property: Property, value: f32) {
        match property {
            Property::PositionX => self.position.x = value,
            Property::PositionY => self.position.y = value,
            Property::PositionZ => self.position.z = value,
            Property::RotationX => self.rotation.x = value,
            Property::RotationY => self.rotation.y = value,
            Property::RotationZ => self.rotation.z = value,
        }
    }
}

/// A named group in the scene
#[derive(Clone, Debug)]
pub struct SceneNode {
    pub name: String,
    pub transform: Transform,
    pub parent: Option<NodeId>,
    pub visible: bool,
}

/// Owned tree of scene nodes
#[derive(Default)]
pub struct SceneGraph {
    nodes: SlotMap<NodeId, SceneNode>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node under `parent` (or at the root)
    pub fn add(
        &mut self,
        name: impl Into<String>,
        transform: Transform,
        parent: Option<NodeId>,
    ) -> NodeId {
        self.nodes.insert(SceneNode {
            name: name.into(),
            transform,
            parent,
            visible: true,
        })
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id)
    }

    pub fn transform(&self, id: NodeId) -> Option<Transform> {
        self.nodes.get(id).map(|n| n.transform)
    }

    /// First node with the given name
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, node)| node.name == name)
            .map(|(id, _)| id)
    }

    /// World-from-local matrix, composed up the parent chain
    pub fn world_transform(&self, id: NodeId) -> Option<Affine3> {
        let node = self.nodes.get(id)?;
        let local = node.transform.matrix();
        match node.parent {
            Some(parent) => Some(self.world_transform(parent)?.then(&local)),
            None => Some(local),
        }
    }

    /// Map a point in `id`'s local space to world space
    pub fn to_world(&self, id: NodeId, local: Vec3) -> Option<Vec3> {
        self.world_transform(id).map(|m| m.transform_point(local))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }
}

impl AnimationTargets<NodeId> for SceneGraph {
    fn target_mut(&mut self, key: NodeId) -> Option<&mut dyn Animatable> {
        self.nodes
            .get_mut(key)
            .map(|node| &mut node.transform as &mut dyn Animatable)
    }
}
