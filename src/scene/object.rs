use std::fmt;

use cgmath::{Vector3, Zero};

use crate::math::Pose;
use crate::picking::{Aabb, LayerMask};

/// Stable identity of a scene object.
///
/// Assigned by whoever assembles the scene and kept across sessions, so it
/// doubles as the key for definitions and saved placement flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Named target poses maintained outside the engine (usually attached to the viewpoint)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnchorId {
    /// Where a pulled-out book is held while reading
    Reading,
    /// Close-up slot used by the inspect flow
    Focus,
    Custom(u32),
}

/// What an object's local pose is relative to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parent {
    Anchor(AnchorId),
    Object(ObjectId),
}

/// Display-only feedback applied while an object is hovered
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverCue {
    /// Nudge toward the viewer, world space
    pub offset: Vector3<f32>,
    /// Additive brightness bump for the material
    pub brightness: f32,
}

impl Default for HoverCue {
    fn default() -> Self {
        Self {
            offset: Vector3::zero(),
            brightness: 0.0,
        }
    }
}

/// A single entity placed in the scene.
///
/// The object stores its pose relative to its parent (or to the world when it
/// has none). Display offsets from hover cues and idle motion are kept apart
/// from the pose so they never leak into layout or transition math.
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub name: String,
    pub(crate) local: Pose,
    pub(crate) parent: Option<Parent>,
    /// Picking volume in the object's own frame
    pub bounds: Aabb,
    /// Ray-cast layers this object sits on
    pub layers: LayerMask,
    pub visible: bool,
    pub pickable: bool,
    pub highlighted: bool,
    pub cue: HoverCue,
    pub idle_offset: Vector3<f32>,
}

impl SceneObject {
    /// Create a visible, pickable object at a world pose
    pub fn new(name: impl Into<String>, pose: Pose, bounds: Aabb) -> Self {
        Self {
            name: name.into(),
            local: pose,
            parent: None,
            bounds,
            layers: LayerMask::SCENERY,
            visible: true,
            pickable: true,
            highlighted: false,
            cue: HoverCue::default(),
            idle_offset: Vector3::zero(),
        }
    }

    /// Builder-style helper to start the object attached to a parent
    pub fn with_parent(mut self, parent: Parent, local: Pose) -> Self {
        self.parent = Some(parent);
        self.local = local;
        self
    }

    pub fn with_layers(mut self, layers: LayerMask) -> Self {
        self.layers = layers;
        self
    }

    pub fn local_pose(&self) -> Pose {
        self.local
    }

    pub fn parent(&self) -> Option<Parent> {
        self.parent
    }

    /// Visible and accepting rays
    pub fn is_interactable(&self) -> bool {
        self.visible && self.pickable
    }
}
