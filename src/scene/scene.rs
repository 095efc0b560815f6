// src/scene/scene.rs
use std::collections::{BTreeMap, HashMap};

use crate::math::Pose;
use crate::picking::Aabb;

use super::object::{AnchorId, ObjectId, Parent, SceneObject};

/// Deepest parent chain followed when resolving world poses
const MAX_PARENT_DEPTH: usize = 16;

/// Container for every placed object and the named anchors they can attach to.
///
/// Objects are kept in id order so that iteration (and therefore picking ties
/// and transition completion order) is deterministic.
#[derive(Debug, Default)]
pub struct Scene {
    objects: BTreeMap<ObjectId, SceneObject>,
    anchors: HashMap<AnchorId, Pose>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an object, returning whatever previously used the same id
    pub fn insert(&mut self, id: ObjectId, object: SceneObject) -> Option<SceneObject> {
        self.objects.insert(id, object)
    }

    /// Removes an object. Children that pointed at it are re-rooted in world
    /// space at their current pose.
    pub fn remove(&mut self, id: ObjectId) -> Option<SceneObject> {
        let orphans: Vec<ObjectId> = self
            .objects
            .iter()
            .filter(|(_, object)| object.parent == Some(Parent::Object(id)))
            .map(|(child, _)| *child)
            .collect();
        for child in orphans {
            self.detach(child);
        }
        self.objects.remove(&id)
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(&id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.get_mut(&id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &SceneObject)> {
        self.objects.iter().map(|(id, object)| (*id, object))
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Updates (or creates) a named anchor. Anchors are owned by the camera/scene
    /// collaborator; the engine only reads them.
    pub fn set_anchor(&mut self, anchor: AnchorId, pose: Pose) {
        self.anchors.insert(anchor, pose);
    }

    pub fn anchor(&self, anchor: AnchorId) -> Option<Pose> {
        self.anchors.get(&anchor).copied()
    }

    /// World pose of a parent reference
    pub fn parent_pose(&self, parent: Parent) -> Option<Pose> {
        match parent {
            Parent::Anchor(anchor) => self.anchor(anchor),
            Parent::Object(id) => self.world_pose(id),
        }
    }

    /// World pose of whatever `local` would be under `parent`
    pub fn resolve(&self, parent: Option<Parent>, local: Pose) -> Option<Pose> {
        match parent {
            None => Some(local),
            Some(parent) => self.parent_pose(parent).map(|p| p.compose(&local)),
        }
    }

    /// Resolves the world pose by walking the parent chain.
    ///
    /// Returns `None` for unknown objects, missing anchors, or chains deeper
    /// than [`MAX_PARENT_DEPTH`].
    pub fn world_pose(&self, id: ObjectId) -> Option<Pose> {
        let mut chain = Vec::new();
        let mut cursor = self.objects.get(&id)?;
        let root = loop {
            chain.push(cursor.local);
            match cursor.parent {
                None => break Pose::identity(),
                Some(Parent::Anchor(anchor)) => break self.anchor(anchor)?,
                Some(Parent::Object(next)) => {
                    if chain.len() > MAX_PARENT_DEPTH {
                        log::debug!("parent chain of {id} exceeds depth limit");
                        return None;
                    }
                    cursor = self.objects.get(&next)?;
                }
            }
        };
        Some(chain.iter().rev().fold(root, |acc, local| acc.compose(local)))
    }

    /// World pose plus hover and idle display offsets
    pub fn display_pose(&self, id: ObjectId) -> Option<Pose> {
        let object = self.objects.get(&id)?;
        let pose = self.world_pose(id)?;
        Some(pose.translated(object.cue.offset + object.idle_offset))
    }

    /// Moves an object so that its world pose equals `pose`, keeping its
    /// current parent. Returns `false` if the object or its parent is gone.
    pub fn set_world_pose(&mut self, id: ObjectId, pose: Pose) -> bool {
        let Some(parent) = self.objects.get(&id).map(|o| o.parent) else {
            return false;
        };
        let local = match parent {
            None => pose,
            Some(parent) => match self.parent_pose(parent) {
                Some(parent_pose) => pose.relative_to(&parent_pose),
                None => return false,
            },
        };
        if let Some(object) = self.objects.get_mut(&id) {
            object.local = local;
        }
        true
    }

    /// Re-parents an object with an explicit local pose
    pub fn attach(&mut self, id: ObjectId, parent: Option<Parent>, local: Pose) -> bool {
        if let Some(Parent::Object(target)) = parent {
            if self.is_descendant_or_self(target, id) {
                log::debug!("refusing to attach {id} under its own descendant {target}");
                return false;
            }
        }
        match self.objects.get_mut(&id) {
            Some(object) => {
                object.parent = parent;
                object.local = local;
                true
            }
            None => false,
        }
    }

    /// Re-parents an object without moving it in the world
    pub fn reparent_keep_world(&mut self, id: ObjectId, parent: Option<Parent>) -> bool {
        let Some(world) = self.world_pose(id) else {
            return false;
        };
        let local = match parent {
            None => world,
            Some(p) => match self.parent_pose(p) {
                Some(parent_pose) => world.relative_to(&parent_pose),
                None => return false,
            },
        };
        self.attach(id, parent, local)
    }

    /// Drops the parent link, freezing the object at its current world pose
    pub fn detach(&mut self, id: ObjectId) -> bool {
        self.reparent_keep_world(id, None)
    }

    /// Object bounds transformed to world space
    pub fn world_bounds(&self, id: ObjectId) -> Option<Aabb> {
        let object = self.objects.get(&id)?;
        let pose = self.world_pose(id)?;
        Some(object.bounds.transform(&pose.to_matrix()))
    }

    pub fn set_visible(&mut self, id: ObjectId, visible: bool) {
        if let Some(object) = self.objects.get_mut(&id) {
            object.visible = visible;
        }
    }

    pub fn set_pickable(&mut self, id: ObjectId, pickable: bool) {
        if let Some(object) = self.objects.get_mut(&id) {
            object.pickable = pickable;
        }
    }

    fn is_descendant_or_self(&self, candidate: ObjectId, ancestor: ObjectId) -> bool {
        let mut cursor = Some(candidate);
        for _ in 0..=MAX_PARENT_DEPTH {
            match cursor {
                Some(id) if id == ancestor => return true,
                Some(id) => {
                    cursor = match self.objects.get(&id).and_then(|o| o.parent) {
                        Some(Parent::Object(next)) => Some(next),
                        _ => None,
                    }
                }
                None => return false,
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Deg, InnerSpace, Vector3};

    fn unit_box() -> Aabb {
        Aabb::new(Vector3::new(-0.5, -0.5, -0.5), Vector3::new(0.5, 0.5, 0.5))
    }

    #[test]
    fn child_follows_parent_object() {
        let mut scene = Scene::new();
        let drawer = ObjectId(1);
        let sock = ObjectId(2);
        scene.insert(
            drawer,
            SceneObject::new("drawer", Pose::from_position(Vector3::new(1.0, 0.0, 0.0)), unit_box()),
        );
        scene.insert(
            sock,
            SceneObject::new("sock", Pose::identity(), unit_box())
                .with_parent(Parent::Object(drawer), Pose::from_position(Vector3::new(0.0, 0.1, 0.0))),
        );

        scene.set_world_pose(drawer, Pose::from_position(Vector3::new(1.0, 0.0, 0.3)));
        let world = scene.world_pose(sock).unwrap();
        assert!((world.position - Vector3::new(1.0, 0.1, 0.3)).magnitude() < 1e-5);
    }

    #[test]
    fn anchor_attachment_tracks_moving_anchor() {
        let mut scene = Scene::new();
        let book = ObjectId(7);
        scene.insert(book, SceneObject::new("book", Pose::identity(), unit_box()));
        scene.set_anchor(AnchorId::Reading, Pose::from_position(Vector3::new(0.0, 1.5, 0.0)));
        assert!(scene.attach(book, Some(Parent::Anchor(AnchorId::Reading)), Pose::identity()));

        scene.set_anchor(
            AnchorId::Reading,
            Pose::from_position_yaw(Vector3::new(2.0, 1.5, 0.0), Deg(30.0).into()),
        );
        let world = scene.world_pose(book).unwrap();
        assert!(world.approx_eq(&scene.anchor(AnchorId::Reading).unwrap(), 1e-5));
    }

    #[test]
    fn detach_keeps_world_pose() {
        let mut scene = Scene::new();
        let book = ObjectId(3);
        scene.insert(book, SceneObject::new("book", Pose::identity(), unit_box()));
        scene.set_anchor(AnchorId::Focus, Pose::from_position(Vector3::new(0.0, 2.0, -1.0)));
        scene.attach(book, Some(Parent::Anchor(AnchorId::Focus)), Pose::identity());

        assert!(scene.detach(book));
        scene.set_anchor(AnchorId::Focus, Pose::identity());
        let world = scene.world_pose(book).unwrap();
        assert!((world.position - Vector3::new(0.0, 2.0, -1.0)).magnitude() < 1e-5);
    }

    #[test]
    fn attach_rejects_cycles() {
        let mut scene = Scene::new();
        let a = ObjectId(1);
        let b = ObjectId(2);
        scene.insert(a, SceneObject::new("a", Pose::identity(), unit_box()));
        scene.insert(
            b,
            SceneObject::new("b", Pose::identity(), unit_box())
                .with_parent(Parent::Object(a), Pose::identity()),
        );
        assert!(!scene.attach(a, Some(Parent::Object(b)), Pose::identity()));
        assert!(!scene.attach(a, Some(Parent::Object(a)), Pose::identity()));
    }

    #[test]
    fn missing_anchor_yields_no_pose() {
        let mut scene = Scene::new();
        let book = ObjectId(9);
        scene.insert(
            book,
            SceneObject::new("book", Pose::identity(), unit_box())
                .with_parent(Parent::Anchor(AnchorId::Custom(4)), Pose::identity()),
        );
        assert!(scene.world_pose(book).is_none());
        assert!(!scene.set_world_pose(book, Pose::identity()));
    }
}
