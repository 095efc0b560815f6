// src/animation/transition.rs
use std::collections::BTreeMap;

use crate::error::{InteractionError, InteractionResult};
use crate::math::Pose;
use crate::scene::{ObjectId, Parent, Scene};

use super::easing::Easing;

/// Where a transition is heading
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PoseTarget {
    /// A fixed world pose
    Fixed(Pose),
    /// `local` under a parent that may itself be moving; re-resolved every tick
    Follow { parent: Parent, local: Pose },
}

impl PoseTarget {
    pub fn anchor(anchor: crate::scene::AnchorId) -> Self {
        PoseTarget::Follow {
            parent: Parent::Anchor(anchor),
            local: Pose::identity(),
        }
    }

    fn resolve(&self, scene: &Scene) -> Option<Pose> {
        match self {
            PoseTarget::Fixed(pose) => Some(*pose),
            PoseTarget::Follow { parent, local } => scene.resolve(Some(*parent), *local),
        }
    }
}

/// What finishing a transition means to its owner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionTag {
    BookPulledOut,
    BookReturned,
    DrawerSettled { opened: bool },
    StackSettled,
    FocusArrived,
    FocusReturned,
}

/// One in-flight pose animation
#[derive(Debug, Clone)]
pub struct Transition {
    start: Pose,
    target: PoseTarget,
    last_target: Pose,
    duration: f32,
    elapsed: f32,
    easing: Easing,
    tag: TransitionTag,
}

impl Transition {
    pub fn tag(&self) -> TransitionTag {
        self.tag
    }

    pub fn target(&self) -> PoseTarget {
        self.target
    }

    /// Linear progress in `[0, 1]`
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }
}

/// A transition that ran to completion this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinishedTransition {
    pub object: ObjectId,
    pub tag: TransitionTag,
}

/// Per-object transition tasks advanced once per tick.
///
/// Each object has at most one transition. Starting another cancels the old one
/// outright and begins from the object's current pose; cancelled transitions
/// never report completion. While a transition is registered for an object it
/// owns that object's pose; see [`TransitionScheduler::owns_pose`].
#[derive(Debug, Default)]
pub struct TransitionScheduler {
    tasks: BTreeMap<ObjectId, Transition>,
}

impl TransitionScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin animating `object` toward `target`.
    ///
    /// Returns the tag of the transition that was superseded, if any.
    pub fn start(
        &mut self,
        scene: &Scene,
        object: ObjectId,
        target: PoseTarget,
        duration: f32,
        easing: Easing,
        tag: TransitionTag,
    ) -> InteractionResult<Option<TransitionTag>> {
        let start = scene
            .world_pose(object)
            .ok_or(InteractionError::UnknownObject(object))?;
        let last_target = target.resolve(scene).unwrap_or(start);

        let replaced = self.tasks.insert(
            object,
            Transition {
                start,
                target,
                last_target,
                duration: duration.max(0.0),
                elapsed: 0.0,
                easing,
                tag,
            },
        );
        if let Some(old) = &replaced {
            log::trace!("{object}: {:?} superseded by {:?}", old.tag, tag);
        }
        Ok(replaced.map(|t| t.tag))
    }

    /// Drops an in-flight transition without completing it
    pub fn abandon(&mut self, object: ObjectId) -> Option<Transition> {
        self.tasks.remove(&object)
    }

    /// True while a transition is writing this object's pose
    pub fn owns_pose(&self, object: ObjectId) -> bool {
        self.tasks.contains_key(&object)
    }

    pub fn get(&self, object: ObjectId) -> Option<&Transition> {
        self.tasks.get(&object)
    }

    pub fn active_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_idle(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Advances every transition by `dt` seconds and writes the eased pose into
    /// the scene. Finished transitions are removed and reported in object-id
    /// order. Tasks whose object has left the scene are dropped silently.
    pub fn advance(&mut self, dt: f32, scene: &mut Scene) -> Vec<FinishedTransition> {
        let dt = dt.max(0.0);
        let mut finished = Vec::new();
        let mut orphaned = Vec::new();

        for (&object, task) in self.tasks.iter_mut() {
            task.elapsed += dt;
            if let Some(target) = task.target.resolve(scene) {
                task.last_target = target;
            }
            let t = task.easing.apply(task.progress());
            let pose = task.start.interpolate(&task.last_target, t);
            if !scene.set_world_pose(object, pose) {
                orphaned.push(object);
                continue;
            }
            if task.progress() >= 1.0 {
                finished.push(FinishedTransition {
                    object,
                    tag: task.tag,
                });
            }
        }

        for object in orphaned {
            log::debug!("{object} left the scene mid-transition");
            self.tasks.remove(&object);
        }
        for done in &finished {
            self.tasks.remove(&done.object);
        }
        finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::picking::Aabb;
    use crate::scene::{AnchorId, SceneObject};
    use cgmath::{InnerSpace, Vector3};

    fn scene_with(id: ObjectId, at: Vector3<f32>) -> Scene {
        let mut scene = Scene::new();
        scene.insert(
            id,
            SceneObject::new("thing", Pose::from_position(at), Aabb::from_size(Vector3::new(0.1, 0.1, 0.1))),
        );
        scene
    }

    fn position(scene: &Scene, id: ObjectId) -> Vector3<f32> {
        scene.world_pose(id).unwrap().position
    }

    #[test]
    fn runs_to_target_and_reports_once() {
        let id = ObjectId(1);
        let mut scene = scene_with(id, Vector3::new(0.0, 0.0, 0.0));
        let mut scheduler = TransitionScheduler::new();
        let target = Pose::from_position(Vector3::new(1.0, 0.0, 0.0));

        scheduler
            .start(&scene, id, PoseTarget::Fixed(target), 0.25, Easing::SmoothStep, TransitionTag::StackSettled)
            .unwrap();
        assert!(scheduler.owns_pose(id));

        let mut reports = Vec::new();
        for _ in 0..10 {
            reports.extend(scheduler.advance(0.05, &mut scene));
        }

        assert_eq!(reports, vec![FinishedTransition { object: id, tag: TransitionTag::StackSettled }]);
        assert!(!scheduler.owns_pose(id));
        assert!((position(&scene, id) - target.position).magnitude() < 1e-6);
    }

    #[test]
    fn eased_progress_lags_linear_early() {
        let id = ObjectId(1);
        let mut scene = scene_with(id, Vector3::new(0.0, 0.0, 0.0));
        let mut scheduler = TransitionScheduler::new();
        scheduler
            .start(
                &scene,
                id,
                PoseTarget::Fixed(Pose::from_position(Vector3::new(1.0, 0.0, 0.0))),
                1.0,
                Easing::SmoothStep,
                TransitionTag::StackSettled,
            )
            .unwrap();

        scheduler.advance(0.1, &mut scene);
        let x = position(&scene, id).x;
        assert!(x > 0.0 && x < 0.1);
    }

    #[test]
    fn restart_cancels_and_starts_from_current_pose() {
        let id = ObjectId(1);
        let mut scene = scene_with(id, Vector3::new(0.0, 0.0, 0.0));
        let mut scheduler = TransitionScheduler::new();
        let first = Pose::from_position(Vector3::new(1.0, 0.0, 0.0));
        let second = Pose::from_position(Vector3::new(0.0, 1.0, 0.0));

        scheduler
            .start(&scene, id, PoseTarget::Fixed(first), 1.0, Easing::Linear, TransitionTag::BookPulledOut)
            .unwrap();
        scheduler.advance(0.5, &mut scene);
        let midway = position(&scene, id);

        let replaced = scheduler
            .start(&scene, id, PoseTarget::Fixed(second), 1.0, Easing::Linear, TransitionTag::StackSettled)
            .unwrap();
        assert_eq!(replaced, Some(TransitionTag::BookPulledOut));

        // zero-length step keeps the object where the first transition left it
        scheduler.advance(0.0, &mut scene);
        assert!((position(&scene, id) - midway).magnitude() < 1e-6);

        let finished = scheduler.advance(1.0, &mut scene);
        assert_eq!(finished.len(), 1);
        assert_eq!(finished[0].tag, TransitionTag::StackSettled);
        assert!((position(&scene, id) - second.position).magnitude() < 1e-6);
    }

    #[test]
    fn follows_moving_anchor() {
        let id = ObjectId(2);
        let mut scene = scene_with(id, Vector3::new(0.0, 0.0, 0.0));
        scene.set_anchor(AnchorId::Reading, Pose::from_position(Vector3::new(0.0, 1.0, 0.0)));
        let mut scheduler = TransitionScheduler::new();
        scheduler
            .start(&scene, id, PoseTarget::anchor(AnchorId::Reading), 0.2, Easing::SmoothStep, TransitionTag::BookPulledOut)
            .unwrap();

        scheduler.advance(0.1, &mut scene);
        scene.set_anchor(AnchorId::Reading, Pose::from_position(Vector3::new(2.0, 1.0, 0.0)));
        scheduler.advance(0.1, &mut scene);

        assert!((position(&scene, id) - Vector3::new(2.0, 1.0, 0.0)).magnitude() < 1e-6);
    }

    #[test]
    fn abandoned_transitions_never_report() {
        let id = ObjectId(3);
        let mut scene = scene_with(id, Vector3::new(0.0, 0.0, 0.0));
        let mut scheduler = TransitionScheduler::new();
        scheduler
            .start(
                &scene,
                id,
                PoseTarget::Fixed(Pose::identity()),
                0.1,
                Easing::SmoothStep,
                TransitionTag::FocusArrived,
            )
            .unwrap();
        assert!(scheduler.abandon(id).is_some());
        assert!(scheduler.advance(1.0, &mut scene).is_empty());
    }

    #[test]
    fn unknown_object_is_rejected() {
        let scene = Scene::new();
        let mut scheduler = TransitionScheduler::new();
        let result = scheduler.start(
            &scene,
            ObjectId(99),
            PoseTarget::Fixed(Pose::identity()),
            0.1,
            Easing::Linear,
            TransitionTag::StackSettled,
        );
        assert_eq!(result, Err(InteractionError::UnknownObject(ObjectId(99))));
    }
}
