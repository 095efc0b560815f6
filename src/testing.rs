//! Shared fixtures for unit tests that drive a single station by hand.

use cgmath::Vector3;

use crate::animation::TransitionScheduler;
use crate::config::EngineConfig;
use crate::definitions::DefinitionRegistry;
use crate::events::EventQueue;
use crate::interaction::{InteractionContext, Request};
use crate::math::Pose;
use crate::picking::Aabb;
use crate::scene::{ObjectId, Scene, SceneObject};
use crate::stations::Interactable;

pub(crate) struct Harness {
    pub scene: Scene,
    pub transitions: TransitionScheduler,
    pub events: EventQueue,
    pub definitions: DefinitionRegistry,
    pub config: EngineConfig,
    pub requests: Vec<Request>,
    pub viewer: Option<Vector3<f32>>,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            transitions: TransitionScheduler::new(),
            events: EventQueue::new(),
            definitions: DefinitionRegistry::new(),
            config: EngineConfig::default(),
            requests: Vec::new(),
            viewer: Some(Vector3::new(0.0, 1.6, 0.0)),
        }
    }

    pub fn add_object(&mut self, id: ObjectId, pose: Pose) {
        self.scene.insert(
            id,
            SceneObject::new(
                format!("object {}", id.0),
                pose,
                Aabb::from_size(Vector3::new(0.2, 0.3, 0.05)),
            ),
        );
    }

    pub fn ctx(&mut self) -> InteractionContext<'_> {
        InteractionContext {
            scene: &mut self.scene,
            transitions: &mut self.transitions,
            events: &mut self.events,
            definitions: &self.definitions,
            config: &self.config,
            viewer: self.viewer,
            requests: &mut self.requests,
        }
    }

    /// Advances transitions and hands completions for `station` back to it
    pub fn step(&mut self, dt: f32, station: &mut dyn Interactable) {
        let finished = self.transitions.advance(dt, &mut self.scene);
        for done in finished {
            if done.object == station.id() {
                station.on_transition_finished(done.tag, &mut self.ctx());
            }
        }
    }
}
