use cgmath::Vector3;

use crate::animation::{PoseTarget, TransitionScheduler, TransitionTag};
use crate::config::EngineConfig;
use crate::definitions::{DefinitionRegistry, EffectCategory};
use crate::error::InteractionResult;
use crate::events::EventQueue;
use crate::scene::{ObjectId, Scene};

/// Follow-up work a state machine cannot do on its own because it involves
/// other objects. The engine services these after the callback returns.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    /// Rebuild both flat stacks from the registry
    Reflow,
    /// Lift this object into the inspect flow
    Focus(ObjectId),
    /// Make `source` the only active source of `effect`
    ActivateInfluence {
        source: ObjectId,
        effect: EffectCategory,
    },
    DrawerOpened(ObjectId),
    DrawerClosed(ObjectId),
}

/// Everything a state machine may touch while handling a callback
pub struct InteractionContext<'a> {
    pub scene: &'a mut Scene,
    pub transitions: &'a mut TransitionScheduler,
    pub events: &'a mut EventQueue,
    pub definitions: &'a DefinitionRegistry,
    pub config: &'a EngineConfig,
    /// Eye position of the active viewpoint, when there is one
    pub viewer: Option<Vector3<f32>>,
    pub requests: &'a mut Vec<Request>,
}

impl InteractionContext<'_> {
    /// Starts (or restarts) a transition with the configured easing
    pub fn animate(
        &mut self,
        object: ObjectId,
        target: PoseTarget,
        duration: f32,
        tag: TransitionTag,
    ) -> InteractionResult {
        self.transitions
            .start(self.scene, object, target, duration, self.config.easing, tag)
            .map(|_| ())
    }

    pub fn request(&mut self, request: Request) {
        self.requests.push(request);
    }
}
