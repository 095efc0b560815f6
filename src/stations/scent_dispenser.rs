use crate::definitions::EffectCategory;
use crate::error::InteractionResult;
use crate::events::{AudioCue, EngineEvent};
use crate::interaction::{ClickKind, InteractionContext, Request};
use crate::scene::ObjectId;

use super::traits::{brighten, Category, Interactable};

/// A spray bottle or diffuser that drives one ambient effect.
///
/// It has no animated states. Every trigger fires a burst and claims the
/// effect; the engine switches off whichever source held it before.
#[derive(Debug, Clone)]
pub struct ScentDispenser {
    id: ObjectId,
    effect: EffectCategory,
    active: bool,
    triggers: u32,
}

impl ScentDispenser {
    pub fn new(id: ObjectId, effect: EffectCategory) -> Self {
        Self {
            id,
            effect,
            active: false,
            triggers: 0,
        }
    }

    pub fn effect(&self) -> &EffectCategory {
        &self.effect
    }

    /// Whether this dispenser is the live source for its effect
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn trigger_count(&self) -> u32 {
        self.triggers
    }

    pub fn trigger(&mut self, ctx: &mut InteractionContext<'_>) {
        self.triggers += 1;
        ctx.events.push(EngineEvent::ParticleBurst {
            source: self.id,
            effect: self.effect.clone(),
        });
        ctx.events.play(AudioCue::Spray, self.id);
        ctx.request(Request::ActivateInfluence {
            source: self.id,
            effect: self.effect.clone(),
        });
    }

    /// Set by the engine's influence bookkeeping
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}

impl Interactable for ScentDispenser {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn category(&self) -> Category {
        Category::ScentDispenser
    }

    fn on_hover_enter(&mut self, ctx: &mut InteractionContext<'_>) {
        brighten(self.id, ctx);
    }

    fn on_primary_click(&mut self, click: ClickKind, ctx: &mut InteractionContext<'_>) -> InteractionResult {
        if click == ClickKind::Single {
            self.trigger(ctx);
        }
        Ok(())
    }

    fn state_name(&self) -> &'static str {
        if self.active {
            "active"
        } else {
            "idle"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Pose;
    use crate::testing::Harness;

    #[test]
    fn retriggers_freely() {
        let mut harness = Harness::new();
        let id = ObjectId(5);
        harness.add_object(id, Pose::identity());
        let mut dispenser = ScentDispenser::new(id, EffectCategory::new("lavender"));

        for _ in 0..3 {
            dispenser
                .on_primary_click(ClickKind::Single, &mut harness.ctx())
                .unwrap();
        }
        assert_eq!(dispenser.trigger_count(), 3);
        let bursts = harness
            .events
            .iter()
            .filter(|e| matches!(e, EngineEvent::ParticleBurst { .. }))
            .count();
        assert_eq!(bursts, 3);
        assert_eq!(harness.requests.len(), 3);
        assert!(harness.requests.iter().all(|r| matches!(
            r,
            Request::ActivateInfluence { source, .. } if *source == id
        )));
    }

    #[test]
    fn double_click_does_nothing() {
        let mut harness = Harness::new();
        let id = ObjectId(5);
        harness.add_object(id, Pose::identity());
        let mut dispenser = ScentDispenser::new(id, EffectCategory::new("cedar"));
        dispenser
            .on_primary_click(ClickKind::Double, &mut harness.ctx())
            .unwrap();
        assert!(harness.events.is_empty());
        assert!(harness.requests.is_empty());
    }

    #[test]
    fn hover_brightens_without_moving() {
        let mut harness = Harness::new();
        let id = ObjectId(5);
        harness.add_object(id, Pose::identity());
        let mut dispenser = ScentDispenser::new(id, EffectCategory::new("cedar"));
        dispenser.on_hover_enter(&mut harness.ctx());
        let object = harness.scene.get(id).unwrap();
        assert!(object.highlighted);
        assert!(object.cue.brightness > 0.0);
        assert_eq!(object.cue.offset, cgmath::Vector3::new(0.0, 0.0, 0.0));
    }
}
