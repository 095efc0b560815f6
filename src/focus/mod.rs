//! # Focus / Inspect
//!
//! Lifts any object to the focus anchor, shows its title and description,
//! and later returns it exactly where it came from. The flow sits beside the
//! station state machines rather than inside them: it captures the object's
//! attachment, borrows its pose for the duration, and restores both.
//!
//! ```text
//! Idle --begin--> Entering --(arrives)--> Inspecting --end--> Leaving --(arrives)--> Idle
//! ```

use crate::animation::{PoseTarget, TransitionTag};
use crate::error::{InteractionError, InteractionResult};
use crate::events::{AudioCue, EngineEvent};
use crate::interaction::InteractionContext;
use crate::math::Pose;
use crate::scene::{AnchorId, ObjectId, Parent};
use crate::stations::clear_hover_cue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPhase {
    Idle,
    Entering,
    Inspecting,
    Leaving,
}

#[derive(Debug, Clone)]
struct FocusSession {
    object: ObjectId,
    title: String,
    description: String,
    origin_parent: Option<Parent>,
    origin_local: Pose,
    phase: FocusPhase,
}

/// At most one focus session at a time
#[derive(Debug, Default)]
pub struct FocusFlow {
    session: Option<FocusSession>,
}

impl FocusFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// True from `begin` until the object is fully back home
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn focused(&self) -> Option<ObjectId> {
        self.session.as_ref().map(|s| s.object)
    }

    pub fn phase(&self) -> FocusPhase {
        self.session
            .as_ref()
            .map_or(FocusPhase::Idle, |s| s.phase)
    }

    pub fn begin(
        &mut self,
        object: ObjectId,
        title: impl Into<String>,
        description: impl Into<String>,
        ctx: &mut InteractionContext<'_>,
    ) -> InteractionResult {
        if let Some(session) = &self.session {
            return Err(InteractionError::FocusBusy(session.object));
        }
        if ctx.transitions.owns_pose(object) {
            return Err(InteractionError::InvalidState {
                object,
                action: "begin focus",
                state: "moving",
            });
        }
        let (origin_parent, origin_local) = ctx
            .scene
            .get(object)
            .map(|o| (o.parent(), o.local_pose()))
            .ok_or(InteractionError::UnknownObject(object))?;

        ctx.scene.detach(object);
        clear_hover_cue(object, ctx);
        let duration = ctx.config.timing.focus_move;
        ctx.animate(
            object,
            PoseTarget::anchor(AnchorId::Focus),
            duration,
            TransitionTag::FocusArrived,
        )?;

        self.session = Some(FocusSession {
            object,
            title: title.into(),
            description: description.into(),
            origin_parent,
            origin_local,
            phase: FocusPhase::Entering,
        });
        log::debug!("focus begins on {object}");
        ctx.events.push(EngineEvent::FocusStarted { object });
        ctx.events.play(AudioCue::FocusLift, object);
        Ok(())
    }

    pub fn end(&mut self, ctx: &mut InteractionContext<'_>) -> InteractionResult {
        let Some(session) = self.session.as_mut() else {
            return Err(InteractionError::FocusIdle);
        };
        let object = session.object;
        if session.phase == FocusPhase::Leaving {
            return Err(InteractionError::InvalidState {
                object,
                action: "end focus",
                state: "leaving",
            });
        }
        if session.phase == FocusPhase::Inspecting {
            ctx.events.push(EngineEvent::FocusPanelHidden { object });
        }

        ctx.scene.detach(object);
        let target = match session.origin_parent {
            Some(parent) => PoseTarget::Follow {
                parent,
                local: session.origin_local,
            },
            None => PoseTarget::Fixed(session.origin_local),
        };
        let duration = ctx.config.timing.focus_move;
        ctx.animate(object, target, duration, TransitionTag::FocusReturned)?;
        session.phase = FocusPhase::Leaving;
        Ok(())
    }

    /// Consumes focus transitions for the focused object. Returns `false` for
    /// anything that belongs to someone else.
    pub fn on_transition_finished(
        &mut self,
        object: ObjectId,
        tag: TransitionTag,
        ctx: &mut InteractionContext<'_>,
    ) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if session.object != object {
            return false;
        }
        match (tag, session.phase) {
            (TransitionTag::FocusArrived, FocusPhase::Entering) => {
                if ctx.scene.anchor(AnchorId::Focus).is_some() {
                    ctx.scene
                        .attach(object, Some(Parent::Anchor(AnchorId::Focus)), Pose::identity());
                }
                session.phase = FocusPhase::Inspecting;
                ctx.events.push(EngineEvent::FocusPanelShown {
                    object,
                    title: session.title.clone(),
                    description: session.description.clone(),
                });
                ctx.events.play(AudioCue::FocusSettle, object);
                true
            }
            (TransitionTag::FocusReturned, FocusPhase::Leaving) => {
                ctx.scene
                    .attach(object, session.origin_parent, session.origin_local);
                self.session = None;
                log::debug!("focus ended on {object}");
                ctx.events.push(EngineEvent::FocusEnded { object });
                true
            }
            _ => false,
        }
    }

    /// Drops the session at once when its object leaves play. The object is
    /// put back under its original attachment without animating.
    pub fn abandon(&mut self, object: ObjectId, ctx: &mut InteractionContext<'_>) -> bool {
        match &self.session {
            Some(session) if session.object == object => {
                if session.phase == FocusPhase::Inspecting {
                    ctx.events.push(EngineEvent::FocusPanelHidden { object });
                }
                ctx.scene
                    .attach(object, session.origin_parent, session.origin_local);
                self.session = None;
                ctx.events.push(EngineEvent::FocusEnded { object });
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Harness;
    use cgmath::{InnerSpace, Vector3};

    const CABINET: ObjectId = ObjectId(1);
    const BOOK: ObjectId = ObjectId(2);

    fn setup() -> Harness {
        let mut harness = Harness::new();
        harness.add_object(CABINET, Pose::from_position(Vector3::new(1.0, 0.8, -2.0)));
        harness.add_object(BOOK, Pose::identity());
        harness.scene.attach(
            BOOK,
            Some(Parent::Object(CABINET)),
            Pose::from_position(Vector3::new(0.0, 0.1, 0.0)),
        );
        harness
            .scene
            .set_anchor(AnchorId::Focus, Pose::from_position(Vector3::new(0.0, 1.5, -0.5)));
        harness
    }

    fn settle(harness: &mut Harness, focus: &mut FocusFlow) {
        for _ in 0..10 {
            let finished = harness.transitions.advance(0.05, &mut harness.scene);
            for done in finished {
                focus.on_transition_finished(done.object, done.tag, &mut harness.ctx());
            }
        }
    }

    #[test]
    fn lifts_to_anchor_and_returns_home() {
        let mut harness = setup();
        let mut focus = FocusFlow::new();
        let home = harness.scene.world_pose(BOOK).unwrap();

        focus.begin(BOOK, "Atlas", "Maps of the old coast", &mut harness.ctx()).unwrap();
        assert!(focus.is_active());
        assert_eq!(focus.phase(), FocusPhase::Entering);

        settle(&mut harness, &mut focus);
        assert_eq!(focus.phase(), FocusPhase::Inspecting);
        assert_eq!(
            harness.scene.get(BOOK).unwrap().parent(),
            Some(Parent::Anchor(AnchorId::Focus))
        );
        assert!(harness.events.iter().any(|e| matches!(
            e,
            EngineEvent::FocusPanelShown { object, title, .. } if *object == BOOK && title == "Atlas"
        )));

        // the anchor is moving with the view; the book stays on it
        let moved = Pose::from_position(Vector3::new(0.3, 1.5, -0.5));
        harness.scene.set_anchor(AnchorId::Focus, moved);
        assert!(harness.scene.world_pose(BOOK).unwrap().approx_eq(&moved, 1e-5));

        focus.end(&mut harness.ctx()).unwrap();
        assert!(focus.is_active());
        settle(&mut harness, &mut focus);

        assert!(!focus.is_active());
        assert_eq!(harness.scene.get(BOOK).unwrap().parent(), Some(Parent::Object(CABINET)));
        let back = harness.scene.world_pose(BOOK).unwrap();
        assert!((back.position - home.position).magnitude() < 1e-5);

        let events = harness.events.drain();
        let hidden = events
            .iter()
            .position(|e| *e == EngineEvent::FocusPanelHidden { object: BOOK })
            .unwrap();
        let ended = events
            .iter()
            .position(|e| *e == EngineEvent::FocusEnded { object: BOOK })
            .unwrap();
        assert!(hidden < ended);
    }

    #[test]
    fn one_session_at_a_time() {
        let mut harness = setup();
        let mut focus = FocusFlow::new();
        assert_eq!(focus.end(&mut harness.ctx()), Err(InteractionError::FocusIdle));

        focus.begin(BOOK, "Atlas", "", &mut harness.ctx()).unwrap();
        assert_eq!(
            focus.begin(CABINET, "Cabinet", "", &mut harness.ctx()),
            Err(InteractionError::FocusBusy(BOOK))
        );
        assert_eq!(focus.focused(), Some(BOOK));
    }

    #[test]
    fn refuses_object_already_in_motion() {
        let mut harness = setup();
        harness
            .ctx()
            .animate(
                BOOK,
                PoseTarget::Fixed(Pose::identity()),
                1.0,
                TransitionTag::StackSettled,
            )
            .unwrap();
        let mut focus = FocusFlow::new();
        assert!(focus.begin(BOOK, "Atlas", "", &mut harness.ctx()).is_err());
        assert!(!focus.is_active());
    }

    #[test]
    fn abandon_restores_attachment() {
        let mut harness = setup();
        let mut focus = FocusFlow::new();
        focus.begin(BOOK, "Atlas", "", &mut harness.ctx()).unwrap();
        harness.transitions.abandon(BOOK);

        assert!(focus.abandon(BOOK, &mut harness.ctx()));
        assert!(!focus.is_active());
        assert_eq!(harness.scene.get(BOOK).unwrap().parent(), Some(Parent::Object(CABINET)));
    }
}
