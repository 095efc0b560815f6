//! Sliding drawers and the items inside them.

use cgmath::InnerSpace;

use crate::animation::{PoseTarget, TransitionTag};
use crate::config::EngineConfig;
use crate::error::{InteractionError, InteractionResult};
use crate::events::{AudioCue, EngineEvent};
use crate::interaction::{ClickKind, InteractionContext, Request};
use crate::math::Pose;
use crate::scene::{ObjectId, Parent};

use super::traits::{Category, Interactable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawerState {
    Closed,
    Opening,
    Open,
    Closing,
}

impl DrawerState {
    fn name(self) -> &'static str {
        match self {
            DrawerState::Closed => "closed",
            DrawerState::Opening => "opening",
            DrawerState::Open => "open",
            DrawerState::Closing => "closing",
        }
    }
}

/// A drawer slides along its own outward axis. Items inside are only
/// interactable while it is fully open.
#[derive(Debug, Clone)]
pub struct Drawer {
    id: ObjectId,
    state: DrawerState,
    /// Closed pose relative to `parent` (the cabinet), or world when unparented
    closed_local: Pose,
    parent: Option<Parent>,
    contents: Vec<ObjectId>,
}

impl Drawer {
    pub fn new(id: ObjectId, closed_local: Pose, parent: Option<Parent>, contents: Vec<ObjectId>) -> Self {
        Self {
            id,
            state: DrawerState::Closed,
            closed_local,
            parent,
            contents,
        }
    }

    pub fn state(&self) -> DrawerState {
        self.state
    }

    pub fn contents(&self) -> &[ObjectId] {
        &self.contents
    }

    pub fn is_open(&self) -> bool {
        self.state == DrawerState::Open
    }

    pub fn open(&mut self, ctx: &mut InteractionContext<'_>) -> InteractionResult {
        if self.state != DrawerState::Closed {
            return Err(self.rejected("open"));
        }
        self.slide(true, ctx)?;
        ctx.request(Request::DrawerOpened(self.id));
        Ok(())
    }

    /// Closes an open drawer, or reverses one still sliding open from
    /// wherever it has got to
    pub fn close(&mut self, ctx: &mut InteractionContext<'_>) -> InteractionResult {
        if !matches!(self.state, DrawerState::Open | DrawerState::Opening) {
            return Err(self.rejected("close"));
        }
        self.set_contents_visible(false, ctx);
        self.slide(false, ctx)?;
        ctx.request(Request::DrawerClosed(self.id));
        Ok(())
    }

    /// Open pose: the closed pose pushed out along the drawer's own outward
    /// axis, expressed in the parent's frame
    pub fn open_local(&self, config: &EngineConfig) -> Pose {
        let axis = config.drawer.outward_axis.normalize();
        let outward = self.closed_local.transform_vector(axis);
        self.closed_local
            .translated(outward * config.drawer.slide_distance)
    }

    /// Jumps straight to fully open or fully closed without animating
    pub fn snap(&mut self, open: bool, ctx: &mut InteractionContext<'_>) {
        ctx.transitions.abandon(self.id);
        let local = if open {
            self.open_local(ctx.config)
        } else {
            self.closed_local
        };
        ctx.scene.attach(self.id, self.parent, local);
        self.state = if open {
            DrawerState::Open
        } else {
            DrawerState::Closed
        };
        self.sync_contents(ctx);
    }

    /// Shows or hides the contents to match the current state
    pub fn sync_contents(&self, ctx: &mut InteractionContext<'_>) {
        self.set_contents_visible(self.is_open(), ctx);
    }

    fn slide(&mut self, opening: bool, ctx: &mut InteractionContext<'_>) -> InteractionResult {
        let local = if opening {
            self.open_local(ctx.config)
        } else {
            self.closed_local
        };
        let target = match self.parent {
            Some(parent) => PoseTarget::Follow { parent, local },
            None => PoseTarget::Fixed(local),
        };
        let duration = ctx.config.timing.drawer_slide;
        ctx.animate(self.id, target, duration, TransitionTag::DrawerSettled { opened: opening })?;

        let (state, cue) = if opening {
            (DrawerState::Opening, AudioCue::DrawerOpen)
        } else {
            (DrawerState::Closing, AudioCue::DrawerClose)
        };
        self.state = state;
        ctx.events.play(cue, self.id);
        Ok(())
    }

    fn set_contents_visible(&self, visible: bool, ctx: &mut InteractionContext<'_>) {
        for item in &self.contents {
            ctx.scene.set_visible(*item, visible);
            ctx.scene.set_pickable(*item, visible);
        }
        if !self.contents.is_empty() {
            ctx.events.push(EngineEvent::DrawerContentsShown {
                drawer: self.id,
                visible,
            });
        }
    }

    fn rejected(&self, action: &'static str) -> InteractionError {
        InteractionError::InvalidState {
            object: self.id,
            action,
            state: self.state.name(),
        }
    }
}

impl Interactable for Drawer {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn category(&self) -> Category {
        Category::Drawer
    }

    fn on_primary_click(&mut self, click: ClickKind, ctx: &mut InteractionContext<'_>) -> InteractionResult {
        if click == ClickKind::Double {
            return Ok(());
        }
        match self.state {
            DrawerState::Closed => self.open(ctx),
            DrawerState::Open => self.close(ctx),
            _ => Err(self.rejected("toggle")),
        }
    }

    fn on_transition_finished(&mut self, tag: TransitionTag, ctx: &mut InteractionContext<'_>) {
        match (tag, self.state) {
            (TransitionTag::DrawerSettled { opened: true }, DrawerState::Opening) => {
                self.state = DrawerState::Open;
                self.set_contents_visible(true, ctx);
            }
            (TransitionTag::DrawerSettled { opened: false }, DrawerState::Closing) => {
                self.state = DrawerState::Closed;
            }
            (tag, state) => log::debug!("{}: ignoring {tag:?} while {}", self.id, state.name()),
        }
    }

    fn on_deactivate(&mut self, ctx: &mut InteractionContext<'_>) {
        self.snap(false, ctx);
    }

    fn state_name(&self) -> &'static str {
        self.state.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneObject;
    use crate::picking::Aabb;
    use crate::testing::Harness;
    use cgmath::{Deg, Vector3};

    const CABINET: ObjectId = ObjectId(1);
    const DRAWER: ObjectId = ObjectId(2);
    const LETTER: ObjectId = ObjectId(3);

    fn setup(cabinet_yaw: f32) -> (Harness, Drawer) {
        let mut harness = Harness::new();
        let size = Aabb::from_size(Vector3::new(0.4, 0.15, 0.4));
        harness.scene.insert(
            CABINET,
            SceneObject::new(
                "cabinet",
                Pose::from_position_yaw(Vector3::new(2.0, 0.0, -1.0), Deg(cabinet_yaw).into()),
                size,
            ),
        );
        let closed_local = Pose::from_position(Vector3::new(0.0, 0.5, 0.0));
        harness.scene.insert(
            DRAWER,
            SceneObject::new("drawer", Pose::identity(), size)
                .with_parent(Parent::Object(CABINET), closed_local),
        );
        harness.scene.insert(
            LETTER,
            SceneObject::new("letter", Pose::identity(), size)
                .with_parent(Parent::Object(DRAWER), Pose::from_position(Vector3::new(0.0, 0.05, 0.0))),
        );
        let drawer = Drawer::new(DRAWER, closed_local, Some(Parent::Object(CABINET)), vec![LETTER]);
        drawer.sync_contents(&mut harness.ctx());
        (harness, drawer)
    }

    fn settle(harness: &mut Harness, drawer: &mut Drawer) {
        for _ in 0..10 {
            harness.step(0.05, drawer);
        }
    }

    #[test]
    fn opens_along_rotated_outward_axis() {
        let (mut harness, mut drawer) = setup(90.0);
        assert!(!harness.scene.get(LETTER).unwrap().is_interactable());

        drawer.on_primary_click(ClickKind::Single, &mut harness.ctx()).unwrap();
        assert_eq!(drawer.state(), DrawerState::Opening);
        assert_eq!(harness.requests, vec![Request::DrawerOpened(DRAWER)]);
        // contents stay hidden until fully open
        harness.step(0.1, &mut drawer);
        assert!(!harness.scene.get(LETTER).unwrap().is_interactable());

        settle(&mut harness, &mut drawer);
        assert_eq!(drawer.state(), DrawerState::Open);
        assert!(harness.scene.get(LETTER).unwrap().is_interactable());

        // cabinet yawed 90 degrees: local +Z points along world +X
        let pose = harness.scene.world_pose(DRAWER).unwrap();
        let expected = Vector3::new(2.0 + 0.30, 0.5, -1.0);
        assert!((pose.position - expected).magnitude() < 1e-4);
        // contents ride along
        let letter = harness.scene.world_pose(LETTER).unwrap();
        assert!((letter.position - (expected + Vector3::new(0.0, 0.05, 0.0))).magnitude() < 1e-4);
    }

    #[test]
    fn close_hides_contents_immediately_and_returns() {
        let (mut harness, mut drawer) = setup(0.0);
        drawer.open(&mut harness.ctx()).unwrap();
        settle(&mut harness, &mut drawer);

        drawer.on_primary_click(ClickKind::Single, &mut harness.ctx()).unwrap();
        assert_eq!(drawer.state(), DrawerState::Closing);
        assert!(!harness.scene.get(LETTER).unwrap().is_interactable());

        settle(&mut harness, &mut drawer);
        assert_eq!(drawer.state(), DrawerState::Closed);
        let local = harness.scene.get(DRAWER).unwrap().local_pose();
        assert!(local.approx_eq(&Pose::from_position(Vector3::new(0.0, 0.5, 0.0)), 1e-5));
    }

    #[test]
    fn requests_outside_source_state_are_ignored() {
        let (mut harness, mut drawer) = setup(0.0);
        assert!(drawer.close(&mut harness.ctx()).is_err());
        drawer.open(&mut harness.ctx()).unwrap();
        assert!(drawer.open(&mut harness.ctx()).is_err());
        assert!(drawer.on_primary_click(ClickKind::Single, &mut harness.ctx()).is_err());
        assert_eq!(drawer.state(), DrawerState::Opening);
    }

    #[test]
    fn close_reverses_a_drawer_still_opening() {
        let (mut harness, mut drawer) = setup(0.0);
        drawer.open(&mut harness.ctx()).unwrap();
        harness.step(0.1, &mut drawer);
        let part_way = harness.scene.get(DRAWER).unwrap().local_pose();

        drawer.close(&mut harness.ctx()).unwrap();
        assert_eq!(drawer.state(), DrawerState::Closing);
        // restarts from the current pose, no snap
        assert!(harness.scene.get(DRAWER).unwrap().local_pose().approx_eq(&part_way, 1e-6));

        settle(&mut harness, &mut drawer);
        assert_eq!(drawer.state(), DrawerState::Closed);
        assert!(!harness.scene.get(LETTER).unwrap().is_interactable());
        let local = harness.scene.get(DRAWER).unwrap().local_pose();
        assert!(local.approx_eq(&Pose::from_position(Vector3::new(0.0, 0.5, 0.0)), 1e-5));
    }
}
