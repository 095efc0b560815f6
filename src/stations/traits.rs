//! Capability interface shared by every station category.

use cgmath::{InnerSpace, Vector3, Zero};

use crate::animation::TransitionTag;
use crate::error::InteractionResult;
use crate::interaction::{ClickKind, InteractionContext};
use crate::picking::LayerMask;
use crate::scene::{HoverCue, ObjectId};

/// The kinds of interactive object the dispatcher knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    ShelvedBook,
    Drawer,
    ScentDispenser,
    FlatStackedBook,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::ShelvedBook,
        Category::Drawer,
        Category::ScentDispenser,
        Category::FlatStackedBook,
    ];

    /// Ray-cast layer reserved for this category
    pub fn layer(self) -> LayerMask {
        match self {
            Category::ShelvedBook => LayerMask::layer(1),
            Category::Drawer => LayerMask::layer(2),
            Category::ScentDispenser => LayerMask::layer(3),
            Category::FlatStackedBook => LayerMask::layer(4),
        }
    }

    /// Union of every category's layer
    pub fn interactable_layers() -> LayerMask {
        Self::ALL
            .into_iter()
            .fold(LayerMask::NONE, |mask, category| mask | category.layer())
    }

    pub fn name(self) -> &'static str {
        match self {
            Category::ShelvedBook => "shelved book",
            Category::Drawer => "drawer",
            Category::ScentDispenser => "scent dispenser",
            Category::FlatStackedBook => "flat stacked book",
        }
    }
}

/// What the dispatcher can ask of any station.
///
/// Implementors own their category state; the dispatcher only ever goes
/// through these hooks.
pub trait Interactable {
    fn id(&self) -> ObjectId;

    fn category(&self) -> Category;

    /// Whether the pointer may currently hover this object
    fn is_hoverable(&self) -> bool {
        true
    }

    fn on_hover_enter(&mut self, ctx: &mut InteractionContext<'_>) {
        nudge_toward_viewer(self.id(), ctx);
    }

    fn on_hover_exit(&mut self, ctx: &mut InteractionContext<'_>) {
        clear_hover_cue(self.id(), ctx);
    }

    fn on_primary_click(&mut self, click: ClickKind, ctx: &mut InteractionContext<'_>) -> InteractionResult;

    /// A transition this station started has finished
    fn on_transition_finished(&mut self, _tag: TransitionTag, _ctx: &mut InteractionContext<'_>) {}

    /// The station is being removed from play; in-flight transitions are
    /// already abandoned
    fn on_deactivate(&mut self, _ctx: &mut InteractionContext<'_>) {}

    /// Short lowercase label of the current state, for diagnostics
    fn state_name(&self) -> &'static str;
}

/// Hover cue that slides the object a little toward the viewer
pub fn nudge_toward_viewer(id: ObjectId, ctx: &mut InteractionContext<'_>) {
    let offset = match (ctx.viewer, ctx.scene.world_pose(id)) {
        (Some(eye), Some(pose)) => {
            let toward = eye - pose.position;
            if toward.magnitude2() > f32::EPSILON {
                toward.normalize() * ctx.config.hover.offset
            } else {
                Vector3::zero()
            }
        }
        _ => Vector3::zero(),
    };
    set_cue(
        id,
        HoverCue {
            offset,
            brightness: 0.0,
        },
        ctx,
    );
}

/// Hover cue that brightens the object in place
pub fn brighten(id: ObjectId, ctx: &mut InteractionContext<'_>) {
    let brightness = ctx.config.hover.brightness;
    set_cue(
        id,
        HoverCue {
            offset: Vector3::zero(),
            brightness,
        },
        ctx,
    );
}

/// Hover cue that lifts the object straight up
pub fn lift(id: ObjectId, ctx: &mut InteractionContext<'_>) {
    let offset = Vector3::unit_y() * ctx.config.hover.offset;
    set_cue(
        id,
        HoverCue {
            offset,
            brightness: 0.0,
        },
        ctx,
    );
}

pub fn clear_hover_cue(id: ObjectId, ctx: &mut InteractionContext<'_>) {
    if let Some(object) = ctx.scene.get_mut(id) {
        object.highlighted = false;
        object.cue = HoverCue::default();
    }
}

fn set_cue(id: ObjectId, cue: HoverCue, ctx: &mut InteractionContext<'_>) {
    if let Some(object) = ctx.scene.get_mut(id) {
        object.highlighted = true;
        object.cue = cue;
    }
}
