//! Books lying flat in one of the two piles.
//!
//! A flat book never moves itself. Toggling only flips which pile it belongs
//! to and asks the engine for a reflow; the stack manager then animates it
//! (and its neighbours) into place.

use crate::animation::TransitionTag;
use crate::error::{InteractionError, InteractionResult};
use crate::events::{AudioCue, EngineEvent};
use crate::interaction::{ClickKind, InteractionContext, Request};
use crate::scene::ObjectId;
use crate::stacking::StackSide;

use super::traits::{lift, Category, Interactable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlatBookState {
    AtRest,
    /// A reflow transition is in flight
    Moving,
}

#[derive(Debug, Clone)]
pub struct FlatStackedBook {
    id: ObjectId,
    side: StackSide,
    state: FlatBookState,
}

impl FlatStackedBook {
    pub fn new(id: ObjectId, side: StackSide) -> Self {
        Self {
            id,
            side,
            state: FlatBookState::AtRest,
        }
    }

    pub fn side(&self) -> StackSide {
        self.side
    }

    pub fn state(&self) -> FlatBookState {
        self.state
    }

    pub fn is_on_display(&self) -> bool {
        self.side.is_on_display()
    }

    /// Flips the destination pile and requests a global reflow
    pub fn toggle(&mut self, ctx: &mut InteractionContext<'_>) -> InteractionResult {
        if self.state == FlatBookState::Moving {
            return Err(InteractionError::InvalidState {
                object: self.id,
                action: "toggle",
                state: "moving",
            });
        }
        self.side = self.side.other();
        ctx.events.push(EngineEvent::StackSideChanged {
            object: self.id,
            side: self.side,
        });
        ctx.events.play(AudioCue::StackShuffle, self.id);
        ctx.request(Request::Reflow);
        Ok(())
    }

    /// Sets the side without a reflow; used when restoring saved flags
    pub fn set_side(&mut self, side: StackSide) {
        self.side = side;
    }

    /// Called by the engine whenever it starts a layout transition for this book
    pub fn mark_moving(&mut self) {
        self.state = FlatBookState::Moving;
    }

    pub fn mark_at_rest(&mut self) {
        self.state = FlatBookState::AtRest;
    }
}

impl Interactable for FlatStackedBook {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn category(&self) -> Category {
        Category::FlatStackedBook
    }

    fn is_hoverable(&self) -> bool {
        self.state == FlatBookState::AtRest
    }

    fn on_hover_enter(&mut self, ctx: &mut InteractionContext<'_>) {
        lift(self.id, ctx);
    }

    fn on_primary_click(&mut self, click: ClickKind, ctx: &mut InteractionContext<'_>) -> InteractionResult {
        match click {
            ClickKind::Single => self.toggle(ctx),
            ClickKind::Double => {
                ctx.request(Request::Focus(self.id));
                Ok(())
            }
        }
    }

    fn on_transition_finished(&mut self, tag: TransitionTag, _ctx: &mut InteractionContext<'_>) {
        if tag == TransitionTag::StackSettled {
            self.state = FlatBookState::AtRest;
        }
    }

    fn state_name(&self) -> &'static str {
        match self.state {
            FlatBookState::AtRest => "at rest",
            FlatBookState::Moving => "moving",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Pose;
    use crate::testing::Harness;

    const BOOK: ObjectId = ObjectId(40);

    #[test]
    fn toggle_flips_side_and_requests_reflow() {
        let mut harness = Harness::new();
        harness.add_object(BOOK, Pose::identity());
        let mut book = FlatStackedBook::new(BOOK, StackSide::Shelf);

        book.on_primary_click(ClickKind::Single, &mut harness.ctx()).unwrap();
        assert_eq!(book.side(), StackSide::Display);
        assert_eq!(harness.requests, vec![Request::Reflow]);
        // the book itself has not moved
        assert!(harness.transitions.is_idle());
        assert!(harness.events.iter().any(|e| *e
            == EngineEvent::StackSideChanged {
                object: BOOK,
                side: StackSide::Display
            }));
    }

    #[test]
    fn moving_book_rejects_toggle_and_hover() {
        let mut harness = Harness::new();
        harness.add_object(BOOK, Pose::identity());
        let mut book = FlatStackedBook::new(BOOK, StackSide::Shelf);
        book.mark_moving();

        assert!(!book.is_hoverable());
        assert!(book.toggle(&mut harness.ctx()).is_err());
        assert_eq!(book.side(), StackSide::Shelf);
        assert!(harness.requests.is_empty());

        book.on_transition_finished(TransitionTag::StackSettled, &mut harness.ctx());
        assert_eq!(book.state(), FlatBookState::AtRest);
        assert!(book.is_hoverable());
    }

    #[test]
    fn double_click_requests_focus_without_toggling() {
        let mut harness = Harness::new();
        harness.add_object(BOOK, Pose::identity());
        let mut book = FlatStackedBook::new(BOOK, StackSide::Display);

        book.on_primary_click(ClickKind::Double, &mut harness.ctx()).unwrap();
        assert_eq!(book.side(), StackSide::Display);
        assert_eq!(harness.requests, vec![Request::Focus(BOOK)]);
    }
}
