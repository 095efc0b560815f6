//! Books standing upright on a shelf.
//!
//! ```text
//! OnShelf --pull_out--> PullingOut --(arrives)--> Reading --put_back--> PuttingBack --(arrives)--> OnShelf
//! ```
//!
//! While reading, the book rides on the reading anchor with its solid model
//! hidden and a page surface shown instead.

use crate::animation::{PoseTarget, TransitionTag};
use crate::error::{InteractionError, InteractionResult};
use crate::events::{AudioCue, EngineEvent};
use crate::interaction::{ClickKind, InteractionContext};
use crate::math::Pose;
use crate::scene::{AnchorId, ObjectId, Parent};

use super::traits::{nudge_toward_viewer, Category, Interactable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookState {
    OnShelf,
    PullingOut,
    Reading { spread: usize },
    PuttingBack,
}

impl BookState {
    fn name(self) -> &'static str {
        match self {
            BookState::OnShelf => "on shelf",
            BookState::PullingOut => "pulling out",
            BookState::Reading { .. } => "reading",
            BookState::PuttingBack => "putting back",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ShelvedBook {
    id: ObjectId,
    state: BookState,
    /// Shelf pose captured when the book was activated
    rest_pose: Pose,
}

impl ShelvedBook {
    pub fn new(id: ObjectId, rest_pose: Pose) -> Self {
        Self {
            id,
            state: BookState::OnShelf,
            rest_pose,
        }
    }

    pub fn state(&self) -> BookState {
        self.state
    }

    pub fn rest_pose(&self) -> Pose {
        self.rest_pose
    }

    pub fn is_reading(&self) -> bool {
        matches!(self.state, BookState::Reading { .. })
    }

    /// Current spread while reading
    pub fn spread(&self) -> Option<usize> {
        match self.state {
            BookState::Reading { spread } => Some(spread),
            _ => None,
        }
    }

    pub fn pull_out(&mut self, ctx: &mut InteractionContext<'_>) -> InteractionResult {
        if self.state != BookState::OnShelf {
            return Err(self.rejected("pull out"));
        }
        let duration = ctx.config.timing.book_pull_out;
        ctx.animate(
            self.id,
            PoseTarget::anchor(AnchorId::Reading),
            duration,
            TransitionTag::BookPulledOut,
        )?;
        self.state = BookState::PullingOut;
        ctx.events.play(AudioCue::BookPullOut, self.id);
        Ok(())
    }

    pub fn put_back(&mut self, ctx: &mut InteractionContext<'_>) -> InteractionResult {
        if !self.is_reading() {
            return Err(self.rejected("put back"));
        }
        ctx.scene.detach(self.id);
        ctx.scene.set_visible(self.id, true);
        ctx.events.push(EngineEvent::ReadingClosed { book: self.id });

        let duration = ctx.config.timing.book_put_back;
        ctx.animate(
            self.id,
            PoseTarget::Fixed(self.rest_pose),
            duration,
            TransitionTag::BookReturned,
        )?;
        self.state = BookState::PuttingBack;
        ctx.events.play(AudioCue::BookPutBack, self.id);
        Ok(())
    }

    /// Turns to the next spread; returns the spread now showing
    pub fn next_spread(&mut self, ctx: &mut InteractionContext<'_>) -> InteractionResult<usize> {
        self.turn(1, ctx)
    }

    pub fn previous_spread(&mut self, ctx: &mut InteractionContext<'_>) -> InteractionResult<usize> {
        self.turn(-1, ctx)
    }

    fn turn(&mut self, step: isize, ctx: &mut InteractionContext<'_>) -> InteractionResult<usize> {
        let BookState::Reading { spread } = self.state else {
            return Err(self.rejected("turn pages"));
        };
        let last = self.total_spreads(ctx) - 1;
        let next = spread.saturating_add_signed(step).min(last);
        if next != spread {
            ctx.events.play(AudioCue::PageTurn, self.id);
            self.enter_spread(next, ctx);
        }
        Ok(next)
    }

    fn total_spreads(&self, ctx: &InteractionContext<'_>) -> usize {
        ctx.definitions
            .get(self.id)
            .map(|d| d.spreads)
            .unwrap_or(1)
            .max(1)
    }

    fn enter_spread(&mut self, spread: usize, ctx: &mut InteractionContext<'_>) {
        self.state = BookState::Reading { spread };
        ctx.events.push(EngineEvent::SpreadChanged {
            book: self.id,
            spread,
        });
        let hides_item = ctx
            .definitions
            .get(self.id)
            .is_some_and(|d| d.hides_item_on(spread));
        if hides_item {
            ctx.events.push(EngineEvent::PageViewed {
                book: self.id,
                spread,
            });
        }
    }

    fn arrive_at_reading_anchor(&mut self, ctx: &mut InteractionContext<'_>) {
        if ctx.scene.anchor(AnchorId::Reading).is_some() {
            ctx.scene
                .attach(self.id, Some(Parent::Anchor(AnchorId::Reading)), Pose::identity());
        } else {
            log::debug!("{}: reading anchor vanished, holding in place", self.id);
        }
        ctx.scene.set_visible(self.id, false);
        ctx.events.push(EngineEvent::ReadingOpened {
            book: self.id,
            spread: 0,
        });
        self.enter_spread(0, ctx);
    }

    fn rejected(&self, action: &'static str) -> InteractionError {
        InteractionError::InvalidState {
            object: self.id,
            action,
            state: self.state.name(),
        }
    }
}

impl Interactable for ShelvedBook {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn category(&self) -> Category {
        Category::ShelvedBook
    }

    fn is_hoverable(&self) -> bool {
        self.state == BookState::OnShelf
    }

    fn on_hover_enter(&mut self, ctx: &mut InteractionContext<'_>) {
        nudge_toward_viewer(self.id, ctx);
    }

    fn on_primary_click(&mut self, click: ClickKind, ctx: &mut InteractionContext<'_>) -> InteractionResult {
        match click {
            ClickKind::Single => self.pull_out(ctx),
            ClickKind::Double => Ok(()),
        }
    }

    fn on_transition_finished(&mut self, tag: TransitionTag, ctx: &mut InteractionContext<'_>) {
        match (tag, self.state) {
            (TransitionTag::BookPulledOut, BookState::PullingOut) => self.arrive_at_reading_anchor(ctx),
            (TransitionTag::BookReturned, BookState::PuttingBack) => self.state = BookState::OnShelf,
            (tag, state) => log::debug!("{}: ignoring {tag:?} while {}", self.id, state.name()),
        }
    }

    fn on_deactivate(&mut self, ctx: &mut InteractionContext<'_>) {
        if self.state != BookState::OnShelf {
            ctx.scene.attach(self.id, None, self.rest_pose);
            ctx.scene.set_visible(self.id, true);
            if self.is_reading() {
                ctx.events.push(EngineEvent::ReadingClosed { book: self.id });
            }
            self.state = BookState::OnShelf;
        }
    }

    fn state_name(&self) -> &'static str {
        self.state.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions::Definition;
    use crate::testing::Harness;
    use cgmath::{InnerSpace, Vector3};

    const BOOK: ObjectId = ObjectId(10);

    fn setup() -> (Harness, ShelvedBook) {
        let mut harness = Harness::new();
        let rest = Pose::from_position(Vector3::new(1.0, 1.2, -2.0));
        harness.add_object(BOOK, rest);
        harness.scene.set_anchor(
            AnchorId::Reading,
            Pose::from_position(Vector3::new(0.0, 1.5, -0.4)),
        );
        harness.definitions.insert(
            BOOK,
            Definition::new("Ferns of the Coast", "A field guide")
                .with_spreads(3)
                .with_hidden_item_on(1),
        );
        (harness, ShelvedBook::new(BOOK, rest))
    }

    fn settle(harness: &mut Harness, book: &mut ShelvedBook) {
        for _ in 0..20 {
            harness.step(0.05, book);
        }
    }

    #[test]
    fn pull_out_then_read_then_put_back() {
        let (mut harness, mut book) = setup();

        book.pull_out(&mut harness.ctx()).unwrap();
        assert_eq!(book.state(), BookState::PullingOut);
        assert!(!book.is_hoverable());

        settle(&mut harness, &mut book);
        assert_eq!(book.state(), BookState::Reading { spread: 0 });
        assert!(!harness.scene.get(BOOK).unwrap().visible);
        assert_eq!(
            harness.scene.get(BOOK).unwrap().parent(),
            Some(Parent::Anchor(AnchorId::Reading))
        );

        // the book tracks the anchor as the view moves
        let moved = Pose::from_position(Vector3::new(0.5, 1.5, -0.4));
        harness.scene.set_anchor(AnchorId::Reading, moved);
        assert!(harness.scene.world_pose(BOOK).unwrap().approx_eq(&moved, 1e-5));

        book.put_back(&mut harness.ctx()).unwrap();
        assert_eq!(book.state(), BookState::PuttingBack);
        assert!(!book.is_hoverable());
        settle(&mut harness, &mut book);

        assert_eq!(book.state(), BookState::OnShelf);
        assert!(book.is_hoverable());
        let pose = harness.scene.world_pose(BOOK).unwrap();
        assert!((pose.position - book.rest_pose().position).magnitude() < 1e-5);
        assert_eq!(harness.scene.get(BOOK).unwrap().parent(), None);
    }

    #[test]
    fn guarded_requests_leave_state_alone() {
        let (mut harness, mut book) = setup();

        assert!(book.put_back(&mut harness.ctx()).is_err());
        assert_eq!(book.state(), BookState::OnShelf);

        book.pull_out(&mut harness.ctx()).unwrap();
        settle(&mut harness, &mut book);
        assert!(book.pull_out(&mut harness.ctx()).is_err());
        assert_eq!(book.state(), BookState::Reading { spread: 0 });
    }

    #[test]
    fn spreads_are_bounded_and_page_viewed_fires_per_entry() {
        let (mut harness, mut book) = setup();
        book.pull_out(&mut harness.ctx()).unwrap();
        settle(&mut harness, &mut book);
        harness.events.drain();

        assert_eq!(book.previous_spread(&mut harness.ctx()), Ok(0));
        assert_eq!(book.next_spread(&mut harness.ctx()), Ok(1));
        assert_eq!(book.next_spread(&mut harness.ctx()), Ok(2));
        assert_eq!(book.next_spread(&mut harness.ctx()), Ok(2));
        assert_eq!(book.previous_spread(&mut harness.ctx()), Ok(1));

        let viewed: Vec<usize> = harness
            .events
            .drain()
            .into_iter()
            .filter_map(|e| match e {
                EngineEvent::PageViewed { spread, .. } => Some(spread),
                _ => None,
            })
            .collect();
        // entered spread 1 twice, never re-raised while sitting on it
        assert_eq!(viewed, vec![1, 1]);
    }

    #[test]
    fn double_click_is_ignored() {
        let (mut harness, mut book) = setup();
        book.on_primary_click(ClickKind::Double, &mut harness.ctx()).unwrap();
        assert_eq!(book.state(), BookState::OnShelf);
    }
}
