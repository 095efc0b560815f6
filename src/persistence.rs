//! Save/restore boundary.
//!
//! The engine does no file I/O. It hands out a [`PlacementSnapshot`] of the
//! flags a save system needs (which pile each flat book is on, which drawers
//! are open, which source drives each ambient effect) and accepts one back.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::definitions::EffectCategory;
use crate::scene::ObjectId;
use crate::stacking::StackSide;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlacementSnapshot {
    pub stack_sides: BTreeMap<ObjectId, StackSide>,
    pub open_drawers: BTreeSet<ObjectId>,
    pub influences: HashMap<EffectCategory, ObjectId>,
}

impl PlacementSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_side(mut self, id: ObjectId, side: StackSide) -> Self {
        self.stack_sides.insert(id, side);
        self
    }

    pub fn side_of(&self, id: ObjectId) -> Option<StackSide> {
        self.stack_sides.get(&id).copied()
    }

    /// "On display" vs "put away" for one flat book
    pub fn is_on_display(&self, id: ObjectId) -> bool {
        self.side_of(id).is_some_and(StackSide::is_on_display)
    }

    /// Flat books out on display, in id order
    pub fn on_display(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.stack_sides
            .iter()
            .filter(|(_, side)| side.is_on_display())
            .map(|(id, _)| *id)
    }

    pub fn is_empty(&self) -> bool {
        self.stack_sides.is_empty() && self.open_drawers.is_empty() && self.influences.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_queries() {
        let snapshot = PlacementSnapshot::new()
            .with_side(ObjectId(3), StackSide::Display)
            .with_side(ObjectId(1), StackSide::Shelf)
            .with_side(ObjectId(2), StackSide::Display);

        assert!(snapshot.is_on_display(ObjectId(2)));
        assert!(!snapshot.is_on_display(ObjectId(1)));
        assert!(!snapshot.is_on_display(ObjectId(9)));
        assert_eq!(snapshot.on_display().collect::<Vec<_>>(), vec![ObjectId(2), ObjectId(3)]);
        assert!(!snapshot.is_empty());
        assert!(PlacementSnapshot::new().is_empty());
    }
}
