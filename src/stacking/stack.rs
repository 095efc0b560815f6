// src/stacking/stack.rs
use crate::config::StackLayoutConfig;
use crate::error::{InteractionError, InteractionResult};
use crate::math::Pose;
use crate::scene::ObjectId;

use super::layout::{base_offsets, slot_jitter, slot_pose};

/// The two destination piles a flat item can belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StackSide {
    /// Put away on the bookcase (stack A)
    Shelf,
    /// Out on display on the table (stack B)
    Display,
}

impl StackSide {
    pub const ALL: [StackSide; 2] = [StackSide::Shelf, StackSide::Display];

    pub fn other(self) -> StackSide {
        match self {
            StackSide::Shelf => StackSide::Display,
            StackSide::Display => StackSide::Shelf,
        }
    }

    pub fn is_on_display(self) -> bool {
        self == StackSide::Display
    }
}

/// Membership record; the handle is a plain id so the stack never owns the item
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackEntry {
    pub handle: ObjectId,
    pub thickness: f32,
}

impl StackEntry {
    pub fn new(handle: ObjectId, thickness: f32) -> Self {
        Self {
            handle,
            thickness: thickness.max(0.0),
        }
    }
}

/// Computed target for one entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub handle: ObjectId,
    pub side: StackSide,
    pub index: usize,
    /// Jitter-free height of the slot centre above the base
    pub base_offset: f32,
    pub pose: Pose,
}

/// An ordered pile of flat items sharing one base anchor.
///
/// Order is bottom-to-top insertion order. Spatial poses are always derived
/// from that order, never the reverse.
#[derive(Debug, Clone)]
pub struct Stack {
    side: StackSide,
    base: Pose,
    layout: StackLayoutConfig,
    entries: Vec<StackEntry>,
}

impl Stack {
    pub fn new(side: StackSide, base: Pose, layout: StackLayoutConfig) -> Self {
        Self {
            side,
            base,
            layout,
            entries: Vec::new(),
        }
    }

    pub fn side(&self) -> StackSide {
        self.side
    }

    pub fn base(&self) -> Pose {
        self.base
    }

    pub fn entries(&self) -> &[StackEntry] {
        &self.entries
    }

    pub fn handles(&self) -> Vec<ObjectId> {
        self.entries.iter().map(|e| e.handle).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, handle: ObjectId) -> bool {
        self.index_of(handle).is_some()
    }

    pub fn index_of(&self, handle: ObjectId) -> Option<usize> {
        self.entries.iter().position(|e| e.handle == handle)
    }

    pub fn base_offsets(&self) -> Vec<f32> {
        let thicknesses: Vec<f32> = self.entries.iter().map(|e| e.thickness).collect();
        base_offsets(&thicknesses)
    }

    /// Target for every entry, bottom to top
    pub fn placements(&self) -> Vec<Placement> {
        self.base_offsets()
            .into_iter()
            .zip(&self.entries)
            .enumerate()
            .map(|(index, (base_offset, entry))| self.place(index, entry.handle, base_offset))
            .collect()
    }

    pub fn placement_of(&self, handle: ObjectId) -> Option<Placement> {
        let index = self.index_of(handle)?;
        self.placements().into_iter().nth(index)
    }

    /// Appends to the top. Only the new entry needs a target because nothing
    /// below it changes. A handle already present is rejected and the existing
    /// entry wins.
    pub fn insert(&mut self, entry: StackEntry) -> InteractionResult<Placement> {
        if self.contains(entry.handle) {
            return Err(InteractionError::DuplicateStackEntry(entry.handle));
        }
        let below: f32 = self.entries.iter().map(|e| e.thickness).sum();
        let index = self.entries.len();
        self.entries.push(entry);
        Ok(self.place(index, entry.handle, below + entry.thickness * 0.5))
    }

    /// Removes `handle` and returns fresh targets for every remaining entry.
    /// Removing an absent handle is a no-op and returns nothing.
    pub fn remove(&mut self, handle: ObjectId) -> Vec<Placement> {
        match self.index_of(handle) {
            Some(index) => {
                self.entries.remove(index);
                self.placements()
            }
            None => Vec::new(),
        }
    }

    /// Replaces the whole membership (first occurrence of a handle wins) and
    /// returns targets for all of it
    pub fn rebuild(&mut self, entries: impl IntoIterator<Item = StackEntry>) -> Vec<Placement> {
        self.entries.clear();
        for entry in entries {
            if !self.contains(entry.handle) {
                self.entries.push(entry);
            }
        }
        self.placements()
    }

    /// Moves the base anchor; every entry gets a new target
    pub fn set_base(&mut self, base: Pose) -> Vec<Placement> {
        self.base = base;
        self.placements()
    }

    fn place(&self, index: usize, handle: ObjectId, base_offset: f32) -> Placement {
        let jitter = slot_jitter(index, &self.layout);
        Placement {
            handle,
            side: self.side,
            index,
            base_offset,
            pose: slot_pose(&self.base, base_offset, &jitter),
        }
    }
}

/// Both piles plus the rules for moving items between them.
///
/// An item is in at most one pile at a time.
#[derive(Debug, Clone)]
pub struct StackManager {
    shelf: Stack,
    display: Stack,
}

impl StackManager {
    pub fn new(shelf_base: Pose, display_base: Pose, layout: StackLayoutConfig) -> Self {
        Self {
            shelf: Stack::new(StackSide::Shelf, shelf_base, layout),
            display: Stack::new(StackSide::Display, display_base, layout),
        }
    }

    pub fn stack(&self, side: StackSide) -> &Stack {
        match side {
            StackSide::Shelf => &self.shelf,
            StackSide::Display => &self.display,
        }
    }

    pub fn stack_mut(&mut self, side: StackSide) -> &mut Stack {
        match side {
            StackSide::Shelf => &mut self.shelf,
            StackSide::Display => &mut self.display,
        }
    }

    pub fn side_of(&self, handle: ObjectId) -> Option<StackSide> {
        StackSide::ALL
            .into_iter()
            .find(|side| self.stack(*side).contains(handle))
    }

    pub fn placement_of(&self, handle: ObjectId) -> Option<Placement> {
        let side = self.side_of(handle)?;
        self.stack(side).placement_of(handle)
    }

    /// Appends to one pile; rejected if the item sits in either pile already
    pub fn insert(&mut self, side: StackSide, entry: StackEntry) -> InteractionResult<Placement> {
        if self.side_of(entry.handle).is_some() {
            return Err(InteractionError::DuplicateStackEntry(entry.handle));
        }
        self.stack_mut(side).insert(entry)
    }

    /// Takes the item out of whichever pile holds it; returns that pile's new
    /// targets, or `None` if the item was not stacked
    pub fn remove(&mut self, handle: ObjectId) -> Option<(StackSide, Vec<Placement>)> {
        let side = self.side_of(handle)?;
        Some((side, self.stack_mut(side).remove(handle)))
    }

    /// Remove-from-one plus append-to-other
    pub fn move_to(&mut self, handle: ObjectId, side: StackSide, thickness: f32) -> Vec<Placement> {
        let mut placements = Vec::new();
        match self.side_of(handle) {
            Some(current) if current == side => return placements,
            Some(current) => placements.extend(self.stack_mut(current).remove(handle)),
            None => {}
        }
        match self.stack_mut(side).insert(StackEntry::new(handle, thickness)) {
            Ok(placement) => placements.push(placement),
            Err(err) => log::debug!("move_to {handle}: {err}"),
        }
        placements
    }

    /// Rebuilds both piles from scratch out of `members`, taken in stable
    /// registration order as `(handle, side, thickness)`. Every member of both
    /// piles gets a fresh target.
    pub fn reflow_all(
        &mut self,
        members: impl IntoIterator<Item = (ObjectId, StackSide, f32)>,
    ) -> Vec<Placement> {
        let mut shelf = Vec::new();
        let mut display = Vec::new();
        for (handle, side, thickness) in members {
            let entry = StackEntry::new(handle, thickness);
            match side {
                StackSide::Shelf => shelf.push(entry),
                StackSide::Display => display.push(entry),
            }
        }
        let mut placements = self.shelf.rebuild(shelf);
        placements.extend(self.display.rebuild(display));
        log::trace!(
            "reflowed stacks: {} on shelf, {} on display",
            self.shelf.len(),
            self.display.len()
        );
        placements
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector3;

    fn layout() -> StackLayoutConfig {
        StackLayoutConfig::default()
    }

    fn filled(thicknesses: &[f32]) -> Stack {
        let mut stack = Stack::new(StackSide::Shelf, Pose::identity(), layout());
        for (i, t) in thicknesses.iter().enumerate() {
            stack.insert(StackEntry::new(ObjectId(i as u64), *t)).unwrap();
        }
        stack
    }

    #[test]
    fn insert_places_only_new_entry_on_top() {
        let mut stack = filled(&[0.05, 0.07]);
        let before = stack.placements();
        let placement = stack.insert(StackEntry::new(ObjectId(9), 0.045)).unwrap();

        assert_eq!(placement.index, 2);
        assert!((placement.base_offset - 0.1425).abs() < 1e-6);
        // entries below are unaffected
        assert_eq!(&stack.placements()[..2], &before[..]);
        assert_eq!(stack.placements()[2], placement);
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let mut stack = filled(&[0.05]);
        let err = stack.insert(StackEntry::new(ObjectId(0), 0.2)).unwrap_err();
        assert_eq!(err, InteractionError::DuplicateStackEntry(ObjectId(0)));
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.entries()[0].thickness, 0.05);
    }

    #[test]
    fn removal_reflows_every_remaining_entry() {
        let thicknesses = [0.05, 0.07, 0.045, 0.06, 0.03];
        let mut stack = filled(&thicknesses);
        let old = stack.placements();

        let k = 1;
        let reflowed = stack.remove(ObjectId(k as u64));
        assert_eq!(reflowed.len(), thicknesses.len() - 1);

        // the entry that was at k+1 slides down into slot k
        let slid = reflowed.iter().find(|p| p.handle == ObjectId(k as u64 + 1)).unwrap();
        assert_eq!(slid.index, k);
        let expected = old[k].base_offset - thicknesses[k] * 0.5 + thicknesses[k + 1] * 0.5;
        assert!((slid.base_offset - expected).abs() < 1e-6);
        // slot k's jitter is reused by whoever occupies it
        assert!(slid.pose.rotation == old[k].pose.rotation);
    }

    #[test]
    fn removing_absent_handle_is_noop() {
        let mut stack = filled(&[0.05, 0.07]);
        assert!(stack.remove(ObjectId(42)).is_empty());
        assert_eq!(stack.len(), 2);
    }

    #[test]
    fn slot_appearance_is_independent_of_occupant() {
        let mut a = Stack::new(StackSide::Shelf, Pose::identity(), layout());
        let mut b = Stack::new(StackSide::Shelf, Pose::identity(), layout());
        let pa = a.insert(StackEntry::new(ObjectId(1), 0.05)).unwrap();
        let pb = b.insert(StackEntry::new(ObjectId(2), 0.05)).unwrap();
        assert_eq!(pa.pose, pb.pose);
    }

    #[test]
    fn manager_keeps_items_in_one_pile() {
        let mut manager = StackManager::new(
            Pose::identity(),
            Pose::from_position(Vector3::new(2.0, 0.0, 0.0)),
            layout(),
        );
        manager.insert(StackSide::Shelf, StackEntry::new(ObjectId(1), 0.05)).unwrap();
        assert!(manager.insert(StackSide::Display, StackEntry::new(ObjectId(1), 0.05)).is_err());

        let moved = manager.move_to(ObjectId(1), StackSide::Display, 0.05);
        assert_eq!(moved.len(), 1);
        assert_eq!(moved[0].side, StackSide::Display);
        assert_eq!(manager.side_of(ObjectId(1)), Some(StackSide::Display));
        assert!(manager.stack(StackSide::Shelf).is_empty());

        assert!(manager.move_to(ObjectId(1), StackSide::Display, 0.05).is_empty());
    }

    #[test]
    fn reflow_all_reindexes_both_piles() {
        let mut manager = StackManager::new(Pose::identity(), Pose::identity(), layout());
        let members: Vec<(ObjectId, StackSide, f32)> = (0..5)
            .map(|i| {
                let side = if i == 2 { StackSide::Display } else { StackSide::Shelf };
                (ObjectId(i), side, 0.05)
            })
            .collect();

        let placements = manager.reflow_all(members);
        assert_eq!(placements.len(), 5);
        assert_eq!(
            manager.stack(StackSide::Shelf).handles(),
            vec![ObjectId(0), ObjectId(1), ObjectId(3), ObjectId(4)]
        );
        assert_eq!(manager.stack(StackSide::Display).handles(), vec![ObjectId(2)]);
        assert_eq!(manager.placement_of(ObjectId(3)).unwrap().index, 2);
        assert_eq!(manager.placement_of(ObjectId(2)).unwrap().index, 0);
    }
}
