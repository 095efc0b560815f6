//! # Ordered Stacks
//!
//! Flat-stacked items (books lying on a shelf or a table) are laid out
//! algorithmically rather than simulated. A [`Stack`] is an ordered list of
//! `{handle, thickness}` entries over a base anchor; [`layout`] turns the order
//! into poses; [`StackManager`] owns the two destination piles and rebuilds
//! them whenever membership changes.
//!
//! The manager only computes targets. Animating items toward them is the
//! caller's job (the engine hands each [`Placement`] to the transition
//! scheduler).

pub mod layout;
pub mod stack;

pub use layout::{base_offsets, slot_jitter, slot_pose, SlotJitter};
pub use stack::{Placement, Stack, StackEntry, StackManager, StackSide};
