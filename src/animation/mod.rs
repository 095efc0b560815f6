//! # Transition Primitive
//!
//! Every object state machine moves through the same routine: capture the
//! current pose, pick a target, and ease toward it over a fixed duration.
//!
//! ## Key Components
//!
//! - [`Easing`] - Interpolation curves (smoothstep by default)
//! - [`TransitionScheduler`] - Per-object transition tasks advanced once per tick
//! - [`PoseTarget`] - Fixed pose or a pose that follows a (possibly moving) parent
//! - [`TransitionTag`] - Completion label routed back to the owning state machine
//!
//! Nothing here blocks. A transition is just stored state that the tick loop
//! advances; many objects can be mid-flight in the same tick, but each object
//! has at most one transition at a time.

pub mod easing;
pub mod transition;

pub use easing::Easing;
pub use transition::{FinishedTransition, PoseTarget, Transition, TransitionScheduler, TransitionTag};
