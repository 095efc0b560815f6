//! # Interaction
//!
//! Everything between raw pointer input and the station state machines:
//! double-click classification, hover exclusivity, click routing, and the
//! [`InteractionContext`] handed to every station callback.

pub mod click;
pub mod context;
pub mod dispatcher;

pub use click::{ClickClassifier, ClickKind};
pub use context::{InteractionContext, Request};
pub use dispatcher::{HoverSession, InteractionDispatcher};
