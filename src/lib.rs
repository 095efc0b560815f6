// src/lib.rs
//! Nook station interaction engine
//!
//! Hover and click handling for heterogeneous objects in a single 3D room:
//! books on a shelf, drawers, scent dispensers and flat-stacked books. Each
//! category runs its own timed state machine, stacked items keep a
//! deterministic layout that reflows whenever membership changes, and any
//! object can be lifted into a shared focus/inspect flow.
//!
//! The engine is headless. Hosts feed it a [`Viewpoint`](camera::Viewpoint),
//! anchor poses and one [`InputFrame`](input::InputFrame) per tick, then drain
//! [`EngineEvent`](events::EngineEvent)s for audio, lighting and UI.

pub mod animation;
pub mod camera;
pub mod config;
pub mod definitions;
pub mod engine;
pub mod error;
pub mod events;
pub mod focus;
pub mod idle;
pub mod input;
pub mod interaction;
pub mod math;
pub mod persistence;
pub mod picking;
pub mod prelude;
pub mod scene;
pub mod stacking;
pub mod stations;

#[cfg(test)]
mod testing;

// Re-export main types for convenience
pub use engine::{StationEngine, StationSpec};
pub use error::{ConfigError, InteractionError, InteractionResult};
