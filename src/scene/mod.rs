//! # Scene Module
//!
//! The minimal scene graph the interaction engine operates on. It stands in for
//! the transform hierarchy a full game engine would provide.
//!
//! ## Key Components
//!
//! - [`Scene`] - Object store plus named anchor poses
//! - [`SceneObject`] - Local pose, parent link, picking bounds and display flags
//! - [`ObjectId`] / [`AnchorId`] - Stable identities for objects and anchors
//!
//! ## Attachment
//!
//! An object's pose is stored relative to its [`Parent`], which may be a named
//! anchor (e.g. the reading anchor that travels with the viewpoint) or another
//! object (e.g. a drawer carrying its contents). World poses are resolved on
//! demand, so anything attached to a moving anchor follows it automatically.

pub mod object;
pub mod scene;

pub use object::{AnchorId, HoverCue, ObjectId, Parent, SceneObject};
pub use scene::Scene;
