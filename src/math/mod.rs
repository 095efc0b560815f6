//! # Pose Math
//!
//! Small value types shared by every subsystem. The engine works in a right-handed,
//! Y-up world; all poses are expressed with cgmath vectors and quaternions.

pub mod pose;

pub use pose::Pose;
