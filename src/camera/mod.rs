pub mod look_controller;
pub mod viewpoint;

// Re-export main types
pub use look_controller::LookController;
pub use viewpoint::{Viewpoint, ViewpointBounds};
