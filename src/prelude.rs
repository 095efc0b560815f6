//! # Nook Prelude
//!
//! Commonly used types for hosts assembling a room and driving the engine.
//!
//! ```
//! use nook::prelude::*;
//!
//! let definitions: DefinitionRegistry = [(ObjectId(1), Definition::new("Atlas", "Maps"))]
//!     .into_iter()
//!     .collect();
//! let mut engine = StationEngine::new(
//!     EngineConfig::default(),
//!     definitions,
//!     Pose::from_position(Vector3::new(-1.0, 1.0, -2.0)),
//!     Pose::from_position(Vector3::new(0.5, 0.75, -1.2)),
//! )
//! .unwrap();
//!
//! engine.insert_object(
//!     ObjectId(1),
//!     SceneObject::new("atlas", Pose::identity(), Aabb::from_size(Vector3::new(0.25, 0.04, 0.3))),
//! );
//! engine.activate(ObjectId(1), StationSpec::FlatBook { side: StackSide::Shelf }).unwrap();
//! engine.tick(0.016, &InputFrame::default());
//! assert_eq!(engine.stack_side(ObjectId(1)), Some(StackSide::Shelf));
//! ```

// Engine and its configuration
pub use crate::config::{EngineConfig, TimingConfig};
pub use crate::engine::{StationEngine, StationSpec};
pub use crate::error::{InteractionError, InteractionResult};

// Scene assembly
pub use crate::camera::{LookController, Viewpoint};
pub use crate::definitions::{Definition, DefinitionRegistry, EffectCategory};
pub use crate::math::Pose;
pub use crate::picking::Aabb;
pub use crate::scene::{AnchorId, ObjectId, Parent, SceneObject};

// Per-tick input and output
pub use crate::events::{AudioCue, EngineEvent};
pub use crate::input::{InputFrame, PointerTracker};

// State queries
pub use crate::persistence::PlacementSnapshot;
pub use crate::stacking::StackSide;
pub use crate::stations::{BookState, DrawerState, FlatBookState};

// Re-export common external dependencies
pub use cgmath::{Deg, InnerSpace, Vector3};
