//! Error types.
//!
//! Nothing in the interaction engine is fatal. Requests that cannot be honoured
//! come back as an [`InteractionError`] so callers and tests can see why; the
//! dispatcher logs them at debug level and carries on.

use thiserror::Error;

use crate::scene::ObjectId;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InteractionError {
    #[error("{object} cannot {action} while {state}")]
    InvalidState {
        object: ObjectId,
        action: &'static str,
        state: &'static str,
    },

    #[error("a focus session is already active on {0}")]
    FocusBusy(ObjectId),

    #[error("no focus session is active")]
    FocusIdle,

    #[error("{0} is already stacked")]
    DuplicateStackEntry(ObjectId),

    #[error("{0} is not registered")]
    UnknownObject(ObjectId),

    #[error("{0} is already registered")]
    AlreadyRegistered(ObjectId),

    #[error("no book is open for reading")]
    NothingToRead,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("duration `{name}` must be positive, got {value}")]
    NonPositiveDuration { name: &'static str, value: f32 },

    #[error("distance `{name}` must not be negative, got {value}")]
    NegativeDistance { name: &'static str, value: f32 },

    #[error("drawer outward axis must be non-zero")]
    ZeroOutwardAxis,
}

pub type InteractionResult<T = ()> = Result<T, InteractionError>;
