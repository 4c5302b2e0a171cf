//! Error types for animation construction.
//!
//! The steady-state tick path never fails; every error here is raised while
//! building timelines, animations or skeletons.

use serde::{Deserialize, Serialize};

/// Errors raised when building animation data.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum AnimationError {
    /// A required builder field was never set
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// A field was set to a value the engine cannot play
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// Two keyframes of one timeline share a tick
    #[error("Duplicate keyframe at tick {tick}")]
    DuplicateKeyframe { tick: u32 },

    /// Two bones of one skeleton share a name
    #[error("Duplicate bone name: {name}")]
    DuplicateBone { name: String },
}

impl AnimationError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// True for errors of the InvalidArgument kind (missing or out-of-range
    /// builder input).
    #[inline]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::MissingField { .. } | Self::InvalidArgument { .. }
        )
    }

    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::MissingField { .. } | Self::InvalidArgument { .. } => "validation",
            Self::DuplicateKeyframe { .. } => "timeline",
            Self::DuplicateBone { .. } => "skeleton",
        }
    }
}

pub type Result<T> = std::result::Result<T, AnimationError>;
