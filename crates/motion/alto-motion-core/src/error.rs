//! Error types for host-facing operations.
//!
//! Nothing on the scan/trigger path is fatal: unknown motions are warned and
//! skipped, malformed attributes fall back to defaults. These errors surface only
//! where a host hands the core something it cannot act on.

use crate::ids::ElementId;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum MotionError {
    /// Motion name not present in the catalog.
    #[error("unknown motion: {name}")]
    UnknownMotion { name: String },

    /// Element id not present in the document.
    #[error("unknown element: {0:?}")]
    UnknownElement(ElementId),

    /// Element id already used by another node.
    #[error("duplicate element id: {0:?}")]
    DuplicateElement(ElementId),

    /// Trigger mode other than `onLoad` / `onScroll`.
    #[error("invalid trigger: {input}")]
    InvalidTrigger { input: String },

    /// Viewport threshold such as `"top 85%"` that could not be parsed.
    #[error("invalid viewport threshold: {input}")]
    InvalidThreshold { input: String },

    /// Ease string that does not name a known curve.
    #[error("invalid ease: {input}")]
    InvalidEase { input: String },

    /// Configuration or payload that failed to decode.
    #[error("decode error: {reason}")]
    Decode { reason: String },
}

impl From<serde_json::Error> for MotionError {
    fn from(err: serde_json::Error) -> Self {
        MotionError::Decode {
            reason: err.to_string(),
        }
    }
}
