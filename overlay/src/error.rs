//! Error types for overlay operations.
//!
//! Public entry points never surface these: a failed lookup aborts the
//! requested operation and is logged at debug level. Internal helpers return
//! them so the abort path reads as `?`.

use thiserror::Error;
use uitree::NodeId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OverlayError {
    #[error("no node for target {0}")]
    TargetNotFound(i32),

    #[error("node {0} is gone")]
    NodeGone(NodeId),

    #[error("node {0} is not mounted under root")]
    NotMounted(NodeId),

    #[error("node {0} is already being removed")]
    AlreadyRemoving(NodeId),

    #[error("popup for target {0} is already exiting")]
    AlreadyExiting(i32),

    #[error("popup for target {0} has no pending update")]
    NoPendingUpdate(i32),

    #[error("node {node} is not a {expected}")]
    WrongPattern { node: NodeId, expected: &'static str },

    #[error("modal stack is empty")]
    EmptyModalStack,

    #[error("no dialog with id {0}")]
    DialogNotFound(i32),

    #[error("no sheet bound to target {0}")]
    SheetNotFound(i32),

    #[error("no popup record for target {0}")]
    PopupNotFound(i32),

    #[error("no menu registered for target {0}")]
    MenuNotFound(i32),
}

/// Errors raised while loading a theme.
#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("invalid theme json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid theme value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, OverlayError>;
