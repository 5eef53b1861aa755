/// Error types for menu loading and validation

use thiserror::Error;

use crate::navigation::Slot;

/// Errors raised while loading or validating a navigation graph.
///
/// Runtime navigation never produces these: unknown ids and unbound
/// objects are no-ops there.
#[derive(Error, Debug)]
pub enum MenuError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON menu: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse text menu: {0}")]
    Parse(String),

    #[error("Face index {0} is out of range (expected 0..=5)")]
    InvalidFace(u8),

    #[error("Screen id '{0}' may only use letters, digits, '-' and '_'")]
    InvalidId(String),

    #[error("Unknown screen '{0}'")]
    UnknownScreen(String),

    #[error("Button '{label}' on screen '{screen}' points to unknown screen '{target}'")]
    DanglingTarget {
        screen: String,
        label: String,
        target: String,
    },

    #[error("Screen '{screen}' has more than one button in the {slot:?} slot")]
    DuplicateSlot { screen: String, slot: Slot },

    #[error("Screen '{0}' is defined more than once")]
    DuplicateScreen(String),

    #[error("Screen stored under key '{key}' declares id '{id}'")]
    IdMismatch { key: String, id: String },

    #[error("Navigation graph has no screens")]
    EmptyGraph,

    #[error("Invalid button layout: {0}")]
    Layout(String),
}

/// Result type alias for menu operations
pub type Result<T> = std::result::Result<T, MenuError>;
