//! Error types for the playback controller

use thiserror::Error;

/// Player errors
#[derive(Debug, Error)]
pub enum PlayerError {
    /// Index does not address an episode of the playlist it was given with
    #[error("Invalid episode index {index} for playlist of length {len}")]
    InvalidIndex { index: usize, len: usize },

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for player operations
pub type Result<T> = std::result::Result<T, PlayerError>;
