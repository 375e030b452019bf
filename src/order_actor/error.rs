//! Error types for the order board.

use crate::clients::FetchError;
use crate::framework::FrameworkError;
use crate::lifecycle::ConfigError;
use crate::listener::EventError;
use thiserror::Error;

/// Errors surfaced by board operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BoardError {
    /// Fetching from the order API failed. The affected bucket kept its contents.
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// A push event could not be applied.
    #[error("Invalid event: {0}")]
    Event(#[from] EventError),

    /// The push channel could not be established.
    #[error("Channel error: {0}")]
    Channel(String),

    /// Configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// An error occurred while communicating with the board actor.
    #[error("Actor communication error: {0}")]
    ActorCommunication(#[from] FrameworkError),
}
