//! Orchestration: configuration, startup and shutdown of the board, and tracing setup.

pub mod config;
pub mod order_board;
pub mod tracing;

pub use config::*;
pub use order_board::*;
pub use self::tracing::setup_tracing;
