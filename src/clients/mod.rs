//! The fetch side of the board: the backend API seam and the client that applies its
//! results to the board actor.

pub mod board_client;
pub mod mock;
pub mod order_api;

pub use board_client::*;
pub use mock::MockOrderApi;
pub use order_api::*;
