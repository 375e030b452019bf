//! Order-specific board logic: entity implementation, error type and factory.

pub mod entity;
pub mod error;

pub use error::*;

use crate::framework::{BoardActor, BoardClient};
use crate::model::Order;

/// Creates a new Order board actor and its client.
pub fn new(buffer_size: usize, page_size: u32) -> (BoardActor<Order>, BoardClient<Order>) {
    BoardActor::new(buffer_size, page_size)
}
