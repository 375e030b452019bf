//! # Order Board
//!
//! > **Three order buckets kept consistent under paginated fetches and push events.**
//!
//! A shop dashboard shows its orders in three tabs: live (awaiting the shop), completed
//! (out for delivery or finished) and cancelled. The contents of each tab come from two
//! independent sources:
//!
//! - **Fetches**: paginated, status-filtered requests triggered by the user (initial load,
//!   refresh, pagination, "load more").
//! - **Push events**: new orders, cancellations and status changes arriving at any time,
//!   including while a fetch is in flight.
//!
//! This crate reconciles the two so that an order id is never shown twice, and never in
//! more than one tab.
//!
//! ## 🏗️ Design
//!
//! ### One owner for the board state
//! All bucket state lives in a single [`BoardActor`](framework::BoardActor) task. Both paths
//! talk to it through a [`BoardClient`](framework::BoardClient), and every request
//! (prepend a new order, apply a fetched page, move a cancelled order) is handled as one
//! message. There are no locks, and no event can observe a half-applied page.
//!
//! ### Identifier-keyed mutations
//! Buckets are only changed by id: replace a page, append a page, prepend, remove by id.
//! Nothing is ever addressed by position, which is what makes interleaving safe.
//!
//! ### Last fetch wins
//! Each bucket carries a generation counter. Starting a fetch bumps it; a result whose
//! generation is no longer current is discarded instead of overwriting newer data.
//!
//! ## 🗺️ Module Tour
//!
//! - [`model`]: orders, statuses, pagination, the status-to-bucket policy and the wire
//!   normalization boundary.
//! - [`framework`]: the generic bucket store and the board actor.
//! - [`order_actor`]: the order implementation of [`BoardEntity`](framework::BoardEntity)
//!   and the crate error type.
//! - [`clients`]: the order API seam ([`OrderApi`](clients::OrderApi)) and the fetch client.
//! - [`listener`]: push frames, the event listener and the WebSocket transport.
//! - [`lifecycle`]: configuration, [`OrderBoard`](lifecycle::OrderBoard) startup and
//!   shutdown, tracing setup.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! ORDER_BOARD_API_URL=http://localhost:3000/api \
//! ORDER_BOARD_SOCKET_URL=ws://localhost:3000/ws \
//! RUST_LOG=info cargo run
//! ```
//!
//! ## 🧪 Testing
//!
//! See [`framework::mock`] for asserting board requests without an actor, and
//! [`clients::MockOrderApi`] for scripting the backend.

pub mod clients;
pub mod framework;
pub mod lifecycle;
pub mod listener;
pub mod model;
pub mod order_actor;
