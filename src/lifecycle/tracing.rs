//! # Observability & Tracing
//!
//! [`setup_tracing`] initializes structured logging with the `tracing` crate. Log lines use
//! a compact format without the module prefix (`with_target(false)`); levels are chosen
//! through `RUST_LOG`.
//!
//! ## What Gets Traced
//!
//! - **Board actor**: startup, shutdown and the final bucket sizes.
//! - **Fetches**: one span per `load_page`/`refresh`/`load_more`, with `bucket` and `page`.
//!   Superseded results are logged at debug level with their `generation`.
//! - **Push events**: every applied event at info level with its `order_id`; malformed
//!   frames at warn level.
//!
//! ## Usage Examples
//!
//! ```bash
//! # Board changes only
//! RUST_LOG=info cargo run
//!
//! # Event payloads and superseded fetches
//! RUST_LOG=debug cargo run
//!
//! # Only the push path
//! RUST_LOG=order_board::listener=debug cargo run
//! ```
//!
//! With `RUST_LOG=info` a typical session looks like:
//!
//! ```text
//! INFO Board started entity_type="Order"
//! INFO refresh: Loaded bucket=live page=1 count=10
//! INFO refresh: Loaded bucket=completed page=1 count=10
//! INFO refresh: Loaded bucket=cancelled page=1 count=3
//! INFO Event listener started
//! INFO New order order_id=66f1c2
//! INFO Order moved order_id=66f1c2 status=current bucket=completed
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
