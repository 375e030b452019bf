//! Generic board framework.
//!
//! This module provides the building blocks for keeping three status buckets consistent
//! while two independent writers (page fetches and push events) mutate them.
//!
//! # Main Components
//!
//! - [`BoardEntity`] - Trait that entities shown on the board implement
//! - [`Bucket`] / [`BucketStore`] - Duplicate-free ordered collections with pagination state
//! - [`BoardActor`] - The task that exclusively owns the store
//! - [`BoardClient`] - Typed handle for sending requests to the actor
//!
//! # Testing
//!
//! See [`mock`] module for utilities to test callers without spawning the actor.

pub mod bucket;
pub mod core;
pub mod mock;

pub use self::bucket::*;
pub use self::core::*;
