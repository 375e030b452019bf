//! Pure data structures: orders, pages, buckets and the wire normalization boundary.

pub mod bucket;
pub mod notice;
pub mod order;
pub mod page;
pub mod wire;

pub use bucket::*;
pub use notice::*;
pub use order::*;
pub use page::*;
pub use wire::*;
