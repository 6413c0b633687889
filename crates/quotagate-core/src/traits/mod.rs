//! Core traits defined in `quotagate-core` and implemented by other crates.

pub mod evictor;
pub mod store;

pub use evictor::SessionEvictor;
pub use store::StateStore;
