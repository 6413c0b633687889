//! Active-session bookkeeping and relay eviction.

pub mod eviction;
pub mod registry;
pub mod snapshot;

pub use eviction::EvictionDispatcher;
pub use registry::SessionRegistry;
pub use snapshot::{ActiveSession, SessionSnapshot};
