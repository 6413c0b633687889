//! Route handlers.

pub mod health;
pub mod quota;
pub mod session;
pub mod webhook;
