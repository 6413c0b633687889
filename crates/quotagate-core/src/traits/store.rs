//! Shared state store trait.

use std::time::Duration;

use async_trait::async_trait;

use crate::result::AppResult;

/// Single-key atomic primitives over the shared store (Redis or in-memory).
///
/// No operation spans more than one key; compound invariants between keys
/// are only eventually consistent. Every removal is a no-op on absent keys.
/// Scan patterns use `*` as the only wildcard.
#[async_trait]
pub trait StateStore: Send + Sync + std::fmt::Debug + 'static {
    /// Get a string value. Returns `None` if the key is absent or expired.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Set a string value with a TTL, overwriting any previous value.
    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()>;

    /// Set a value only if the key does not exist (NX), optionally with a TTL.
    /// Returns `true` if the value was written.
    async fn set_nx(&self, key: &str, value: &str, ttl: Option<Duration>) -> AppResult<bool>;

    /// Delete a key of any type. Returns `true` if it existed.
    async fn delete(&self, key: &str) -> AppResult<bool>;

    /// Decrement an existing integer key by `amount` and return the new value.
    /// Returns `None` without creating the key when it does not exist.
    async fn decr_by_existing(&self, key: &str, amount: i64) -> AppResult<Option<i64>>;

    /// Add a member to a set. Returns `true` if it was not already present.
    async fn set_add(&self, key: &str, member: &str) -> AppResult<bool>;

    /// Remove a member from a set. Returns `true` if it was present.
    async fn set_remove(&self, key: &str, member: &str) -> AppResult<bool>;

    /// List the members of a set (empty when the key is absent).
    async fn set_members(&self, key: &str) -> AppResult<Vec<String>>;

    /// List keys matching a glob pattern, without duplicates.
    async fn scan_keys(&self, pattern: &str) -> AppResult<Vec<String>>;

    /// Delete the key only if it currently holds `expected`.
    async fn delete_if_equals(&self, key: &str, expected: &str) -> AppResult<bool>;

    /// Reset the key's TTL only if it currently holds `expected`.
    async fn expire_if_equals(&self, key: &str, expected: &str, ttl: Duration)
    -> AppResult<bool>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
