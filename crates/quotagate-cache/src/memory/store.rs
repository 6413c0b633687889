//! In-memory state store using the dashmap crate.
//!
//! Mirrors the Redis data model closely enough for single-node deployments:
//! string values with optional expiry, integers stored as strings, and sets.
//! Expiry uses the tokio clock so paused-time tests can advance past a TTL.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::time::Instant;

use quotagate_core::error::AppError;
use quotagate_core::result::AppResult;
use quotagate_core::traits::store::StateStore;

/// A string value with an optional deadline.
#[derive(Debug, Clone)]
struct ScalarEntry {
    value: String,
    expires_at: Option<Instant>,
}

impl ScalarEntry {
    fn new(value: &str, ttl: Option<Duration>) -> Self {
        Self {
            value: value.to_string(),
            expires_at: ttl.map(|ttl| Instant::now() + ttl),
        }
    }

    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|deadline| now < deadline)
    }
}

/// In-process store provider.
#[derive(Debug, Clone, Default)]
pub struct MemoryStateStore {
    /// String and integer values.
    scalars: Arc<DashMap<String, ScalarEntry>>,
    /// Set values.
    sets: Arc<DashMap<String, HashSet<String>>>,
}

impl MemoryStateStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop a scalar if it has expired, returning whether a live one remains.
    fn purge_if_expired(&self, key: &str, now: Instant) -> bool {
        self.scalars
            .remove_if(key, |_, entry| !entry.is_live(now))
            .is_none()
            && self.scalars.contains_key(key)
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let now = Instant::now();
        let found = self.scalars.get(key).map(|entry| entry.clone());
        match found {
            Some(entry) if entry.is_live(now) => Ok(Some(entry.value)),
            Some(_) => {
                self.purge_if_expired(key, now);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        self.sets.remove(key);
        self.scalars
            .insert(key.to_string(), ScalarEntry::new(value, Some(ttl)));
        Ok(())
    }

    async fn set_nx(&self, key: &str, value: &str, ttl: Option<Duration>) -> AppResult<bool> {
        if self.sets.contains_key(key) {
            return Ok(false);
        }
        let now = Instant::now();
        match self.scalars.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().is_live(now) {
                    Ok(false)
                } else {
                    occupied.insert(ScalarEntry::new(value, ttl));
                    Ok(true)
                }
            }
            Entry::Vacant(vacant) => {
                vacant.insert(ScalarEntry::new(value, ttl));
                Ok(true)
            }
        }
    }

    async fn delete(&self, key: &str) -> AppResult<bool> {
        let now = Instant::now();
        let scalar = self
            .scalars
            .remove(key)
            .is_some_and(|(_, entry)| entry.is_live(now));
        let set = self.sets.remove(key).is_some();
        Ok(scalar || set)
    }

    async fn decr_by_existing(&self, key: &str, amount: i64) -> AppResult<Option<i64>> {
        let now = Instant::now();
        if !self.purge_if_expired(key, now) {
            return Ok(None);
        }
        let Some(mut entry) = self.scalars.get_mut(key) else {
            return Ok(None);
        };
        let current: i64 = entry.value.parse().map_err(|_| {
            AppError::store(format!("Value at '{key}' is not an integer"))
        })?;
        let next = current - amount;
        entry.value = next.to_string();
        Ok(Some(next))
    }

    async fn set_add(&self, key: &str, member: &str) -> AppResult<bool> {
        self.scalars.remove(key);
        Ok(self
            .sets
            .entry(key.to_string())
            .or_default()
            .insert(member.to_string()))
    }

    async fn set_remove(&self, key: &str, member: &str) -> AppResult<bool> {
        let removed = match self.sets.get_mut(key) {
            Some(mut members) => members.remove(member),
            None => false,
        };
        // Redis drops a set once its last member is removed.
        self.sets.remove_if(key, |_, members| members.is_empty());
        Ok(removed)
    }

    async fn set_members(&self, key: &str) -> AppResult<Vec<String>> {
        Ok(self
            .sets
            .get(key)
            .map(|members| members.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn scan_keys(&self, pattern: &str) -> AppResult<Vec<String>> {
        let now = Instant::now();
        let mut keys = BTreeSet::new();

        for entry in self.scalars.iter() {
            if entry.value().is_live(now) && glob_match(pattern, entry.key()) {
                keys.insert(entry.key().clone());
            }
        }
        for entry in self.sets.iter() {
            if !entry.value().is_empty() && glob_match(pattern, entry.key()) {
                keys.insert(entry.key().clone());
            }
        }

        Ok(keys.into_iter().collect())
    }

    async fn delete_if_equals(&self, key: &str, expected: &str) -> AppResult<bool> {
        let now = Instant::now();
        Ok(self
            .scalars
            .remove_if(key, |_, entry| entry.is_live(now) && entry.value == expected)
            .is_some())
    }

    async fn expire_if_equals(
        &self,
        key: &str,
        expected: &str,
        ttl: Duration,
    ) -> AppResult<bool> {
        let now = Instant::now();
        match self.scalars.get_mut(key) {
            Some(mut entry) if entry.is_live(now) && entry.value == expected => {
                entry.expires_at = Some(now + ttl);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

/// Match `text` against a glob pattern where `*` is the only wildcard.
fn glob_match(pattern: &str, text: &str) -> bool {
    let parts: Vec<&str> = pattern.split('*').collect();
    let [first, middle @ .., last] = parts.as_slice() else {
        return pattern == text;
    };
    let Some(mut remaining) = text.strip_prefix(first) else {
        return false;
    };

    for part in middle {
        match remaining.find(part) {
            Some(pos) => remaining = &remaining[pos + part.len()..],
            None => return false,
        }
    }

    remaining.len() >= last.len() && remaining.ends_with(last)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glob_match() {
        assert!(glob_match("active_sids:*", "active_sids:live"));
        assert!(glob_match("remain:*:2026-10", "remain:org:1:2026-10"));
        assert!(!glob_match("remain:*:2026-10", "remain:abc:2026-09"));
        assert!(glob_match("exact", "exact"));
        assert!(!glob_match("exact", "exactly"));
        assert!(glob_match("*", "anything"));
    }

    #[tokio::test]
    async fn test_set_nx_never_overwrites() {
        let store = MemoryStateStore::new();
        assert!(store.set_nx("remain:a:2026-10", "120", None).await.unwrap());
        assert!(!store.set_nx("remain:a:2026-10", "999", None).await.unwrap());
        assert_eq!(
            store.get("remain:a:2026-10").await.unwrap(),
            Some("120".to_string())
        );
    }

    #[tokio::test]
    async fn test_decr_by_existing() {
        let store = MemoryStateStore::new();
        assert_eq!(store.decr_by_existing("missing", 5).await.unwrap(), None);
        assert_eq!(store.get("missing").await.unwrap(), None);

        store.set_nx("counter", "7", None).await.unwrap();
        assert_eq!(store.decr_by_existing("counter", 5).await.unwrap(), Some(2));
        assert_eq!(store.decr_by_existing("counter", 5).await.unwrap(), Some(-3));
    }

    #[tokio::test]
    async fn test_decr_non_integer_is_store_error() {
        let store = MemoryStateStore::new();
        store
            .set_ex("text", "abc", Duration::from_secs(60))
            .await
            .unwrap();
        assert!(store.decr_by_existing("text", 1).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_ttl_expiry() {
        let store = MemoryStateStore::new();
        store
            .set_ex("sid_to_token:s1", "abc", Duration::from_secs(7200))
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(7199)).await;
        assert_eq!(
            store.get("sid_to_token:s1").await.unwrap(),
            Some("abc".to_string())
        );

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(store.get("sid_to_token:s1").await.unwrap(), None);
        assert!(store.scan_keys("sid_to_token:*").await.unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_nx_reclaims_expired_key() {
        let store = MemoryStateStore::new();
        assert!(
            store
                .set_nx("lease", "a", Some(Duration::from_secs(1)))
                .await
                .unwrap()
        );
        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(
            store
                .set_nx("lease", "b", Some(Duration::from_secs(1)))
                .await
                .unwrap()
        );
        assert_eq!(store.get("lease").await.unwrap(), Some("b".to_string()));
    }

    #[tokio::test]
    async fn test_sets_are_idempotent() {
        let store = MemoryStateStore::new();
        assert!(store.set_add("active_sids:live", "s1").await.unwrap());
        assert!(!store.set_add("active_sids:live", "s1").await.unwrap());
        assert_eq!(
            store.set_members("active_sids:live").await.unwrap(),
            vec!["s1".to_string()]
        );

        assert!(store.set_remove("active_sids:live", "s1").await.unwrap());
        assert!(!store.set_remove("active_sids:live", "s1").await.unwrap());
        assert!(store.scan_keys("active_sids:*").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_absent_is_noop() {
        let store = MemoryStateStore::new();
        assert!(!store.delete("nothing").await.unwrap());
        assert!(!store.set_remove("active_sids:none", "s1").await.unwrap());
    }

    #[tokio::test]
    async fn test_compare_and_delete() {
        let store = MemoryStateStore::new();
        store
            .set_nx("enforcer:lease", "owner-a", Some(Duration::from_secs(30)))
            .await
            .unwrap();
        assert!(
            !store
                .delete_if_equals("enforcer:lease", "owner-b")
                .await
                .unwrap()
        );
        assert!(
            store
                .expire_if_equals("enforcer:lease", "owner-a", Duration::from_secs(30))
                .await
                .unwrap()
        );
        assert!(
            store
                .delete_if_equals("enforcer:lease", "owner-a")
                .await
                .unwrap()
        );
        assert_eq!(store.get("enforcer:lease").await.unwrap(), None);
    }
}
