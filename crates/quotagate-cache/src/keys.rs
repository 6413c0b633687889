//! Key builders for every entry QuotaGate keeps in the shared store.
//!
//! Centralising key construction prevents typos and makes it easy
//! to find every key the application uses. Backends apply the configured
//! key prefix on top of these names.

use quotagate_core::types::BillingMonth;

const ACTIVE_SESSIONS: &str = "active_sids:";
const SESSION_TOKEN: &str = "sid_to_token:";
const QUOTA_REMAINING: &str = "remain:";

// ── Session registry ───────────────────────────────────────

/// Set of active session ids for a stream.
pub fn active_sessions(stream_name: &str) -> String {
    format!("{ACTIVE_SESSIONS}{stream_name}")
}

/// Pattern matching every stream's active-session set.
pub fn active_sessions_pattern() -> String {
    format!("{ACTIVE_SESSIONS}*")
}

/// Recover the stream name from an active-session set key.
pub fn stream_from_active_sessions_key(key: &str) -> Option<&str> {
    key.strip_prefix(ACTIVE_SESSIONS)
}

/// Session id to token mapping.
pub fn session_token(session_id: &str) -> String {
    format!("{SESSION_TOKEN}{session_id}")
}

// ── Quota ledger ───────────────────────────────────────────

/// Remaining seconds for a token in a month.
pub fn quota_remaining(token: &str, month: &BillingMonth) -> String {
    format!("{QUOTA_REMAINING}{token}:{month}")
}

/// Pattern matching every ledger entry of a month.
pub fn quota_month_pattern(month: &BillingMonth) -> String {
    format!("{QUOTA_REMAINING}*:{month}")
}

/// Recover the token from a ledger key of the given month.
///
/// Tokens may themselves contain `:`, so the month suffix is stripped
/// rather than splitting on the separator.
pub fn token_from_quota_key<'a>(key: &'a str, month: &BillingMonth) -> Option<&'a str> {
    let suffix = format!(":{month}");
    key.strip_prefix(QUOTA_REMAINING)?
        .strip_suffix(suffix.as_str())
        .filter(|token| !token.is_empty())
}

// ── Enforcer coordination ──────────────────────────────────

/// Lease held by the process currently sweeping.
pub fn enforcer_lease() -> String {
    "enforcer:lease".to_string()
}

/// Marker claiming a sweep window fleet-wide.
pub fn enforcer_window(window: u64) -> String {
    format!("enforcer:window:{window}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month() -> BillingMonth {
        BillingMonth::new(2026, 10).unwrap()
    }

    #[test]
    fn test_wire_compatible_names() {
        assert_eq!(active_sessions("live"), "active_sids:live");
        assert_eq!(session_token("s1"), "sid_to_token:s1");
        assert_eq!(quota_remaining("abc", &month()), "remain:abc:2026-10");
        assert_eq!(quota_month_pattern(&month()), "remain:*:2026-10");
    }

    #[test]
    fn test_stream_round_trip() {
        let key = active_sessions("cam:front");
        assert_eq!(stream_from_active_sessions_key(&key), Some("cam:front"));
        assert_eq!(stream_from_active_sessions_key("remain:x:2026-10"), None);
    }

    #[test]
    fn test_token_with_colon() {
        let key = quota_remaining("org:42", &month());
        assert_eq!(token_from_quota_key(&key, &month()), Some("org:42"));
    }

    #[test]
    fn test_token_from_other_month_rejected() {
        let other = BillingMonth::new(2026, 9).unwrap();
        let key = quota_remaining("abc", &other);
        assert_eq!(token_from_quota_key(&key, &month()), None);
    }
}
