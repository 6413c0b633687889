//! Read-only listing of active sessions.

use std::collections::BTreeMap;

use serde::Serialize;

/// One active session and the token it bills, if still mapped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveSession {
    pub session_id: String,
    pub token: Option<String>,
}

/// Stream name to its active sessions.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionSnapshot {
    pub streams: BTreeMap<String, Vec<ActiveSession>>,
}

impl SessionSnapshot {
    /// Total number of sessions across all streams.
    pub fn session_count(&self) -> usize {
        self.streams.values().map(Vec::len).sum()
    }
}
