//! Per-browser session storage.
//!
//! The authenticator only needs a key-value view of the current browser's
//! session ([`SessionStore`]). [`SessionRegistry`] is the in-memory store the
//! bundled host uses, keyed by a session cookie.

use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Key-value access to one browser session, with read-your-writes consistency.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn put(&self, key: &str, value: String);
    fn remove(&self, key: &str) -> Option<String>;
}

#[derive(Debug)]
struct SessionEntry {
    values: HashMap<String, String>,
    /// Last write; expiry counts from here.
    touched_at: Instant,
}

impl SessionEntry {
    fn new() -> Self {
        Self {
            values: HashMap::new(),
            touched_at: Instant::now(),
        }
    }
}

/// All live sessions, shared between request handlers.
#[derive(Clone, Debug, Default)]
pub struct SessionRegistry {
    sessions: Arc<DashMap<String, SessionEntry>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate an id for a browser that did not present a session cookie.
    pub fn new_session_id() -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }

    /// A view of the session with the given id. The session is created lazily on first write.
    pub fn session(&self, id: &str) -> BrowserSession {
        BrowserSession {
            registry: self.clone(),
            id: id.to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Drop sessions not written to within `max_age`. Returns how many were removed.
    #[tracing::instrument(name = "session_cleanup", skip(self))]
    pub fn cleanup_expired(&self, max_age: Duration) -> usize {
        let before = self.sessions.len();
        self.sessions
            .retain(|_, entry| entry.touched_at.elapsed() < max_age);
        let removed = before.saturating_sub(self.sessions.len());
        if removed > 0 {
            tracing::debug!(removed, remaining = self.sessions.len(), "Pruned expired sessions");
        }
        removed
    }
}

/// One browser's session inside a [`SessionRegistry`].
#[derive(Clone, Debug)]
pub struct BrowserSession {
    registry: SessionRegistry,
    id: String,
}

impl BrowserSession {
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl SessionStore for BrowserSession {
    fn get(&self, key: &str) -> Option<String> {
        self.registry
            .sessions
            .get(&self.id)
            .and_then(|entry| entry.values.get(key).cloned())
    }

    fn put(&self, key: &str, value: String) {
        let mut entry = self
            .registry
            .sessions
            .entry(self.id.clone())
            .or_insert_with(SessionEntry::new);
        entry.touched_at = Instant::now();
        entry.values.insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) -> Option<String> {
        self.registry
            .sessions
            .get_mut(&self.id)
            .and_then(|mut entry| entry.values.remove(key))
    }
}
