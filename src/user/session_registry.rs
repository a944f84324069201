use anyhow::Result;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionEntry {
    pub user_id: i64,
    pub created: u64,
}

/// Storage for active session tokens. Implementations decide persistence;
/// expiry policy belongs to [SessionRegistry].
pub trait SessionStore: Send + Sync {
    fn insert(&self, token: &str, entry: SessionEntry) -> Result<()>;
    fn get(&self, token: &str) -> Result<Option<SessionEntry>>;
    fn remove(&self, token: &str) -> Result<Option<SessionEntry>>;
    fn remove_created_before(&self, cutoff: u64) -> Result<usize>;
    fn len(&self) -> Result<usize>;
}

#[derive(Default)]
pub struct InMemorySessionStore {
    entries: Mutex<HashMap<String, SessionEntry>>,
}

impl SessionStore for InMemorySessionStore {
    fn insert(&self, token: &str, entry: SessionEntry) -> Result<()> {
        self.entries.lock().unwrap().insert(token.to_string(), entry);
        Ok(())
    }

    fn get(&self, token: &str) -> Result<Option<SessionEntry>> {
        Ok(self.entries.lock().unwrap().get(token).copied())
    }

    fn remove(&self, token: &str) -> Result<Option<SessionEntry>> {
        Ok(self.entries.lock().unwrap().remove(token))
    }

    fn remove_created_before(&self, cutoff: u64) -> Result<usize> {
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|_, entry| entry.created >= cutoff);
        Ok(before - entries.len())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.entries.lock().unwrap().len())
    }
}

/// Issues and resolves session tokens with a fixed time-to-live.
pub struct SessionRegistry {
    store: Box<dyn SessionStore>,
    ttl: Duration,
}

impl SessionRegistry {
    pub fn new(store: Box<dyn SessionStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub fn create(&self, user_id: i64) -> Result<String> {
        let token = super::auth::generate_session_token();
        let entry = SessionEntry {
            user_id,
            created: now_seconds(),
        };
        self.store.insert(&token, entry)?;
        Ok(token)
    }

    /// Resolves a token to its user id. An expired token is removed and
    /// resolves to nothing.
    pub fn resolve(&self, token: &str) -> Result<Option<i64>> {
        let Some(entry) = self.store.get(token)? else {
            return Ok(None);
        };
        if self.is_expired(&entry) {
            self.store.remove(token)?;
            return Ok(None);
        }
        Ok(Some(entry.user_id))
    }

    pub fn destroy(&self, token: &str) -> Result<bool> {
        Ok(self.store.remove(token)?.is_some())
    }

    pub fn prune_expired(&self) -> Result<usize> {
        let cutoff = now_seconds().saturating_sub(self.ttl.as_secs());
        let pruned = self.store.remove_created_before(cutoff)?;
        if pruned > 0 {
            debug!("Pruned {pruned} expired sessions");
        }
        Ok(pruned)
    }

    pub fn active_count(&self) -> Result<usize> {
        self.store.len()
    }

    fn is_expired(&self, entry: &SessionEntry) -> bool {
        now_seconds().saturating_sub(entry.created) > self.ttl.as_secs()
    }
}

fn now_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_secs()
}
