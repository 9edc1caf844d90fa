//! Session store: maps session ids to conversation state.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, RwLock};
use tourguide_common::SessionId;

use super::state::ConversationState;

/// Handle to one session's state.
pub type SharedState = Arc<Mutex<ConversationState>>;

struct Entry {
    state: SharedState,
    last_seen: Instant,
}

/// Thread-safe, in-memory session store. Nothing survives a restart.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, Entry>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fresh session.
    pub async fn create(&self) -> (SessionId, SharedState) {
        let id = SessionId::new();
        let state = SharedState::default();
        self.sessions.write().await.insert(
            id.clone(),
            Entry {
                state: state.clone(),
                last_seen: Instant::now(),
            },
        );
        tracing::debug!(session = %id, "Session created");
        (id, state)
    }

    /// Look up a session and mark it as used.
    pub async fn get(&self, id: &SessionId) -> Option<SharedState> {
        let mut map = self.sessions.write().await;
        let entry = map.get_mut(id)?;
        entry.last_seen = Instant::now();
        Some(entry.state.clone())
    }

    /// Resume `id` when it is known, otherwise create a new session.
    pub async fn resume_or_create(&self, id: Option<&SessionId>) -> (SessionId, SharedState) {
        if let Some(id) = id {
            if let Some(state) = self.get(id).await {
                tracing::debug!(session = %id, "Session resumed");
                return (id.clone(), state);
            }
        }
        self.create().await
    }

    /// Mark a connected session as used, re-registering `state` under `id`
    /// if the reaper already dropped it.
    pub async fn keep_alive(&self, id: &SessionId, state: &SharedState) {
        let mut map = self.sessions.write().await;
        let entry = map.entry(id.clone()).or_insert_with(|| {
            tracing::debug!(session = %id, "Session re-registered");
            Entry {
                state: state.clone(),
                last_seen: Instant::now(),
            }
        });
        entry.last_seen = Instant::now();
    }

    /// Clear a session's state. Returns false if the session is unknown.
    pub async fn reset(&self, id: &SessionId) -> bool {
        let Some(state) = self.get(id).await else {
            return false;
        };
        state.lock().await.reset();
        tracing::debug!(session = %id, "Session reset");
        true
    }

    /// Remove a session. Returns true if it existed.
    pub async fn destroy(&self, id: &SessionId) -> bool {
        let removed = self.sessions.write().await.remove(id).is_some();
        if removed {
            tracing::debug!(session = %id, "Session destroyed");
        }
        removed
    }

    /// Destroy sessions not used for `max_age`. Returns how many were removed.
    pub async fn reap_idle(&self, max_age: Duration) -> usize {
        let mut map = self.sessions.write().await;
        let now = Instant::now();
        let before = map.len();
        map.retain(|id, entry| {
            let keep = now.saturating_duration_since(entry.last_seen) < max_age;
            if !keep {
                tracing::info!(session = %id, "Reaping idle session");
            }
            keep
        });
        before - map.len()
    }

    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_and_get() {
        let store = SessionStore::new();
        let (id, state) = store.create().await;
        state.lock().await.set_last_topic("info");

        let fetched = store.get(&id).await.unwrap();
        assert_eq!(fetched.lock().await.last_topic(), Some("info"));
        assert_eq!(store.count().await, 1);
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let store = SessionStore::new();
        let (_, a) = store.create().await;
        let (_, b) = store.create().await;
        a.lock().await.record_turn("q", "a");
        assert!(b.lock().await.turns().is_empty());
    }

    #[tokio::test]
    async fn resume_unknown_id_creates_new_session() {
        let store = SessionStore::new();
        let stale = SessionId::new();
        let (id, _) = store.resume_or_create(Some(&stale)).await;
        assert_ne!(id, stale);
        assert_eq!(store.count().await, 1);
    }

    #[tokio::test]
    async fn resume_known_id_returns_same_state() {
        let store = SessionStore::new();
        let (id, state) = store.create().await;
        state.lock().await.record_turn("q", "a");

        let (resumed_id, resumed) = store.resume_or_create(Some(&id)).await;
        assert_eq!(resumed_id, id);
        assert_eq!(resumed.lock().await.turns().len(), 2);
    }

    #[tokio::test]
    async fn reset_clears_state_but_keeps_session() {
        let store = SessionStore::new();
        let (id, state) = store.create().await;
        state.lock().await.record_turn("q", "a");

        assert!(store.reset(&id).await);
        assert!(state.lock().await.turns().is_empty());
        assert_eq!(store.count().await, 1);
        assert!(!store.reset(&SessionId::new()).await);
    }

    #[tokio::test]
    async fn destroy_removes_session() {
        let store = SessionStore::new();
        let (id, _) = store.create().await;
        assert!(store.destroy(&id).await);
        assert!(!store.destroy(&id).await);
        assert!(store.get(&id).await.is_none());
    }

    #[tokio::test]
    async fn reap_idle_removes_old_sessions() {
        let store = SessionStore::new();
        store.create().await;
        store.create().await;

        assert_eq!(store.reap_idle(Duration::from_secs(3600)).await, 0);
        assert_eq!(store.reap_idle(Duration::ZERO).await, 2);
        assert_eq!(store.count().await, 0);
    }

    #[tokio::test]
    async fn keep_alive_restores_reaped_session() {
        let store = SessionStore::new();
        let (id, state) = store.create().await;
        state.lock().await.record_turn("q", "a");
        assert_eq!(store.reap_idle(Duration::ZERO).await, 1);

        store.keep_alive(&id, &state).await;

        let restored = store.get(&id).await.unwrap();
        assert!(Arc::ptr_eq(&restored, &state));
        assert!(store.reset(&id).await);
        assert!(state.lock().await.turns().is_empty());
    }

    #[tokio::test]
    async fn keep_alive_touches_live_session() {
        let store = SessionStore::new();
        let (id, state) = store.create().await;
        store.keep_alive(&id, &state).await;
        assert_eq!(store.count().await, 1);
        assert_eq!(store.reap_idle(Duration::from_secs(3600)).await, 0);
    }
}
