//! Shared application state for the HTTP server.

use crate::charts::RenderOptions;
use crate::web::session::Session;
use std::collections::HashMap;
use std::sync::atomic::AtomicU64;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use uuid::Uuid;

/// One session, locked for the duration of a single action.
pub type SessionHandle = Arc<Mutex<Session>>;

/// Shared state available to all request handlers.
pub struct AppState {
    /// Server start time (for uptime reporting).
    pub started_at: Instant,

    /// Chart size used for every new session.
    pub render: RenderOptions,

    /// Live sessions by id. Only held long enough to look up or insert.
    sessions: Mutex<HashMap<Uuid, SessionHandle>>,

    /// In-flight request counter (for /health).
    pub inflight: AtomicU64,
}

impl AppState {
    pub fn new(render: RenderOptions) -> Self {
        Self {
            started_at: Instant::now(),
            render,
            sessions: Mutex::new(HashMap::new()),
            inflight: AtomicU64::new(0),
        }
    }

    pub fn create_session(&self) -> Uuid {
        let id = Uuid::new_v4();
        let session = Arc::new(Mutex::new(Session::new(self.render)));
        self.lock_sessions().insert(id, session);
        id
    }

    pub fn session(&self, id: Uuid) -> Option<SessionHandle> {
        self.lock_sessions().get(&id).cloned()
    }

    /// Returns false when the id was unknown.
    pub fn remove_session(&self, id: Uuid) -> bool {
        self.lock_sessions().remove(&id).is_some()
    }

    pub fn session_count(&self) -> usize {
        self.lock_sessions().len()
    }

    fn lock_sessions(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, SessionHandle>> {
        // The map holds no invariants a panicking holder could break.
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Type alias used in axum handlers.
pub type SharedState = Arc<AppState>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sessions_are_independent() {
        let state = AppState::new(RenderOptions::default());
        let a = state.create_session();
        let b = state.create_session();
        assert_ne!(a, b);
        assert_eq!(state.session_count(), 2);

        assert!(state.remove_session(a));
        assert!(!state.remove_session(a));
        assert!(state.session(a).is_none());
        assert!(state.session(b).is_some());
    }
}
