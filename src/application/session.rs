//! Explicit session context with a defined lifecycle.
//!
//! The context is created once from a [`SessionStore`], handed to whatever
//! needs to know who is logged in, updated by login/signup and cleared by
//! logout. Clones share the same state.

use std::sync::{Arc, RwLock};

use thiserror::Error;
use tracing::info;

use crate::domain::session::Session;
use crate::util::lock::{rw_read, rw_write};

const LOCK_TARGET: &str = "application::session";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored session is corrupt: {0}")]
    Corrupt(String),
}

/// Durable home for the session between runs.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<Session>, SessionError>;
    fn save(&self, session: &Session) -> Result<(), SessionError>;
    fn clear(&self) -> Result<(), SessionError>;
}

#[derive(Clone)]
pub struct SessionContext {
    current: Arc<RwLock<Option<Session>>>,
    store: Arc<dyn SessionStore>,
}

impl SessionContext {
    /// Restore whatever session the store holds.
    pub fn load(store: Arc<dyn SessionStore>) -> Result<Self, SessionError> {
        let current = store.load()?;
        Ok(Self {
            current: Arc::new(RwLock::new(current)),
            store,
        })
    }

    pub fn current(&self) -> Option<Session> {
        rw_read(&self.current, LOCK_TARGET, "current").clone()
    }

    pub fn token(&self) -> Option<String> {
        rw_read(&self.current, LOCK_TARGET, "token")
            .as_ref()
            .map(|s| s.token.clone())
    }

    pub fn is_logged_in(&self) -> bool {
        rw_read(&self.current, LOCK_TARGET, "is_logged_in").is_some()
    }

    /// Persist and activate a freshly issued session.
    pub fn establish(&self, session: Session) -> Result<(), SessionError> {
        self.store.save(&session)?;
        info!(username = %session.username, "session established");
        *rw_write(&self.current, LOCK_TARGET, "establish") = Some(session);
        Ok(())
    }

    /// Forget the session. Returns the session that was active, if any.
    pub fn clear(&self) -> Result<Option<Session>, SessionError> {
        self.store.clear()?;
        let previous = rw_write(&self.current, LOCK_TARGET, "clear").take();
        if let Some(session) = previous.as_ref() {
            info!(username = %session.username, "session cleared");
        }
        Ok(previous)
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("current", &self.current())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::session::MemorySessionStore;

    #[test]
    fn lifecycle_establish_then_clear() -> Result<(), SessionError> {
        let store = Arc::new(MemorySessionStore::default());
        let ctx = SessionContext::load(store.clone())?;
        assert!(!ctx.is_logged_in());
        assert_eq!(ctx.token(), None);

        ctx.establish(Session::new("kim", "u1", "tok"))?;
        assert!(ctx.is_logged_in());
        assert_eq!(ctx.token().as_deref(), Some("tok"));
        assert_eq!(store.load()?.map(|s| s.username), Some("kim".to_string()));

        let shared = ctx.clone();
        let previous = shared.clear()?;
        assert_eq!(previous.map(|s| s.id), Some("u1".to_string()));
        assert!(!ctx.is_logged_in());
        assert_eq!(store.load()?, None);
        Ok(())
    }

    #[test]
    fn load_restores_stored_session() -> Result<(), SessionError> {
        let store = Arc::new(MemorySessionStore::with_session(Session::new("lee", "u2", "t2")));
        let ctx = SessionContext::load(store)?;
        assert_eq!(ctx.current().map(|s| s.username), Some("lee".to_string()));
        Ok(())
    }
}
