use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::sync::Mutex;

use crate::{
    error::AuthError,
    types::{AuthRequestState, Credentials},
    utils,
};

pub const SESSION_ID_LENGTH: usize = 32;

/// Sessions untouched for this long are dropped when a new one is created.
pub const SESSION_IDLE_TIMEOUT: Duration = Duration::from_secs(24 * 60 * 60);

/// Per-user state: at most one pending authorization request and the
/// credentials obtained from the last successful one.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub auth_request: Option<AuthRequestState>,
    pub credentials: Option<Credentials>,
    last_seen: Instant,
}

impl SessionContext {
    fn new() -> Self {
        Self {
            auth_request: None,
            credentials: None,
            last_seen: Instant::now(),
        }
    }

    /// Time since the session was last read or written.
    pub fn idle_for(&self) -> Duration {
        self.last_seen.elapsed()
    }

    fn touch(&mut self) {
        self.last_seen = Instant::now();
    }
}

/// Session contexts keyed by session id.
///
/// Cloning is cheap and every clone refers to the same sessions, so one store
/// can be shared between the router, the auth manager and the CLI flow.
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<String, SessionContext>>>,
    idle_timeout: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_idle_timeout(SESSION_IDLE_TIMEOUT)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_timeout(idle_timeout: Duration) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            idle_timeout,
        }
    }

    /// Registers an empty session under a fresh random id.
    ///
    /// Sessions idle for longer than the store's timeout are evicted first.
    pub async fn create(&self) -> String {
        let id = utils::generate_token(SESSION_ID_LENGTH);
        let mut sessions = self.sessions.lock().await;
        sessions.retain(|_, session| session.idle_for() <= self.idle_timeout);
        sessions.insert(id.clone(), SessionContext::new());
        id
    }

    /// Drops every session idle for longer than `max_idle` and returns how
    /// many were removed.
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.idle_for() <= max_idle);
        before - sessions.len()
    }

    pub async fn get(&self, session_id: &str) -> Option<SessionContext> {
        self.sessions.lock().await.get(session_id).cloned()
    }

    pub async fn contains(&self, session_id: &str) -> bool {
        self.sessions.lock().await.contains_key(session_id)
    }

    /// Stores a new pending request, replacing any earlier one.
    pub async fn store_auth_request(&self, session_id: &str, request: AuthRequestState) {
        let mut sessions = self.sessions.lock().await;
        let session = sessions
            .entry(session_id.to_string())
            .or_insert_with(SessionContext::new);
        session.auth_request = Some(request);
        session.touch();
    }

    /// Whether the session exists and waits for an authorization callback.
    pub async fn has_pending_request(&self, session_id: &str) -> bool {
        self.sessions
            .lock()
            .await
            .get(session_id)
            .is_some_and(|session| session.auth_request.is_some())
    }

    /// Takes the pending request out of the session so it cannot be used twice.
    ///
    /// When `returned_state` is given it must equal the stored token; on a
    /// mismatch the pending request stays in place for the genuine callback.
    pub async fn consume_auth_request(
        &self,
        session_id: &str,
        returned_state: Option<&str>,
    ) -> Result<AuthRequestState, AuthError> {
        let mut sessions = self.sessions.lock().await;
        let Some(session) = sessions.get_mut(session_id) else {
            return Err(AuthError::StateMissing);
        };
        let Some(pending) = session.auth_request.as_ref() else {
            return Err(AuthError::StateMissing);
        };
        if let Some(returned) = returned_state {
            if returned != pending.state {
                return Err(AuthError::StateMismatch);
            }
        }
        session.touch();
        session.auth_request.take().ok_or(AuthError::StateMissing)
    }

    /// Finds the session that issued the given `state` token.
    pub async fn session_for_state(&self, state: &str) -> Option<String> {
        self.sessions
            .lock()
            .await
            .iter()
            .find(|(_, session)| {
                session
                    .auth_request
                    .as_ref()
                    .is_some_and(|pending| pending.state == state)
            })
            .map(|(id, _)| id.clone())
    }

    pub async fn credentials(&self, session_id: &str) -> Option<Credentials> {
        let mut sessions = self.sessions.lock().await;
        let session = sessions.get_mut(session_id)?;
        session.touch();
        session.credentials.clone()
    }

    /// Replaces the credentials of a live session.
    ///
    /// Returns `false` and stores nothing when the session has ended, so a
    /// late write-back cannot bring a logged-out session back.
    pub async fn store_credentials(&self, session_id: &str, credentials: Credentials) -> bool {
        let mut sessions = self.sessions.lock().await;
        match sessions.get_mut(session_id) {
            Some(session) => {
                session.credentials = Some(credentials);
                session.touch();
                true
            }
            None => false,
        }
    }

    /// Ends the session, dropping its credentials and any pending request.
    pub async fn end(&self, session_id: &str) -> bool {
        self.sessions.lock().await.remove(session_id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
