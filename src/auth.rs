//! Connect-time authentication against the session collaborator.

use dashmap::DashMap;
use std::time::Duration;
use thiserror::Error;

/// Why a connection upgrade was refused.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("unknown or expired session token")]
    UnknownSession,
    #[error("session lookup timed out")]
    Timeout,
}

/// Session store mapping opaque tokens to usernames. Stands in for the
/// external identity service; seeded from configuration.
pub struct SessionStore {
    sessions: DashMap<String, String>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    pub fn seed<I>(&self, pairs: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (token, username) in pairs {
            self.sessions.insert(token, username);
        }
    }

    /// Resolve a session token to its username.
    pub async fn resolve(&self, token: &str) -> Option<String> {
        self.sessions.get(token).map(|entry| entry.clone())
    }
}

/// Authenticate a connection before the socket upgrade. A missing token
/// yields an anonymous connection; an unknown token or a lookup exceeding
/// `timeout_ms` refuses it.
pub async fn authenticate(
    sessions: &SessionStore,
    timeout_ms: u64,
    token: Option<&str>,
) -> Result<Option<String>, AuthError> {
    let Some(token) = token else {
        return Ok(None);
    };

    let lookup = sessions.resolve(token);
    match tokio::time::timeout(Duration::from_millis(timeout_ms), lookup).await {
        Ok(Some(username)) => Ok(Some(username)),
        Ok(None) => Err(AuthError::UnknownSession),
        Err(_) => Err(AuthError::Timeout),
    }
}
