//! Application state composition.

use crate::auth::SessionStore;
use crate::config::Config;
use crate::profiles::ProfileStore;
use crate::registry::ConnectionRegistry;
use crate::rooms::RoomDirectory;
use std::sync::Arc;

/// Shared server state, injected into every handler.
pub struct AppState {
    pub registry: ConnectionRegistry,
    pub rooms: RoomDirectory,
    pub profiles: ProfileStore,
    pub sessions: SessionStore,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let sessions = SessionStore::new();
        sessions.seed(config.session_seeds.iter().cloned());

        Self {
            registry: ConnectionRegistry::new(),
            rooms: RoomDirectory::new(),
            profiles: ProfileStore::new(),
            sessions,
            config: Arc::new(config),
        }
    }
}
