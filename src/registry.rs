//! Connection registry: live connections, their identities, and the rooms
//! they have joined.

use crate::protocol::ServerEvent;
use dashmap::DashMap;
use std::collections::HashSet;
use std::time::Instant;
use tokio::sync::{mpsc::UnboundedSender, RwLock};
use uuid::Uuid;

/// One live client session.
pub struct Connection {
    pub id: String,
    /// Authenticated username. Bound at most once per connection.
    pub identity: RwLock<Option<String>>,
    pub joined_rooms: RwLock<HashSet<String>>,
    pub sender: UnboundedSender<ServerEvent>,
    pub connected_at: Instant,
}

/// Registry of all live connections, keyed by connection id.
pub struct ConnectionRegistry {
    connections: DashMap<String, Connection>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
        }
    }

    /// Create an entry for a newly accepted connection and return its id.
    pub fn register(&self, sender: UnboundedSender<ServerEvent>) -> String {
        let conn_id = Uuid::new_v4().to_string();
        let connection = Connection {
            id: conn_id.clone(),
            identity: RwLock::new(None),
            joined_rooms: RwLock::new(HashSet::new()),
            sender,
            connected_at: Instant::now(),
        };
        self.connections.insert(conn_id.clone(), connection);
        conn_id
    }

    /// Attach an authenticated username to a connection. No-op when the
    /// connection is unknown or an identity is already bound.
    pub async fn bind_identity(&self, conn_id: &str, username: &str) {
        if let Some(connection) = self.connections.get(conn_id) {
            let mut identity = connection.identity.write().await;
            if identity.is_none() {
                *identity = Some(username.to_string());
                tracing::info!(conn_id = %conn_id, username = %username, "identity bound");
            }
        }
    }

    /// The username bound to a connection, if any.
    pub async fn identity_of(&self, conn_id: &str) -> Option<String> {
        match self.connections.get(conn_id) {
            Some(connection) => connection.identity.read().await.clone(),
            None => None,
        }
    }

    /// Record that a connection joined a room.
    pub async fn track_join(&self, conn_id: &str, room_id: &str) {
        if let Some(connection) = self.connections.get(conn_id) {
            connection
                .joined_rooms
                .write()
                .await
                .insert(room_id.to_string());
        }
    }

    /// Remove a connection and return the rooms it belonged to, so the
    /// caller can purge directory membership. This is the only room-exit
    /// path in the system.
    pub async fn unregister(&self, conn_id: &str) -> Vec<String> {
        if let Some((_, connection)) = self.connections.remove(conn_id) {
            let rooms: Vec<String> = connection.joined_rooms.read().await.iter().cloned().collect();
            tracing::info!(
                conn_id = %connection.id,
                uptime_ms = connection.connected_at.elapsed().as_millis() as u64,
                "connection closed"
            );
            rooms
        } else {
            Vec::new()
        }
    }

    /// Push an event to one connection. Silently discarded when the
    /// connection is gone or its outbound channel has closed.
    pub fn send_to(&self, conn_id: &str, event: ServerEvent) {
        if let Some(connection) = self.connections.get(conn_id) {
            let _ = connection.sender.send(event);
        }
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}
