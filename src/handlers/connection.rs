//! Connection lifecycle handlers.

use crate::protocol::ServerEvent;
use crate::state::AppState;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

/// Handle a newly accepted connection: register it, bind the identity the
/// gateway resolved at connect time, and ack with the assigned id.
pub async fn handle_connection(
    state: Arc<AppState>,
    sender: UnboundedSender<ServerEvent>,
    identity: Option<String>,
) -> String {
    let conn_id = state.registry.register(sender.clone());

    if let Some(username) = identity {
        state.registry.bind_identity(&conn_id, &username).await;
    }

    let _ = sender.send(ServerEvent::Connected {
        connection_id: conn_id.clone(),
    });

    tracing::info!(conn_id = %conn_id, "new connection established");
    conn_id
}

/// Handle a disconnect: drop the registry entry and purge the connection
/// from every room it had joined.
pub async fn handle_disconnect(state: Arc<AppState>, conn_id: &str) {
    for room_id in state.registry.unregister(conn_id).await {
        state.rooms.leave(conn_id, &room_id);
    }
}
