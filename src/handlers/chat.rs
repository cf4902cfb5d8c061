//! Chat message handling.

use crate::handlers::room::broadcast_to_room;
use crate::protocol::ServerEvent;
use crate::state::AppState;
use std::sync::Arc;

/// Handle a chat message: senders without a bound identity get a private
/// rejection and nothing is broadcast; everyone else's message goes to the
/// whole room, sender included, so the sender sees its own message echoed.
pub async fn handle_chat_message(
    state: Arc<AppState>,
    conn_id: &str,
    room_id: &str,
    username: &str,
    msg: &str,
) {
    if state.registry.identity_of(conn_id).await.is_none() {
        state.registry.send_to(
            conn_id,
            ServerEvent::Error {
                code: "auth_required".to_string(),
                message: "sign in before sending messages".to_string(),
            },
        );
        tracing::warn!(
            conn_id = %conn_id,
            room_id = %room_id,
            "rejected chat message from unauthenticated connection"
        );
        return;
    }

    broadcast_to_room(
        &state,
        room_id,
        ServerEvent::User {
            msg: msg.to_string(),
            username: username.to_string(),
        },
    );

    tracing::debug!(conn_id = %conn_id, room_id = %room_id, "chat message delivered");
}
