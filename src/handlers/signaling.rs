//! WebRTC signaling relay.

use crate::handlers::room::broadcast_to_room_except;
use crate::protocol::{ServerEvent, SignalEvent};
use crate::state::AppState;
use std::sync::Arc;

/// Relay a signaling payload, uninterpreted, to every member of the room
/// except the originating connection. `target` is not used for routing; the
/// receiving clients decide whether the payload is addressed to them.
pub async fn handle_signal(state: Arc<AppState>, conn_id: &str, signal: SignalEvent) {
    let room_id = signal.room.clone();

    broadcast_to_room_except(&state, &room_id, conn_id, ServerEvent::Signal(signal));

    tracing::debug!(conn_id = %conn_id, room_id = %room_id, "relayed signal");
}

#[cfg(test)]
mod tests {
    use super::super::testutil;
    use super::*;
    use crate::handlers::handle_join;
    use crate::rooms::dm_room_id;
    use serde_json::{Map, Value};

    fn signal(room: &str, target: &str, sender: &str, extras: &[(&str, &str)]) -> SignalEvent {
        let mut payload = Map::new();
        for (key, value) in extras {
            payload.insert(key.to_string(), Value::String(value.to_string()));
        }
        SignalEvent {
            room: room.to_string(),
            target: target.to_string(),
            sender: sender.to_string(),
            payload,
        }
    }

    #[tokio::test]
    async fn signal_fans_out_to_everyone_but_sender() {
        let state = testutil::state();
        let (c1, mut rx1) = testutil::connect(&state);
        let (c2, mut rx2) = testutil::connect(&state);
        let (c3, mut rx3) = testutil::connect(&state);

        handle_join(state.clone(), &c1, "alice", "geral").await;
        handle_join(state.clone(), &c2, "bob", "geral").await;
        handle_join(state.clone(), &c3, "carol", "geral").await;
        testutil::drain(&mut rx1);
        testutil::drain(&mut rx2);
        testutil::drain(&mut rx3);

        let event = signal("geral", "bob", "alice", &[("sdp", "v=0")]);
        handle_signal(state.clone(), &c1, event.clone()).await;

        assert!(testutil::drain(&mut rx1).is_empty());
        assert_eq!(testutil::drain(&mut rx2), vec![ServerEvent::Signal(event.clone())]);
        assert_eq!(testutil::drain(&mut rx3), vec![ServerEvent::Signal(event)]);
    }

    #[tokio::test]
    async fn signal_payload_is_relayed_verbatim() {
        let state = testutil::state();
        let room = dm_room_id("alice", "bob");
        let (c1, _rx1) = testutil::connect(&state);
        let (c2, mut rx2) = testutil::connect(&state);

        handle_join(state.clone(), &c1, "alice", &room).await;
        handle_join(state.clone(), &c2, "bob", &room).await;
        testutil::drain(&mut rx2);

        let event = signal(
            &room,
            "bob",
            "alice",
            &[("sdp", "v=0"), ("kind", "offer")],
        );
        handle_signal(state.clone(), &c1, event.clone()).await;

        let received = testutil::drain(&mut rx2);
        assert_eq!(received, vec![ServerEvent::Signal(event)]);
    }

    #[tokio::test]
    async fn signal_to_unknown_room_reaches_nobody() {
        let state = testutil::state();
        let (c1, mut rx1) = testutil::connect(&state);

        let event = signal("nowhere", "bob", "alice", &[]);
        handle_signal(state.clone(), &c1, event).await;

        assert!(testutil::drain(&mut rx1).is_empty());
    }
}
