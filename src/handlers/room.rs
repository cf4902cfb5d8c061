//! Room join handling and fan-out helpers.

use crate::protocol::ServerEvent;
use crate::state::AppState;
use std::sync::Arc;

/// Handle a join event: record membership and announce the arrival to the
/// members who were already in the room. The joiner gets no notice about
/// itself.
pub async fn handle_join(state: Arc<AppState>, conn_id: &str, username: &str, room_id: &str) {
    // Snapshot taken before the insert so the announcement never reaches
    // the joiner, including on a re-join.
    let present: Vec<String> = state
        .rooms
        .members_of(room_id)
        .into_iter()
        .filter(|member| member != conn_id)
        .collect();

    state.rooms.join(conn_id, room_id);
    state.registry.track_join(conn_id, room_id).await;

    let notice = match state.profiles.avatar_of(username) {
        Some(avatar) => format!("{avatar} {username} entered the room"),
        None => format!("{username} entered the room"),
    };
    let event = ServerEvent::System { msg: notice };
    for member in &present {
        state.registry.send_to(member, event.clone());
    }

    tracing::info!(
        conn_id = %conn_id,
        room_id = %room_id,
        username = %username,
        "user joined room"
    );
}

/// Push an event to every current member of a room.
pub(crate) fn broadcast_to_room(state: &AppState, room_id: &str, event: ServerEvent) {
    for conn_id in state.rooms.members_of(room_id) {
        state.registry.send_to(&conn_id, event.clone());
    }
}

/// Push an event to every current member of a room except one connection.
pub(crate) fn broadcast_to_room_except(
    state: &AppState,
    room_id: &str,
    except_conn_id: &str,
    event: ServerEvent,
) {
    for conn_id in state.rooms.members_of(room_id) {
        if conn_id != except_conn_id {
            state.registry.send_to(&conn_id, event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::testutil;
    use super::*;
    use crate::profiles::Profile;

    #[tokio::test]
    async fn join_notifies_existing_members_only() {
        let state = testutil::state();
        let (c1, mut rx1) = testutil::connect(&state);
        let (c2, mut rx2) = testutil::connect(&state);

        handle_join(state.clone(), &c1, "alice", "geral").await;
        assert!(testutil::drain(&mut rx1).is_empty());

        handle_join(state.clone(), &c2, "bob", "geral").await;
        assert_eq!(
            testutil::drain(&mut rx1),
            vec![ServerEvent::System {
                msg: "bob entered the room".to_string(),
            }]
        );
        assert!(testutil::drain(&mut rx2).is_empty());
    }

    #[tokio::test]
    async fn join_notice_carries_avatar_glyph() {
        let state = testutil::state();
        state.profiles.insert_new(Profile {
            username: "bob".to_string(),
            avatar: "🦊".to_string(),
            bio: None,
            status: None,
            photo: None,
        });

        let (c1, mut rx1) = testutil::connect(&state);
        let (c2, _rx2) = testutil::connect(&state);

        handle_join(state.clone(), &c1, "alice", "geral").await;
        handle_join(state.clone(), &c2, "bob", "geral").await;

        assert_eq!(
            testutil::drain(&mut rx1),
            vec![ServerEvent::System {
                msg: "🦊 bob entered the room".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn rejoin_does_not_announce_to_self() {
        let state = testutil::state();
        let (c1, mut rx1) = testutil::connect(&state);

        handle_join(state.clone(), &c1, "alice", "geral").await;
        handle_join(state.clone(), &c1, "alice", "geral").await;

        assert!(testutil::drain(&mut rx1).is_empty());
        assert_eq!(state.rooms.members_of("geral").len(), 1);
    }
}
