//! Room directory: membership tracking and DM room naming.
//!
//! A room exists exactly as long as it has members. There is no standalone
//! room record; an entry whose member set empties is discarded.

use dashmap::DashMap;
use std::collections::HashSet;

/// Prefix shared by every direct-message room id.
pub const DM_PREFIX: &str = "dm_";

const DM_SEPARATOR: &str = "_";

/// Derive the room id for a DM between two users. The usernames are sorted
/// lexicographically first, so both parties converge on the same id no matter
/// who initiates.
pub fn dm_room_id(user_a: &str, user_b: &str) -> String {
    let (lesser, greater) = if user_a <= user_b {
        (user_a, user_b)
    } else {
        (user_b, user_a)
    };
    format!("{DM_PREFIX}{lesser}{DM_SEPARATOR}{greater}")
}

/// Whether `room_id` names a direct-message room.
pub fn is_dm_room(room_id: &str) -> bool {
    room_id.starts_with(DM_PREFIX)
}

/// Maps room ids to their current member connections.
pub struct RoomDirectory {
    rooms: DashMap<String, HashSet<String>>,
}

impl RoomDirectory {
    pub fn new() -> Self {
        Self {
            rooms: DashMap::new(),
        }
    }

    /// Add a connection to a room, creating the room if absent. Idempotent.
    pub fn join(&self, conn_id: &str, room_id: &str) {
        self.rooms
            .entry(room_id.to_string())
            .or_default()
            .insert(conn_id.to_string());
    }

    /// Remove a connection from a room. An emptied room entry is discarded.
    pub fn leave(&self, conn_id: &str, room_id: &str) {
        if let Some(mut members) = self.rooms.get_mut(room_id) {
            members.remove(conn_id);
        }
        self.rooms.remove_if(room_id, |_, members| members.is_empty());
    }

    /// Snapshot of a room's current members. Empty for unknown rooms.
    pub fn members_of(&self, room_id: &str) -> Vec<String> {
        self.rooms
            .get(room_id)
            .map(|members| members.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of rooms with at least one member.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dm_room_id_is_order_independent() {
        assert_eq!(dm_room_id("alice", "bob"), dm_room_id("bob", "alice"));
        assert_eq!(dm_room_id("alice", "bob"), "dm_alice_bob");
    }

    #[test]
    fn dm_room_id_differs_per_pair() {
        assert_ne!(dm_room_id("alice", "bob"), dm_room_id("alice", "carol"));
        assert_ne!(dm_room_id("alice", "bob"), dm_room_id("bob", "carol"));
    }

    #[test]
    fn dm_room_detection() {
        assert!(is_dm_room(&dm_room_id("alice", "bob")));
        assert!(!is_dm_room("geral"));
    }

    #[test]
    fn join_is_idempotent() {
        let rooms = RoomDirectory::new();
        rooms.join("c1", "geral");
        rooms.join("c1", "geral");
        assert_eq!(rooms.members_of("geral"), vec!["c1".to_string()]);
    }

    #[test]
    fn members_of_unknown_room_is_empty() {
        let rooms = RoomDirectory::new();
        assert!(rooms.members_of("nowhere").is_empty());
    }

    #[test]
    fn leave_discards_emptied_rooms() {
        let rooms = RoomDirectory::new();
        rooms.join("c1", "geral");
        rooms.join("c2", "geral");
        assert_eq!(rooms.room_count(), 1);

        rooms.leave("c1", "geral");
        assert_eq!(rooms.members_of("geral"), vec!["c2".to_string()]);

        rooms.leave("c2", "geral");
        assert_eq!(rooms.room_count(), 0);
        assert!(rooms.members_of("geral").is_empty());
    }

    #[test]
    fn leave_unknown_room_is_noop() {
        let rooms = RoomDirectory::new();
        rooms.leave("c1", "nowhere");
        assert_eq!(rooms.room_count(), 0);
    }
}
