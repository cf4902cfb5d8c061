//! Client-server message protocol definitions.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Client → server events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Enter a channel or DM room.
    Join { username: String, room: String },

    /// Chat message addressed to a room.
    Message {
        room: String,
        username: String,
        msg: String,
    },

    /// WebRTC negotiation payload, relayed without interpretation.
    Signal(SignalEvent),

    /// Publish a profile for other users to see.
    Profile(ProfileUpdate),
}

/// Server → client events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Accept ack carrying the assigned connection id.
    Connected { connection_id: String },

    /// Room-level notice, e.g. a join announcement.
    System { msg: String },

    /// Chat message from a user, echoed to the whole room.
    User { msg: String, username: String },

    /// Verbatim relay of an inbound signal event.
    Signal(SignalEvent),

    /// Private notice delivered only to the offending sender.
    Error { code: String, message: String },
}

/// Signaling payload. `target` and `sender` are informational for the
/// receiving client; any extra negotiation fields ride in `payload`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalEvent {
    pub room: String,
    pub target: String,
    pub sender: String,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

/// Profile fields published by a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub username: String,
    pub avatar: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}
