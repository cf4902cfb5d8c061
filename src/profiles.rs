//! In-memory profile store.
//!
//! The realtime core only reads `avatar` (for join notices) and writes new
//! profiles published over the socket. Everything else about profiles —
//! rendering, photo upload, the admin surface — lives outside this server.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// A user's public profile.
#[derive(Debug, Clone)]
pub struct Profile {
    pub username: String,
    pub avatar: String,
    pub bio: Option<String>,
    pub status: Option<String>,
    pub photo: Option<String>,
}

/// Profiles keyed by username.
pub struct ProfileStore {
    profiles: DashMap<String, Profile>,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self {
            profiles: DashMap::new(),
        }
    }

    /// Insert a profile if the username is unclaimed. Returns `false` and
    /// leaves the existing profile untouched otherwise.
    pub fn insert_new(&self, profile: Profile) -> bool {
        match self.profiles.entry(profile.username.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(profile);
                true
            }
        }
    }

    /// The avatar glyph for a username, if a profile exists.
    pub fn avatar_of(&self, username: &str) -> Option<String> {
        self.profiles.get(username).map(|p| p.avatar.clone())
    }
}
