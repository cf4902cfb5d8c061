//! Profile publication handling.

use crate::profiles::Profile;
use crate::protocol::ProfileUpdate;
use crate::state::AppState;

/// Store a published profile. Usernames are first-come: an update for an
/// already claimed name is ignored.
pub fn handle_profile_update(state: &AppState, update: ProfileUpdate) {
    let username = update.username.clone();
    let created = state.profiles.insert_new(Profile {
        username: update.username,
        avatar: update.avatar,
        bio: update.bio,
        status: update.status,
        photo: update.photo,
    });

    if created {
        tracing::info!(username = %username, "profile created");
    } else {
        tracing::debug!(username = %username, "profile already exists, update ignored");
    }
}
