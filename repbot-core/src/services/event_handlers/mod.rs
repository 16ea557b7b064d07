// File: repbot-core/src/services/event_handlers/mod.rs
//! Lifecycle and platform-event handlers, one per file.

pub mod gdrive_setup;
pub mod greeters;
pub mod rewards;
pub mod spotify_setup;
pub mod stream_state;

use std::sync::Arc;

use crate::services::event_service::{BroadcastIdentity, EventRegistry};

pub fn register_builtin_events(registry: &mut EventRegistry, identity: &BroadcastIdentity) {
    // Lifecycle handlers first; their priorities order the boot sequence
    // (Drive before Spotify before reward provisioning).
    registry.register(Arc::new(gdrive_setup::GDriveSetupHandler), identity);
    registry.register(Arc::new(spotify_setup::SpotifySetupHandler), identity);
    registry.register(Arc::new(rewards::RewardProvisionHandler::new()), identity);

    registry.register(Arc::new(stream_state::StreamOnlineHandler), identity);
    registry.register(Arc::new(stream_state::StreamOfflineHandler), identity);
    registry.register(Arc::new(greeters::FollowGreeter), identity);
    registry.register(Arc::new(greeters::RaidGreeter), identity);
    registry.register(Arc::new(greeters::SubGreeter), identity);
}
