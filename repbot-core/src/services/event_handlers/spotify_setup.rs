use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::platforms::spotify::SpotifyClient;
use crate::services::context::BotContext;
use crate::services::event_service::{BroadcastIdentity, EventDescriptor, EventHandler, SetupOutcome};

/// Startup priority 20: build the Spotify client. The refresh token comes
/// from the environment, or failing that from the Drive bundle the
/// priority-10 handler loaded.
pub struct SpotifySetupHandler;

#[async_trait]
impl EventHandler for SpotifySetupHandler {
    fn id(&self) -> &str {
        "spotify_setup"
    }

    fn descriptor(&self, _identity: &BroadcastIdentity) -> EventDescriptor {
        EventDescriptor::Startup { priority: 20 }
    }

    async fn setup(&self, ctx: &Arc<BotContext>) -> SetupOutcome {
        if !ctx.config.spotify.enabled {
            return SetupOutcome::Skipped;
        }
        let (Ok(client_id), Ok(client_secret)) = (
            std::env::var("SPOTIFY_CLIENT_ID"),
            std::env::var("SPOTIFY_CLIENT_SECRET"),
        ) else {
            return SetupOutcome::Skipped;
        };

        let refresh_token = match std::env::var("SPOTIFY_REFRESH_TOKEN") {
            Ok(t) => t,
            Err(_) => {
                let guard = ctx.gdrive_credentials.read().await;
                match guard
                    .as_ref()
                    .and_then(|bundle| bundle.get("spotify_refresh_token"))
                {
                    Some(t) => t.to_string(),
                    None => return SetupOutcome::Skipped,
                }
            }
        };

        match SpotifyClient::from_refresh_token(&client_id, &client_secret, &refresh_token).await {
            Ok(client) => {
                *ctx.spotify.write().await = Some(client);
                info!("spotify client ready");
                SetupOutcome::Ready
            }
            Err(e) => SetupOutcome::Failed(format!("spotify auth failed: {e}")),
        }
    }

    async fn unload(&self, ctx: &Arc<BotContext>) -> SetupOutcome {
        // Stop the music with the stream; a missing client means there is
        // nothing to do.
        let guard = ctx.spotify.read().await;
        match guard.as_ref() {
            Some(client) => match client.pause().await {
                Ok(()) => SetupOutcome::Ready,
                Err(e) => SetupOutcome::Failed(format!("spotify pause failed: {e}")),
            },
            None => SetupOutcome::Skipped,
        }
    }
}
