use std::sync::Arc;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use tracing::info;

use crate::platforms::gdrive;
use crate::services::context::BotContext;
use crate::services::event_service::{BroadcastIdentity, EventDescriptor, EventHandler, SetupOutcome};

/// Startup priority 10: fetch the credential bundle from Drive before
/// anything that might want to read tokens out of it (the Spotify setup
/// runs at 20).
pub struct GDriveSetupHandler;

#[async_trait]
impl EventHandler for GDriveSetupHandler {
    fn id(&self) -> &str {
        "gdrive_setup"
    }

    fn descriptor(&self, _identity: &BroadcastIdentity) -> EventDescriptor {
        EventDescriptor::Startup { priority: 10 }
    }

    async fn setup(&self, ctx: &Arc<BotContext>) -> SetupOutcome {
        let cfg = &ctx.config.gdrive;
        if !cfg.enabled || cfg.credentials_file_id.is_empty() {
            return SetupOutcome::Skipped;
        }
        let Ok(access_token) = std::env::var("GDRIVE_ACCESS_TOKEN") else {
            return SetupOutcome::Skipped;
        };

        match gdrive::fetch_credentials(&access_token, &cfg.credentials_file_id).await {
            Ok(bundle) => {
                *ctx.gdrive_credentials.write().await = Some(bundle);
                ctx.gdrive_ready.store(true, Ordering::SeqCst);
                info!("gdrive credential bundle loaded");
                SetupOutcome::Ready
            }
            Err(e) => SetupOutcome::Failed(format!("gdrive bootstrap failed: {e}")),
        }
    }
}
