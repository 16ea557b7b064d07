use std::sync::Arc;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use repbot_common::Error;

use crate::eventbus::{BotEvent, TwitchEvent};
use crate::services::context::BotContext;
use crate::services::event_service::{
    BroadcastIdentity, EventDescriptor, EventHandler, SetupOutcome,
};

/// Flips `stream_live` on and resets the daily challenge for the new
/// stream day. Its `setup` seeds the flag for the case where the bot
/// starts mid-stream.
pub struct StreamOnlineHandler;

#[async_trait]
impl EventHandler for StreamOnlineHandler {
    fn id(&self) -> &str {
        "stream_online"
    }

    fn descriptor(&self, identity: &BroadcastIdentity) -> EventDescriptor {
        EventDescriptor::Platform {
            event_type: "stream.online".to_string(),
            version: "1".to_string(),
            condition: json!({ "broadcaster_user_id": identity.broadcaster_user_id }),
        }
    }

    async fn setup(&self, ctx: &Arc<BotContext>) -> SetupOutcome {
        match ctx.api.is_stream_live().await {
            Ok(live) => {
                ctx.stream_live.store(live, Ordering::SeqCst);
                SetupOutcome::Ready
            }
            Err(e) => SetupOutcome::Failed(format!("live-status query failed: {e}")),
        }
    }

    async fn execute(&self, event: &BotEvent, ctx: &Arc<BotContext>) -> Result<(), Error> {
        if let BotEvent::Twitch(TwitchEvent::StreamOnline(evt)) = event {
            ctx.stream_live.store(true, Ordering::SeqCst);
            ctx.daily_pushups.reset(ctx.config.pushups.daily_goal);
            info!("stream went live ({})", evt.broadcaster_user_login);
        }
        Ok(())
    }
}

pub struct StreamOfflineHandler;

#[async_trait]
impl EventHandler for StreamOfflineHandler {
    fn id(&self) -> &str {
        "stream_offline"
    }

    fn descriptor(&self, identity: &BroadcastIdentity) -> EventDescriptor {
        EventDescriptor::Platform {
            event_type: "stream.offline".to_string(),
            version: "1".to_string(),
            condition: json!({ "broadcaster_user_id": identity.broadcaster_user_id }),
        }
    }

    async fn execute(&self, event: &BotEvent, ctx: &Arc<BotContext>) -> Result<(), Error> {
        if let BotEvent::Twitch(TwitchEvent::StreamOffline(evt)) = event {
            ctx.stream_live.store(false, Ordering::SeqCst);
            info!("stream went offline ({})", evt.broadcaster_user_login);
        }
        Ok(())
    }
}
