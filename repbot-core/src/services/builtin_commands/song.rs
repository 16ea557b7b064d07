use std::sync::Arc;

use async_trait::async_trait;

use repbot_common::Error;
use repbot_common::models::{ChatMessage, PermissionLevel, PermissionRequirement};

use crate::services::builtin_commands::reply;
use crate::services::command_service::{CommandHandler, Trigger};
use crate::services::context::BotContext;

/// `!song`: what Spotify is currently playing.
pub struct SongCommand {
    trigger: Trigger,
}

impl SongCommand {
    pub fn new() -> Result<Self, Error> {
        Ok(Self {
            trigger: Trigger::exact("!song")?,
        })
    }
}

#[async_trait]
impl CommandHandler for SongCommand {
    fn id(&self) -> &str {
        "song"
    }

    fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    async fn execute(&self, msg: &ChatMessage, ctx: &Arc<BotContext>) -> Result<(), Error> {
        let guard = ctx.spotify.read().await;
        let Some(spotify) = guard.as_ref() else {
            return reply(ctx, msg, "Song info isn't available right now, sorry!").await;
        };
        match spotify.currently_playing().await? {
            Some(now_playing) => {
                reply(ctx, msg, &format!("Now playing: {}", now_playing.display())).await
            }
            None => reply(ctx, msg, "Nothing is playing right now.").await,
        }
    }
}

/// `!skip`: Helper+, skip the current Spotify track.
pub struct SkipCommand {
    trigger: Trigger,
}

impl SkipCommand {
    pub fn new() -> Result<Self, Error> {
        Ok(Self {
            trigger: Trigger::exact("!skip")?,
        })
    }
}

#[async_trait]
impl CommandHandler for SkipCommand {
    fn id(&self) -> &str {
        "skip"
    }

    fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    async fn execute(&self, msg: &ChatMessage, ctx: &Arc<BotContext>) -> Result<(), Error> {
        let required = PermissionRequirement::AtLeast(PermissionLevel::Helper);
        if !ctx.permissions.meets(msg, &required) {
            return Ok(());
        }
        let guard = ctx.spotify.read().await;
        let Some(spotify) = guard.as_ref() else {
            return reply(ctx, msg, "Song info isn't available right now, sorry!").await;
        };
        spotify.skip_track().await?;
        reply(ctx, msg, "Skipped!").await
    }
}
