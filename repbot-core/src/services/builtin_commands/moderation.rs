use std::sync::Arc;

use async_trait::async_trait;

use repbot_common::Error;
use repbot_common::models::{ChatMessage, PermissionLevel, PermissionRequirement};

use crate::services::builtin_commands::reply;
use crate::services::command_service::{CommandHandler, Trigger};
use crate::services::context::BotContext;

const MOD_UP: PermissionRequirement = PermissionRequirement::AtLeast(PermissionLevel::Moderator);

/// `!emoteonly <on|off>`: Moderator+, toggle emote-only mode by hand.
pub struct EmoteOnlyCommand {
    trigger: Trigger,
}

impl EmoteOnlyCommand {
    pub fn new() -> Result<Self, Error> {
        Ok(Self {
            trigger: Trigger::exact(r"!emoteonly\s+(\w+)")?,
        })
    }
}

#[async_trait]
impl CommandHandler for EmoteOnlyCommand {
    fn id(&self) -> &str {
        "emoteonly"
    }

    fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    async fn execute(&self, msg: &ChatMessage, ctx: &Arc<BotContext>) -> Result<(), Error> {
        if !ctx.permissions.meets(msg, &MOD_UP) {
            return Ok(());
        }
        let enabled = match msg.text.split_whitespace().nth(1) {
            Some("on") => true,
            Some("off") => false,
            _ => {
                return reply(ctx, msg, "I don't understand that parameter.").await;
            }
        };
        ctx.api.set_emote_only(enabled).await?;
        let text = if enabled {
            "Emote-only mode enabled."
        } else {
            "Emote-only mode disabled."
        };
        reply(ctx, msg, text).await
    }
}

/// `!commercial`: Moderator+, run a commercial break of the configured
/// length.
pub struct CommercialCommand {
    trigger: Trigger,
}

impl CommercialCommand {
    pub fn new() -> Result<Self, Error> {
        Ok(Self {
            trigger: Trigger::exact("!commercial")?,
        })
    }
}

#[async_trait]
impl CommandHandler for CommercialCommand {
    fn id(&self) -> &str {
        "commercial"
    }

    fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    async fn execute(&self, msg: &ChatMessage, ctx: &Arc<BotContext>) -> Result<(), Error> {
        if !ctx.permissions.meets(msg, &MOD_UP) {
            return Ok(());
        }
        let secs = ctx.config.timers.commercial_seconds;
        ctx.api.start_commercial(secs).await?;
        reply(ctx, msg, &format!("Running a {secs}s commercial. Stretch break!")).await
    }
}
