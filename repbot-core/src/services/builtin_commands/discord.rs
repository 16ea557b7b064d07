use std::sync::Arc;

use async_trait::async_trait;

use repbot_common::Error;
use repbot_common::models::ChatMessage;

use crate::services::builtin_commands::reply;
use crate::services::command_service::{CommandHandler, Trigger};
use crate::services::context::BotContext;

/// `!discord`: post the community invite link.
pub struct DiscordCommand {
    trigger: Trigger,
}

impl DiscordCommand {
    pub fn new() -> Result<Self, Error> {
        Ok(Self {
            trigger: Trigger::exact("!discord")?,
        })
    }
}

#[async_trait]
impl CommandHandler for DiscordCommand {
    fn id(&self) -> &str {
        "discord"
    }

    fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    async fn execute(&self, msg: &ChatMessage, ctx: &Arc<BotContext>) -> Result<(), Error> {
        let invite = &ctx.config.links.discord_invite;
        if invite.is_empty() {
            return Ok(());
        }
        reply(ctx, msg, &format!("Join the community Discord: {invite}")).await
    }
}
