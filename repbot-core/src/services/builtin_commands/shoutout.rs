use std::sync::Arc;

use async_trait::async_trait;

use repbot_common::Error;
use repbot_common::models::{ChatMessage, PermissionLevel, PermissionRequirement};
use repbot_common::traits::AnnouncementColor;

use crate::services::command_service::{CommandHandler, Trigger};
use crate::services::context::BotContext;

/// `!so <user>`: Helper+, announce a shoutout for another streamer.
/// Anyone below Helper gets nothing, not even an error.
pub struct ShoutoutCommand {
    trigger: Trigger,
}

impl ShoutoutCommand {
    pub fn new() -> Result<Self, Error> {
        Ok(Self {
            trigger: Trigger::exact(r"!so\s+@?(\w+)")?,
        })
    }
}

#[async_trait]
impl CommandHandler for ShoutoutCommand {
    fn id(&self) -> &str {
        "shoutout"
    }

    fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    async fn execute(&self, msg: &ChatMessage, ctx: &Arc<BotContext>) -> Result<(), Error> {
        let required = PermissionRequirement::AtLeast(PermissionLevel::Helper);
        if !ctx.permissions.meets(msg, &required) {
            return Ok(());
        }
        let target = msg
            .text
            .split_whitespace()
            .nth(1)
            .unwrap_or("")
            .trim_start_matches('@');
        let text = format!(
            "Go show {target} some love at https://twitch.tv/{target} !"
        );
        ctx.api
            .send_announcement(&text, AnnouncementColor::Purple)
            .await
    }
}
