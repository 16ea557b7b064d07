//! The Tower commands. `!tower` and `!thetower` deliberately share a
//! prefix; whole-text trigger matching is what keeps them apart.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use repbot_common::Error;
use repbot_common::models::ChatMessage;

use crate::services::builtin_commands::reply;
use crate::services::command_service::{CommandHandler, Trigger};
use crate::services::context::BotContext;

/// `!tower`: the broadcaster's current Tower progress. Keeps a
/// per-handler ask counter across invocations.
pub struct TowerCommand {
    trigger: Trigger,
    asks: AtomicU64,
}

impl TowerCommand {
    pub fn new() -> Result<Self, Error> {
        Ok(Self {
            trigger: Trigger::exact("!tower")?,
            asks: AtomicU64::new(0),
        })
    }
}

#[async_trait]
impl CommandHandler for TowerCommand {
    fn id(&self) -> &str {
        "tower"
    }

    fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    async fn execute(&self, msg: &ChatMessage, ctx: &Arc<BotContext>) -> Result<(), Error> {
        let asks = self.asks.fetch_add(1, Ordering::SeqCst) + 1;
        let name = &ctx.config.channel.broadcaster_login;
        reply(
            ctx,
            msg,
            &format!("{name} is grinding The Tower between rounds. Asked {asks}x this session!"),
        )
        .await
    }
}

/// `!thetower`: what the game actually is.
pub struct TheTowerCommand {
    trigger: Trigger,
}

impl TheTowerCommand {
    pub fn new() -> Result<Self, Error> {
        Ok(Self {
            trigger: Trigger::exact("!thetower")?,
        })
    }
}

#[async_trait]
impl CommandHandler for TheTowerCommand {
    fn id(&self) -> &str {
        "thetower"
    }

    fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    async fn execute(&self, msg: &ChatMessage, ctx: &Arc<BotContext>) -> Result<(), Error> {
        reply(
            ctx,
            msg,
            "The Tower is an idle tower-defense game. Ask !tower to see how the climb is going.",
        )
        .await
    }
}
