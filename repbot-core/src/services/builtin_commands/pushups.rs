//! The pushup counter commands. Two counters exist: the standalone one
//! (plain arithmetic, negative means the broadcaster is in credit) and
//! the daily challenge (clamps at zero).

use std::sync::Arc;

use async_trait::async_trait;

use repbot_common::Error;
use repbot_common::models::{ChatMessage, PermissionLevel, PermissionRequirement};

use crate::services::builtin_commands::reply;
use crate::services::command_service::{CommandHandler, Trigger};
use crate::services::context::BotContext;

const HELPER_UP: PermissionRequirement = PermissionRequirement::AtLeast(PermissionLevel::Helper);

fn parse_count(arg: &str) -> Option<i64> {
    arg.trim().parse::<i64>().ok()
}

/// `!pushups`: report the standalone counter.
pub struct PushupsCommand {
    trigger: Trigger,
}

impl PushupsCommand {
    pub fn new() -> Result<Self, Error> {
        Ok(Self {
            trigger: Trigger::exact("!pushups")?,
        })
    }
}

#[async_trait]
impl CommandHandler for PushupsCommand {
    fn id(&self) -> &str {
        "pushups"
    }

    fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    async fn execute(&self, msg: &ChatMessage, ctx: &Arc<BotContext>) -> Result<(), Error> {
        let count = ctx.pushups.get();
        let name = &ctx.config.channel.broadcaster_login;
        let text = if count == 0 {
            format!("{name} has no pushups to do!")
        } else {
            format!("{name} has {count} pushups to do!")
        };
        reply(ctx, msg, &text).await
    }
}

/// `!setpushups <n>`: Helper+, overwrite the standalone counter.
/// Negative values are allowed.
pub struct SetPushupsCommand {
    trigger: Trigger,
}

impl SetPushupsCommand {
    pub fn new() -> Result<Self, Error> {
        Ok(Self {
            trigger: Trigger::exact(r"!setpushups\s+(\S+)")?,
        })
    }
}

#[async_trait]
impl CommandHandler for SetPushupsCommand {
    fn id(&self) -> &str {
        "setpushups"
    }

    fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    async fn execute(&self, msg: &ChatMessage, ctx: &Arc<BotContext>) -> Result<(), Error> {
        if !ctx.permissions.meets(msg, &HELPER_UP) {
            return Ok(());
        }
        let arg = msg.text.split_whitespace().nth(1).unwrap_or("");
        match parse_count(arg) {
            Some(n) => {
                ctx.pushups.set(n);
                reply(ctx, msg, &format!("Pushup counter set to {n}.")).await
            }
            None => reply(ctx, msg, "I don't understand that parameter.").await,
        }
    }
}

/// `!addpushups <n>`: Helper+, add to the standalone counter. A negative
/// `n` subtracts; no clamping anywhere.
pub struct AddPushupsCommand {
    trigger: Trigger,
}

impl AddPushupsCommand {
    pub fn new() -> Result<Self, Error> {
        Ok(Self {
            trigger: Trigger::exact(r"!addpushups\s+(\S+)")?,
        })
    }
}

#[async_trait]
impl CommandHandler for AddPushupsCommand {
    fn id(&self) -> &str {
        "addpushups"
    }

    fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    async fn execute(&self, msg: &ChatMessage, ctx: &Arc<BotContext>) -> Result<(), Error> {
        if !ctx.permissions.meets(msg, &HELPER_UP) {
            return Ok(());
        }
        let arg = msg.text.split_whitespace().nth(1).unwrap_or("");
        match parse_count(arg) {
            Some(n) => {
                let total = ctx.pushups.add(n);
                reply(ctx, msg, &format!("Pushup counter is now {total}.")).await
            }
            None => reply(ctx, msg, "I don't understand that parameter.").await,
        }
    }
}

/// `!didpushups <n>`: Helper+, log completed reps against the standalone
/// counter. Overshooting goes negative: the broadcaster is in credit.
pub struct DidPushupsCommand {
    trigger: Trigger,
}

impl DidPushupsCommand {
    pub fn new() -> Result<Self, Error> {
        Ok(Self {
            trigger: Trigger::exact(r"!didpushups\s+(\S+)")?,
        })
    }
}

#[async_trait]
impl CommandHandler for DidPushupsCommand {
    fn id(&self) -> &str {
        "didpushups"
    }

    fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    async fn execute(&self, msg: &ChatMessage, ctx: &Arc<BotContext>) -> Result<(), Error> {
        if !ctx.permissions.meets(msg, &HELPER_UP) {
            return Ok(());
        }
        let arg = msg.text.split_whitespace().nth(1).unwrap_or("");
        let Some(n) = parse_count(arg).filter(|n| *n > 0) else {
            return reply(ctx, msg, "I don't understand that parameter.").await;
        };
        let left = ctx.pushups.sub(n);
        let text = if left < 0 {
            format!("{n} done! That's {} in credit.", -left)
        } else {
            format!("{n} done, {left} to go.")
        };
        reply(ctx, msg, &text).await
    }
}

/// `!pushups24`: report the daily-challenge remainder.
pub struct DailyPushupsCommand {
    trigger: Trigger,
}

impl DailyPushupsCommand {
    pub fn new() -> Result<Self, Error> {
        Ok(Self {
            trigger: Trigger::exact("!pushups24")?,
        })
    }
}

#[async_trait]
impl CommandHandler for DailyPushupsCommand {
    fn id(&self) -> &str {
        "pushups24"
    }

    fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    async fn execute(&self, msg: &ChatMessage, ctx: &Arc<BotContext>) -> Result<(), Error> {
        let remaining = ctx.daily_pushups.remaining();
        let text = if remaining == 0 {
            "Daily challenge complete!".to_string()
        } else {
            format!("Daily challenge: {remaining} pushups remaining today.")
        };
        reply(ctx, msg, &text).await
    }
}

/// `!did24 <n>`: Helper+, log reps against the daily challenge. Clamps
/// at zero; finishing early earns no credit.
pub struct Did24Command {
    trigger: Trigger,
}

impl Did24Command {
    pub fn new() -> Result<Self, Error> {
        Ok(Self {
            trigger: Trigger::exact(r"!did24\s+(\S+)")?,
        })
    }
}

#[async_trait]
impl CommandHandler for Did24Command {
    fn id(&self) -> &str {
        "did24"
    }

    fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    async fn execute(&self, msg: &ChatMessage, ctx: &Arc<BotContext>) -> Result<(), Error> {
        if !ctx.permissions.meets(msg, &HELPER_UP) {
            return Ok(());
        }
        let arg = msg.text.split_whitespace().nth(1).unwrap_or("");
        let Some(n) = parse_count(arg).filter(|n| *n > 0) else {
            return reply(ctx, msg, "I don't understand that parameter.").await;
        };
        let remaining = ctx.daily_pushups.log_done(n);
        let text = if remaining == 0 {
            "Daily challenge complete!".to_string()
        } else {
            format!("{n} logged, {remaining} remaining in the daily challenge.")
        };
        reply(ctx, msg, &text).await
    }
}

/// `!infraction <kind>`: Helper+, add the configured penalty for a named
/// infraction to the standalone counter.
pub struct InfractionCommand {
    trigger: Trigger,
}

impl InfractionCommand {
    pub fn new() -> Result<Self, Error> {
        Ok(Self {
            trigger: Trigger::exact(r"!infraction\s+(\w+)")?,
        })
    }
}

#[async_trait]
impl CommandHandler for InfractionCommand {
    fn id(&self) -> &str {
        "infraction"
    }

    fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    async fn execute(&self, msg: &ChatMessage, ctx: &Arc<BotContext>) -> Result<(), Error> {
        if !ctx.permissions.meets(msg, &HELPER_UP) {
            return Ok(());
        }
        let kind = msg.text.split_whitespace().nth(1).unwrap_or("");
        match ctx.config.pushups.infractions.get(kind) {
            Some(increment) => {
                let total = ctx.pushups.add(*increment);
                reply(
                    ctx,
                    msg,
                    &format!("{kind}! +{increment} pushups, {total} on the board."),
                )
                .await
            }
            None => reply(ctx, msg, "I don't know that infraction.").await,
        }
    }
}
