// File: repbot-core/src/services/builtin_commands/mod.rs
//! The built-in chat commands. Each family lives in its own file; this
//! module wires them all into the command registry.

pub mod discord;
pub mod moderation;
pub mod pushups;
pub mod shoutout;
pub mod song;
pub mod tower;

use std::sync::Arc;

use repbot_common::Error;
use repbot_common::models::ChatMessage;

use crate::services::command_service::CommandService;
use crate::services::context::BotContext;

/// Register every built-in command, in the order they should be tested
/// against incoming messages.
pub fn register_builtin_commands(service: &mut CommandService) -> Result<(), Error> {
    service.register(Arc::new(pushups::PushupsCommand::new()?));
    service.register(Arc::new(pushups::SetPushupsCommand::new()?));
    service.register(Arc::new(pushups::AddPushupsCommand::new()?));
    service.register(Arc::new(pushups::DidPushupsCommand::new()?));
    service.register(Arc::new(pushups::DailyPushupsCommand::new()?));
    service.register(Arc::new(pushups::Did24Command::new()?));
    service.register(Arc::new(pushups::InfractionCommand::new()?));
    service.register(Arc::new(shoutout::ShoutoutCommand::new()?));
    service.register(Arc::new(discord::DiscordCommand::new()?));
    service.register(Arc::new(tower::TowerCommand::new()?));
    service.register(Arc::new(tower::TheTowerCommand::new()?));
    service.register(Arc::new(song::SongCommand::new()?));
    service.register(Arc::new(song::SkipCommand::new()?));
    service.register(Arc::new(moderation::EmoteOnlyCommand::new()?));
    service.register(Arc::new(moderation::CommercialCommand::new()?));
    Ok(())
}

/// Threaded reply to the triggering message.
pub(crate) async fn reply(ctx: &BotContext, msg: &ChatMessage, text: &str) -> Result<(), Error> {
    ctx.api.send_chat_message(text, Some(&msg.message_id)).await
}
