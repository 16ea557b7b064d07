//! Chat reactions to follows, raids, and subs.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use repbot_common::Error;
use repbot_common::traits::AnnouncementColor;

use crate::eventbus::{BotEvent, TwitchEvent};
use crate::services::context::BotContext;
use crate::services::event_service::{BroadcastIdentity, EventDescriptor, EventHandler};

pub struct FollowGreeter;

#[async_trait]
impl EventHandler for FollowGreeter {
    fn id(&self) -> &str {
        "follow_greeter"
    }

    fn descriptor(&self, identity: &BroadcastIdentity) -> EventDescriptor {
        // channel.follow v2 wants a moderator-scoped condition.
        EventDescriptor::Platform {
            event_type: "channel.follow".to_string(),
            version: "2".to_string(),
            condition: json!({
                "broadcaster_user_id": identity.broadcaster_user_id,
                "moderator_user_id": identity.bot_user_id,
            }),
        }
    }

    async fn execute(&self, event: &BotEvent, ctx: &Arc<BotContext>) -> Result<(), Error> {
        if let BotEvent::Twitch(TwitchEvent::ChannelFollow(evt)) = event {
            ctx.api
                .send_chat_message(&format!("Thanks for the follow, {}!", evt.user_name), None)
                .await?;
        }
        Ok(())
    }
}

pub struct RaidGreeter;

#[async_trait]
impl EventHandler for RaidGreeter {
    fn id(&self) -> &str {
        "raid_greeter"
    }

    fn descriptor(&self, identity: &BroadcastIdentity) -> EventDescriptor {
        EventDescriptor::Platform {
            event_type: "channel.raid".to_string(),
            version: "1".to_string(),
            condition: json!({ "to_broadcaster_user_id": identity.broadcaster_user_id }),
        }
    }

    async fn execute(&self, event: &BotEvent, ctx: &Arc<BotContext>) -> Result<(), Error> {
        if let BotEvent::Twitch(TwitchEvent::ChannelRaid(evt)) = event {
            ctx.api
                .send_announcement(
                    &format!(
                        "{} is raiding with {} viewers! Welcome everyone!",
                        evt.from_broadcaster_user_name, evt.viewers
                    ),
                    AnnouncementColor::Orange,
                )
                .await?;
            ctx.api
                .send_chat_message(
                    &format!(
                        "Go give {} a follow at https://twitch.tv/{} !",
                        evt.from_broadcaster_user_name, evt.from_broadcaster_user_login
                    ),
                    None,
                )
                .await?;
        }
        Ok(())
    }
}

pub struct SubGreeter;

#[async_trait]
impl EventHandler for SubGreeter {
    fn id(&self) -> &str {
        "sub_greeter"
    }

    fn descriptor(&self, identity: &BroadcastIdentity) -> EventDescriptor {
        EventDescriptor::Platform {
            event_type: "channel.subscribe".to_string(),
            version: "1".to_string(),
            condition: json!({ "broadcaster_user_id": identity.broadcaster_user_id }),
        }
    }

    async fn execute(&self, event: &BotEvent, ctx: &Arc<BotContext>) -> Result<(), Error> {
        if let BotEvent::Twitch(TwitchEvent::ChannelSubscribe(evt)) = event {
            // Gift recipients get thanked when the gifter's event lands.
            if !evt.is_gift {
                ctx.api
                    .send_chat_message(&format!("Thanks for the sub, {}!", evt.user_name), None)
                    .await?;
            }
        }
        Ok(())
    }
}
