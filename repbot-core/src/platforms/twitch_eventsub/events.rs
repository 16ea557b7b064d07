// File: repbot-core/src/platforms/twitch_eventsub/events.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use repbot_common::models::{ChatMessage, RoleFlags};

use crate::eventbus::{BotEvent, TwitchEvent};

/// Metadata of the subscription a notification belongs to.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubscriptionData {
    pub id: String,
    #[serde(rename = "type")]
    pub sub_type: String,
    pub version: String,
    pub status: String,
    pub cost: u32,

    #[serde(default)]
    pub condition: serde_json::Value,

    #[serde(default)]
    pub transport: serde_json::Value,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Top-level wrapper of a "notification" payload:
/// `{ "subscription": { ... }, "event": { ... } }`
#[derive(Debug, Clone, Deserialize)]
pub struct EventSubNotificationEnvelope {
    pub subscription: SubscriptionData,
    pub event: serde_json::Value,
}

// --------------------------------------------------------------------------
// Structured `event` data per subscription type
// --------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct StreamOnline {
    pub id: String,
    pub broadcaster_user_id: String,
    pub broadcaster_user_login: String,
    pub broadcaster_user_name: String,
    #[serde(rename = "type")]
    pub stream_type: String,
    pub started_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StreamOffline {
    pub broadcaster_user_id: String,
    pub broadcaster_user_login: String,
    pub broadcaster_user_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChannelFollow {
    pub user_id: String,
    pub user_login: String,
    pub user_name: String,
    pub broadcaster_user_id: String,
    pub broadcaster_user_login: String,
    pub broadcaster_user_name: String,
    pub followed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChannelRaid {
    pub from_broadcaster_user_id: String,
    pub from_broadcaster_user_login: String,
    pub from_broadcaster_user_name: String,
    pub to_broadcaster_user_id: String,
    pub to_broadcaster_user_login: String,
    pub to_broadcaster_user_name: String,
    pub viewers: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChannelSubscribe {
    pub user_id: String,
    pub user_login: String,
    pub user_name: String,
    pub broadcaster_user_id: String,
    pub broadcaster_user_login: String,
    pub broadcaster_user_name: String,
    pub tier: String,
    pub is_gift: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChannelPointsRedemptionAdd {
    pub id: String,
    pub broadcaster_user_id: String,
    pub broadcaster_user_login: String,
    pub broadcaster_user_name: String,
    pub user_id: String,
    pub user_login: String,
    pub user_name: String,
    pub user_input: String,
    pub status: String,
    pub redeemed_at: DateTime<Utc>,
    pub reward: RedemptionRewardData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedemptionRewardData {
    pub id: String,
    pub title: String,
    pub cost: u64,
    pub prompt: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChannelChatMessage {
    pub broadcaster_user_id: String,
    pub broadcaster_user_login: String,
    pub broadcaster_user_name: String,
    pub chatter_user_id: String,
    pub chatter_user_login: String,
    pub chatter_user_name: String,
    pub message_id: String,
    pub message: ChatMessageBody,
    #[serde(default)]
    pub badges: Vec<ChatBadge>,
    #[serde(default)]
    pub color: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatMessageBody {
    pub text: String,
    #[serde(default)]
    pub fragments: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatBadge {
    pub set_id: String,
    pub id: String,
    #[serde(default)]
    pub info: String,
}

impl ChannelChatMessage {
    /// Normalize into the model the dispatch core consumes.
    pub fn to_chat_message(&self) -> ChatMessage {
        let roles = RoleFlags::from_badge_set_ids(self.badges.iter().map(|b| b.set_id.as_str()));
        ChatMessage {
            user_id: self.chatter_user_id.clone(),
            user_login: self.chatter_user_login.clone(),
            display_name: self.chatter_user_name.clone(),
            roles,
            message_id: self.message_id.clone(),
            text: self.message.text.clone(),
        }
    }
}

/// Map a raw notification onto a bus event. Unknown or malformed payloads
/// return `None`; the runtime logs and moves on.
pub fn parse_notification(sub_type: &str, event_json: &serde_json::Value) -> Option<BotEvent> {
    match sub_type {
        "channel.chat.message" => serde_json::from_value::<ChannelChatMessage>(event_json.clone())
            .ok()
            .map(|m| BotEvent::ChatMessage(m.to_chat_message())),
        "stream.online" => serde_json::from_value::<StreamOnline>(event_json.clone())
            .ok()
            .map(|e| BotEvent::Twitch(TwitchEvent::StreamOnline(e))),
        "stream.offline" => serde_json::from_value::<StreamOffline>(event_json.clone())
            .ok()
            .map(|e| BotEvent::Twitch(TwitchEvent::StreamOffline(e))),
        "channel.follow" => serde_json::from_value::<ChannelFollow>(event_json.clone())
            .ok()
            .map(|e| BotEvent::Twitch(TwitchEvent::ChannelFollow(e))),
        "channel.raid" => serde_json::from_value::<ChannelRaid>(event_json.clone())
            .ok()
            .map(|e| BotEvent::Twitch(TwitchEvent::ChannelRaid(e))),
        "channel.subscribe" => serde_json::from_value::<ChannelSubscribe>(event_json.clone())
            .ok()
            .map(|e| BotEvent::Twitch(TwitchEvent::ChannelSubscribe(e))),
        "channel.channel_points_custom_reward_redemption.add" => {
            serde_json::from_value::<ChannelPointsRedemptionAdd>(event_json.clone())
                .ok()
                .map(|e| BotEvent::Twitch(TwitchEvent::RedemptionAdd(e)))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn chat_message_notification_parses_and_normalizes() {
        let event = json!({
            "broadcaster_user_id": "123",
            "broadcaster_user_login": "streamer",
            "broadcaster_user_name": "Streamer",
            "chatter_user_id": "456",
            "chatter_user_login": "viewer",
            "chatter_user_name": "Viewer",
            "message_id": "abc-123",
            "message": { "text": "!pushups" },
            "badges": [
                { "set_id": "moderator", "id": "1", "info": "" },
                { "set_id": "subscriber", "id": "12", "info": "12" }
            ]
        });
        let parsed = parse_notification("channel.chat.message", &event).unwrap();
        match parsed {
            BotEvent::ChatMessage(msg) => {
                assert_eq!(msg.text, "!pushups");
                assert_eq!(msg.message_id, "abc-123");
                assert!(msg.roles.moderator);
                assert!(msg.roles.subscriber);
                assert!(!msg.roles.broadcaster);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn redemption_notification_parses() {
        let event = json!({
            "id": "redemption-1",
            "broadcaster_user_id": "123",
            "broadcaster_user_login": "streamer",
            "broadcaster_user_name": "Streamer",
            "user_id": "456",
            "user_login": "viewer",
            "user_name": "Viewer",
            "user_input": "",
            "status": "unfulfilled",
            "redeemed_at": "2024-11-02T18:00:00Z",
            "reward": { "id": "r1", "title": "Emote-Only Chat", "cost": 2000, "prompt": "" }
        });
        let parsed =
            parse_notification("channel.channel_points_custom_reward_redemption.add", &event)
                .unwrap();
        match parsed {
            BotEvent::Twitch(TwitchEvent::RedemptionAdd(r)) => {
                assert_eq!(r.reward.title, "Emote-Only Chat");
                assert_eq!(r.status, "unfulfilled");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn unknown_subscription_type_is_none() {
        assert!(parse_notification("channel.hype_train.begin", &json!({})).is_none());
    }
}
