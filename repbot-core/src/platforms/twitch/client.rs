// File: repbot-core/src/platforms/twitch/client.rs

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client as ReqwestClient;

use repbot_common::Error;
use repbot_common::models::{ChatSettings, RewardDefinition};
use repbot_common::traits::{AnnouncementColor, TwitchApi};

/// A small wrapper client for calling Helix endpoints, scoped to one
/// channel: the broadcaster id and the bot's own user id (used as
/// sender/moderator id) are fixed at construction.
pub struct TwitchHelixClient {
    http: Arc<ReqwestClient>,
    bearer_token: String,
    client_id: String,
    broadcaster_id: String,
    bot_user_id: String,
}

impl TwitchHelixClient {
    /// - `bearer_token`: a user OAuth token with the needed scopes
    /// - `client_id`: the app's client id
    /// - `broadcaster_id` / `bot_user_id`: channel owner and bot accounts
    pub fn new(
        bearer_token: &str,
        client_id: &str,
        broadcaster_id: &str,
        bot_user_id: &str,
    ) -> Self {
        Self {
            http: Arc::new(ReqwestClient::new()),
            bearer_token: bearer_token.to_string(),
            client_id: client_id.to_string(),
            broadcaster_id: broadcaster_id.to_string(),
            bot_user_id: bot_user_id.to_string(),
        }
    }

    pub fn bearer_token(&self) -> &str {
        &self.bearer_token
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn broadcaster_id(&self) -> &str {
        &self.broadcaster_id
    }

    pub fn bot_user_id(&self) -> &str {
        &self.bot_user_id
    }

    pub fn http_client(&self) -> Arc<ReqwestClient> {
        self.http.clone()
    }
}

// The capability surface the dispatch handlers call through. Each method
// delegates to the matching request module.
#[async_trait]
impl TwitchApi for TwitchHelixClient {
    async fn send_chat_message(&self, text: &str, reply_to: Option<&str>) -> Result<(), Error> {
        self.send_chat_message_req(text, reply_to).await
    }

    async fn send_announcement(&self, text: &str, color: AnnouncementColor) -> Result<(), Error> {
        self.send_announcement_req(text, color).await
    }

    async fn get_chat_settings(&self) -> Result<ChatSettings, Error> {
        self.get_chat_settings_req().await
    }

    async fn set_emote_only(&self, enabled: bool) -> Result<(), Error> {
        self.update_chat_settings_emote_mode(enabled).await
    }

    async fn ban_user(&self, user_id: &str, reason: &str) -> Result<(), Error> {
        self.ban_or_timeout_user(user_id, None, Some(reason)).await
    }

    async fn timeout_user(
        &self,
        user_id: &str,
        duration_secs: u32,
        reason: &str,
    ) -> Result<(), Error> {
        self.ban_or_timeout_user(user_id, Some(duration_secs), Some(reason))
            .await
    }

    async fn add_moderator(&self, user_id: &str) -> Result<(), Error> {
        self.add_channel_moderator(user_id).await
    }

    async fn remove_moderator(&self, user_id: &str) -> Result<(), Error> {
        self.remove_channel_moderator(user_id).await
    }

    async fn add_vip(&self, user_id: &str) -> Result<(), Error> {
        self.add_channel_vip(user_id).await
    }

    async fn remove_vip(&self, user_id: &str) -> Result<(), Error> {
        self.remove_channel_vip(user_id).await
    }

    async fn create_custom_reward(&self, def: &RewardDefinition) -> Result<String, Error> {
        self.create_custom_reward_req(def).await
    }

    async fn delete_custom_reward(&self, reward_id: &str) -> Result<(), Error> {
        self.delete_custom_reward_req(reward_id).await
    }

    async fn update_redemption_status(
        &self,
        reward_id: &str,
        redemption_id: &str,
        status: &str,
    ) -> Result<(), Error> {
        self.update_redemption_status_req(reward_id, redemption_id, status)
            .await
    }

    async fn start_commercial(&self, length_secs: u32) -> Result<(), Error> {
        self.start_commercial_req(length_secs).await
    }

    async fn is_stream_live(&self) -> Result<bool, Error> {
        self.fetch_stream_live().await
    }
}
