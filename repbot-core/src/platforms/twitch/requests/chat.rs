//! Helix chat requests:
//!  - sendChatMessage (with optional threaded reply)
//!  - sendChatAnnouncement
//!  - getChatSettings / updateChatSettings (emote mode)

use serde::{Deserialize, Serialize};
use tracing::debug;

use repbot_common::Error;
use repbot_common::models::ChatSettings;
use repbot_common::traits::AnnouncementColor;

use crate::platforms::twitch::client::TwitchHelixClient;

#[derive(Debug, Serialize)]
struct SendMessageBody<'a> {
    broadcaster_id: &'a str,
    sender_id: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_parent_message_id: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct AnnouncementBody<'a> {
    message: &'a str,
    color: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatSettingsResponse {
    data: Vec<ChatSettings>,
}

#[derive(Debug, Serialize)]
struct UpdateChatSettingsBody {
    emote_mode: bool,
}

impl TwitchHelixClient {
    /// Send one chat message as the bot account.
    /// Required scope: `user:write:chat`
    pub async fn send_chat_message_req(
        &self,
        text: &str,
        reply_to: Option<&str>,
    ) -> Result<(), Error> {
        let url = "https://api.twitch.tv/helix/chat/messages";

        let body = SendMessageBody {
            broadcaster_id: self.broadcaster_id(),
            sender_id: self.bot_user_id(),
            message: text,
            reply_parent_message_id: reply_to,
        };

        debug!("send_chat_message => '{}' reply_to={:?}", text, reply_to);

        let resp = self
            .http_client()
            .post(url)
            .header("Client-Id", self.client_id())
            .header("Authorization", format!("Bearer {}", self.bearer_token()))
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Platform(format!("send_chat_message network error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(Error::Platform(format!(
                "send_chat_message: HTTP {status} => {text}"
            )));
        }
        Ok(())
    }

    /// Send a highlighted announcement.
    /// Required scope: `moderator:manage:announcements`
    pub async fn send_announcement_req(
        &self,
        text: &str,
        color: AnnouncementColor,
    ) -> Result<(), Error> {
        let url = format!(
            "https://api.twitch.tv/helix/chat/announcements?broadcaster_id={}&moderator_id={}",
            self.broadcaster_id(),
            self.bot_user_id()
        );

        let body = AnnouncementBody {
            message: text,
            color: color.as_str(),
        };

        let resp = self
            .http_client()
            .post(&url)
            .header("Client-Id", self.client_id())
            .header("Authorization", format!("Bearer {}", self.bearer_token()))
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Platform(format!("send_announcement network error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(Error::Platform(format!(
                "send_announcement: HTTP {status} => {text}"
            )));
        }
        Ok(())
    }

    /// Fetch the current chat settings for the channel.
    pub async fn get_chat_settings_req(&self) -> Result<ChatSettings, Error> {
        let url = format!(
            "https://api.twitch.tv/helix/chat/settings?broadcaster_id={}",
            self.broadcaster_id()
        );

        let resp = self
            .http_client()
            .get(&url)
            .header("Client-Id", self.client_id())
            .header("Authorization", format!("Bearer {}", self.bearer_token()))
            .send()
            .await
            .map_err(|e| Error::Platform(format!("get_chat_settings network error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(Error::Platform(format!(
                "get_chat_settings: HTTP {status} => {text}"
            )));
        }

        let parsed: ChatSettingsResponse = resp
            .json()
            .await
            .map_err(|e| Error::Platform(format!("get_chat_settings parse error: {e}")))?;
        parsed
            .data
            .into_iter()
            .next()
            .ok_or_else(|| Error::Platform("get_chat_settings: empty data".into()))
    }

    /// Toggle emote-only mode.
    /// Required scope: `moderator:manage:chat_settings`
    pub async fn update_chat_settings_emote_mode(&self, enabled: bool) -> Result<(), Error> {
        let url = format!(
            "https://api.twitch.tv/helix/chat/settings?broadcaster_id={}&moderator_id={}",
            self.broadcaster_id(),
            self.bot_user_id()
        );

        let body = UpdateChatSettingsBody {
            emote_mode: enabled,
        };

        debug!("update_chat_settings => emote_mode={}", enabled);

        let resp = self
            .http_client()
            .patch(&url)
            .header("Client-Id", self.client_id())
            .header("Authorization", format!("Bearer {}", self.bearer_token()))
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Platform(format!("update_chat_settings network error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(Error::Platform(format!(
                "update_chat_settings: HTTP {status} => {text}"
            )));
        }
        Ok(())
    }
}
