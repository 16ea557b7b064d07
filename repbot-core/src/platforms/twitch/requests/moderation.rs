//! Helix moderation requests:
//!  - POST /moderation/bans (permanent ban when `duration` is omitted,
//!    timeout otherwise)
//!  - add/remove moderator
//!  - add/remove VIP

use serde::{Deserialize, Serialize};

use repbot_common::Error;

use crate::platforms::twitch::client::TwitchHelixClient;

#[derive(Debug, Serialize)]
struct BanRequest<'a> {
    data: BanRequestData<'a>,
}

#[derive(Debug, Serialize)]
struct BanRequestData<'a> {
    user_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'a str>,
}

/// Partial response struct; only present so a success body can be parsed
/// when tracing needs it.
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct BanResponse {
    data: Vec<BanResult>,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct BanResult {
    user_id: String,
    end_time: Option<String>,
}

impl TwitchHelixClient {
    /// Ban or timeout a user.
    ///
    /// * `duration`: `Some(seconds)` => timeout, `None` => permanent ban.
    /// Required scope: `moderator:manage:banned_users`
    pub async fn ban_or_timeout_user(
        &self,
        user_id: &str,
        duration: Option<u32>,
        reason: Option<&str>,
    ) -> Result<(), Error> {
        let url = format!(
            "https://api.twitch.tv/helix/moderation/bans?broadcaster_id={}&moderator_id={}",
            self.broadcaster_id(),
            self.bot_user_id()
        );

        let body = BanRequest {
            data: BanRequestData {
                user_id,
                duration,
                reason,
            },
        };

        let resp = self
            .http_client()
            .post(&url)
            .header("Client-Id", self.client_id())
            .header("Authorization", format!("Bearer {}", self.bearer_token()))
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Platform(format!("ban_user network error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(Error::Platform(format!("ban_user: HTTP {status} => {text}")));
        }
        Ok(())
    }

    /// Required scope: `channel:manage:moderators`
    pub async fn add_channel_moderator(&self, user_id: &str) -> Result<(), Error> {
        self.moderator_request(reqwest::Method::POST, user_id).await
    }

    pub async fn remove_channel_moderator(&self, user_id: &str) -> Result<(), Error> {
        self.moderator_request(reqwest::Method::DELETE, user_id)
            .await
    }

    /// Required scope: `channel:manage:vips`
    pub async fn add_channel_vip(&self, user_id: &str) -> Result<(), Error> {
        self.vip_request(reqwest::Method::POST, user_id).await
    }

    pub async fn remove_channel_vip(&self, user_id: &str) -> Result<(), Error> {
        self.vip_request(reqwest::Method::DELETE, user_id).await
    }

    async fn moderator_request(&self, method: reqwest::Method, user_id: &str) -> Result<(), Error> {
        let url = format!(
            "https://api.twitch.tv/helix/moderation/moderators?broadcaster_id={}&user_id={}",
            self.broadcaster_id(),
            user_id
        );
        self.role_request(method, &url, "moderators").await
    }

    async fn vip_request(&self, method: reqwest::Method, user_id: &str) -> Result<(), Error> {
        let url = format!(
            "https://api.twitch.tv/helix/channels/vips?broadcaster_id={}&user_id={}",
            self.broadcaster_id(),
            user_id
        );
        self.role_request(method, &url, "vips").await
    }

    async fn role_request(
        &self,
        method: reqwest::Method,
        url: &str,
        what: &str,
    ) -> Result<(), Error> {
        let resp = self
            .http_client()
            .request(method, url)
            .header("Client-Id", self.client_id())
            .header("Authorization", format!("Bearer {}", self.bearer_token()))
            .send()
            .await
            .map_err(|e| Error::Platform(format!("{what} network error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(Error::Platform(format!("{what}: HTTP {status} => {text}")));
        }
        Ok(())
    }
}
