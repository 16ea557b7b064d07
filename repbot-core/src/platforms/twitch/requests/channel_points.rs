//! Helix channel points requests:
//!  - createCustomReward / deleteCustomReward
//!  - getCustomRewards
//!  - updateRedemptionStatus

use serde::{Deserialize, Serialize};
use tracing::debug;

use repbot_common::Error;
use repbot_common::models::RewardDefinition;

use crate::platforms::twitch::client::TwitchHelixClient;

/// The slice of a Helix custom reward the bot cares about.
#[derive(Debug, Deserialize)]
pub struct CustomReward {
    pub id: String,
    pub title: String,
    pub cost: u64,
    pub is_enabled: bool,
}

#[derive(Debug, Deserialize)]
struct CustomRewardResponse {
    data: Vec<CustomReward>,
}

#[derive(Debug, Serialize)]
struct CreateRewardBody<'a> {
    title: &'a str,
    cost: u64,
    #[serde(skip_serializing_if = "str::is_empty")]
    prompt: &'a str,
    is_user_input_required: bool,
}

#[derive(Debug, Serialize)]
struct UpdateRedemptionStatusBody<'a> {
    status: &'a str,
}

impl TwitchHelixClient {
    /// Create a custom reward in the channel; returns the new reward id.
    /// Required scope: `channel:manage:redemptions`
    pub async fn create_custom_reward_req(&self, def: &RewardDefinition) -> Result<String, Error> {
        let url = format!(
            "https://api.twitch.tv/helix/channel_points/custom_rewards?broadcaster_id={}",
            self.broadcaster_id()
        );

        let body = CreateRewardBody {
            title: &def.title,
            cost: def.cost,
            prompt: &def.prompt,
            is_user_input_required: def.is_user_input_required,
        };

        debug!("create_custom_reward => '{}' cost={}", def.title, def.cost);

        let resp = self
            .http_client()
            .post(&url)
            .header("Client-Id", self.client_id())
            .header("Authorization", format!("Bearer {}", self.bearer_token()))
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Platform(format!("create_custom_reward network error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(Error::Platform(format!(
                "create_custom_reward: HTTP {status} => {text}"
            )));
        }

        let parsed: CustomRewardResponse = resp
            .json()
            .await
            .map_err(|e| Error::Platform(format!("create_custom_reward parse error: {e}")))?;
        parsed
            .data
            .into_iter()
            .next()
            .map(|r| r.id)
            .ok_or_else(|| Error::Platform("create_custom_reward: empty data".into()))
    }

    /// List the custom rewards this client id manages in the channel.
    pub async fn get_custom_rewards(&self, only_manageable: bool) -> Result<Vec<CustomReward>, Error> {
        let url = format!(
            "https://api.twitch.tv/helix/channel_points/custom_rewards?broadcaster_id={}&only_manageable_rewards={}",
            self.broadcaster_id(),
            only_manageable
        );

        let resp = self
            .http_client()
            .get(&url)
            .header("Client-Id", self.client_id())
            .header("Authorization", format!("Bearer {}", self.bearer_token()))
            .send()
            .await
            .map_err(|e| Error::Platform(format!("get_custom_rewards network error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(Error::Platform(format!(
                "get_custom_rewards: HTTP {status} => {text}"
            )));
        }

        let parsed: CustomRewardResponse = resp
            .json()
            .await
            .map_err(|e| Error::Platform(format!("get_custom_rewards parse error: {e}")))?;
        Ok(parsed.data)
    }

    /// Required scope: `channel:manage:redemptions`
    pub async fn delete_custom_reward_req(&self, reward_id: &str) -> Result<(), Error> {
        let url = format!(
            "https://api.twitch.tv/helix/channel_points/custom_rewards?broadcaster_id={}&id={}",
            self.broadcaster_id(),
            reward_id
        );

        let resp = self
            .http_client()
            .delete(&url)
            .header("Client-Id", self.client_id())
            .header("Authorization", format!("Bearer {}", self.bearer_token()))
            .send()
            .await
            .map_err(|e| Error::Platform(format!("delete_custom_reward network error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(Error::Platform(format!(
                "delete_custom_reward: HTTP {status} => {text}"
            )));
        }
        Ok(())
    }

    /// Resolve a redemption: `status` is `FULFILLED` or `CANCELED`.
    /// Required scope: `channel:manage:redemptions`
    pub async fn update_redemption_status_req(
        &self,
        reward_id: &str,
        redemption_id: &str,
        status: &str,
    ) -> Result<(), Error> {
        let url = format!(
            "https://api.twitch.tv/helix/channel_points/custom_rewards/redemptions?broadcaster_id={}&reward_id={}&id={}",
            self.broadcaster_id(),
            reward_id,
            redemption_id
        );

        debug!(
            "update_redemption_status => redemption={} status={}",
            redemption_id, status
        );

        let body = UpdateRedemptionStatusBody { status };

        let resp = self
            .http_client()
            .patch(&url)
            .header("Client-Id", self.client_id())
            .header("Authorization", format!("Bearer {}", self.bearer_token()))
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Platform(format!("update_redemption_status network error: {e}")))?;

        if !resp.status().is_success() {
            let status_code = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(Error::Platform(format!(
                "update_redemption_status: HTTP {status_code} => {text}"
            )));
        }
        Ok(())
    }
}
