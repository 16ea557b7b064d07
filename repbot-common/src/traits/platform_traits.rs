use async_trait::async_trait;

use crate::error::Error;
use crate::models::redeem::RewardDefinition;
use crate::models::settings::ChatSettings;

/// Accent colors Helix accepts for announcements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnouncementColor {
    Primary,
    Blue,
    Green,
    Orange,
    Purple,
}

impl AnnouncementColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnnouncementColor::Primary => "primary",
            AnnouncementColor::Blue => "blue",
            AnnouncementColor::Green => "green",
            AnnouncementColor::Orange => "orange",
            AnnouncementColor::Purple => "purple",
        }
    }
}

/// The outbound Twitch capabilities handler bodies call through. The live
/// implementation is the Helix client in repbot-core; tests substitute
/// recording fakes behind the same `Arc<dyn TwitchApi>`.
#[async_trait]
pub trait TwitchApi: Send + Sync {
    /// Send a chat message, optionally as a threaded reply.
    async fn send_chat_message(&self, text: &str, reply_to: Option<&str>) -> Result<(), Error>;

    /// Send a highlighted announcement.
    async fn send_announcement(&self, text: &str, color: AnnouncementColor) -> Result<(), Error>;

    async fn get_chat_settings(&self) -> Result<ChatSettings, Error>;

    async fn set_emote_only(&self, enabled: bool) -> Result<(), Error>;

    async fn ban_user(&self, user_id: &str, reason: &str) -> Result<(), Error>;

    async fn timeout_user(&self, user_id: &str, duration_secs: u32, reason: &str)
    -> Result<(), Error>;

    async fn add_moderator(&self, user_id: &str) -> Result<(), Error>;

    async fn remove_moderator(&self, user_id: &str) -> Result<(), Error>;

    async fn add_vip(&self, user_id: &str) -> Result<(), Error>;

    async fn remove_vip(&self, user_id: &str) -> Result<(), Error>;

    /// Create a managed custom reward; returns the new reward id.
    async fn create_custom_reward(&self, def: &RewardDefinition) -> Result<String, Error>;

    async fn delete_custom_reward(&self, reward_id: &str) -> Result<(), Error>;

    /// Resolve a redemption: `status` is `FULFILLED` or `CANCELED`.
    async fn update_redemption_status(
        &self,
        reward_id: &str,
        redemption_id: &str,
        status: &str,
    ) -> Result<(), Error>;

    async fn start_commercial(&self, length_secs: u32) -> Result<(), Error>;

    async fn is_stream_live(&self) -> Result<bool, Error>;
}
