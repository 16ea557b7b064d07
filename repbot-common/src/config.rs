use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::models::redeem::RewardDefinition;

/// Static bot configuration, loaded once at startup and read-only after.
/// Secrets (tokens, client ids) come from the environment, never from here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    pub channel: ChannelConfig,
    #[serde(default)]
    pub pushups: PushupConfig,
    #[serde(default)]
    pub timers: TimerConfig,
    #[serde(default)]
    pub links: LinkConfig,
    /// Managed channel-point rewards provisioned at startup.
    #[serde(default)]
    pub rewards: Vec<RewardDefinition>,
    #[serde(default)]
    pub spotify: SpotifyConfig,
    #[serde(default)]
    pub gdrive: GDriveConfig,
}

impl BotConfig {
    pub fn load(path: &Path) -> Result<BotConfig, Error> {
        let contents = std::fs::read_to_string(path)?;
        let config: BotConfig = toml::from_str(&contents)?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    pub broadcaster_id: String,
    pub broadcaster_login: String,
    /// The account the bot chats as.
    pub bot_user_id: String,
    /// User ids that bypass every permission check.
    #[serde(default)]
    pub owner_ids: Vec<String>,
    /// User ids granted the Helper level.
    #[serde(default)]
    pub helper_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushupConfig {
    /// Increment applied per infraction kind, e.g. `swear = 5`.
    #[serde(default)]
    pub infractions: HashMap<String, i64>,
    #[serde(default = "default_daily_goal")]
    pub daily_goal: i64,
}

impl Default for PushupConfig {
    fn default() -> Self {
        Self {
            infractions: HashMap::new(),
            daily_goal: default_daily_goal(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    /// How long emote-only chat stays on after the redemption, in minutes.
    #[serde(default = "default_emote_only_minutes")]
    pub emote_only_minutes: u64,
    /// Timeout length for the timeout redemption, in seconds.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u32,
    /// Commercial length in seconds. Helix accepts 30..180 in 30s steps.
    #[serde(default = "default_commercial_seconds")]
    pub commercial_seconds: u32,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            emote_only_minutes: default_emote_only_minutes(),
            timeout_seconds: default_timeout_seconds(),
            commercial_seconds: default_commercial_seconds(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkConfig {
    #[serde(default)]
    pub discord_invite: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpotifyConfig {
    #[serde(default)]
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GDriveConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Drive file id of the credentials blob fetched at boot.
    #[serde(default)]
    pub credentials_file_id: String,
}

fn default_daily_goal() -> i64 {
    100
}

fn default_emote_only_minutes() -> u64 {
    2
}

fn default_timeout_seconds() -> u32 {
    60
}

fn default_commercial_seconds() -> u32 {
    90
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_parses_with_defaults() {
        let cfg: BotConfig = toml::from_str(
            r#"
            [channel]
            broadcaster_id = "123"
            broadcaster_login = "streamer"
            bot_user_id = "456"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.timers.emote_only_minutes, 2);
        assert_eq!(cfg.pushups.daily_goal, 100);
        assert!(cfg.rewards.is_empty());
        assert!(!cfg.spotify.enabled);
    }

    #[test]
    fn infraction_map_and_rewards_parse() {
        let cfg: BotConfig = toml::from_str(
            r#"
            [channel]
            broadcaster_id = "123"
            broadcaster_login = "streamer"
            bot_user_id = "456"
            helper_ids = ["99"]

            [pushups.infractions]
            swear = 5
            death = 10

            [[rewards]]
            title = "Emote-Only Chat"
            cost = 2000

            [links]
            discord_invite = "https://discord.gg/example"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.pushups.infractions["death"], 10);
        assert_eq!(cfg.rewards[0].title, "Emote-Only Chat");
        assert_eq!(cfg.channel.helper_ids, vec!["99".to_string()]);
    }
}
