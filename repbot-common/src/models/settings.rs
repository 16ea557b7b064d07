use serde::{Deserialize, Serialize};

/// The slice of Helix chat settings the bot reads and toggles.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatSettings {
    pub broadcaster_id: String,
    pub emote_mode: bool,
    pub follower_mode: bool,
    pub slow_mode: bool,
    pub subscriber_mode: bool,
    pub unique_chat_mode: bool,
}
