use serde::{Deserialize, Serialize};

/// A channel-point redemption awaiting resolution. Created from the
/// platform's redemption-add event; exactly one trigger body is expected to
/// move it to a terminal status (fulfilled or canceled), possibly on a
/// timer. Double resolution is a caller bug the registry does not guard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Redemption {
    pub id: String,
    pub broadcaster_id: String,
    pub user_id: String,
    pub user_login: String,
    pub user_name: String,
    pub user_input: String,
    /// Helix status string: `unfulfilled`, `FULFILLED`, `CANCELED`.
    pub status: String,
    pub redeemed_at: String,
    pub reward: RewardInfo,
}

/// The reward a redemption was made against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardInfo {
    pub id: String,
    pub title: String,
    pub prompt: String,
    pub cost: u64,
}

/// A managed custom reward the bot provisions at startup. Doubles as the
/// Helix create-reward request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardDefinition {
    pub title: String,
    pub cost: u64,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub is_user_input_required: bool,
}
