use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use tokio::sync::RwLock;

use repbot_common::config::BotConfig;
use repbot_common::models::PermissionEvaluator;
use repbot_common::traits::TwitchApi;

use crate::platforms::gdrive::CredentialBundle;
use crate::platforms::spotify::SpotifyClient;
use crate::services::counters::{DailyChallenge, PushupCounter};

/// Everything handlers share, bundled into one struct and passed by `Arc`
/// at registration time; there is no ambient global state.
///
/// The counters and flags are deliberately plain atomics: any handler may
/// read or write them with no transaction discipline, and two handlers
/// reacting to the same message can interleave. Last write wins.
pub struct BotContext {
    pub config: Arc<BotConfig>,
    pub api: Arc<dyn TwitchApi>,
    pub permissions: PermissionEvaluator,

    /// Standalone pushup debt. May go negative (owed credit).
    pub pushups: PushupCounter,
    /// Daily-challenge remainder; clamps at zero.
    pub daily_pushups: DailyChallenge,

    pub stream_live: AtomicBool,
    pub gdrive_ready: AtomicBool,
    pub gdrive_credentials: RwLock<Option<CredentialBundle>>,
    /// Populated by the Spotify setup handler; `None` until then (and
    /// forever, if Spotify is disabled or misconfigured).
    pub spotify: RwLock<Option<SpotifyClient>>,
}

impl BotContext {
    pub fn new(config: Arc<BotConfig>, api: Arc<dyn TwitchApi>) -> Self {
        let permissions = PermissionEvaluator::new(
            config.channel.owner_ids.clone(),
            config.channel.helper_ids.clone(),
        );
        let daily_pushups = DailyChallenge::new(config.pushups.daily_goal);
        Self {
            config,
            api,
            permissions,
            pushups: PushupCounter::new(),
            daily_pushups,
            stream_live: AtomicBool::new(false),
            gdrive_ready: AtomicBool::new(false),
            gdrive_credentials: RwLock::new(None),
            spotify: RwLock::new(None),
        }
    }
}
