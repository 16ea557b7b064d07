use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::{info, warn};

use crate::services::context::BotContext;
use crate::services::event_service::{BroadcastIdentity, EventDescriptor, EventHandler, SetupOutcome};

/// Startup priority 30: create the managed channel-point rewards from
/// config. `unload` deletes exactly the rewards this handler created, so
/// a crash-free shutdown leaves no orphan rewards behind.
pub struct RewardProvisionHandler {
    created_ids: Mutex<Vec<String>>,
}

impl RewardProvisionHandler {
    pub fn new() -> Self {
        Self {
            created_ids: Mutex::new(Vec::new()),
        }
    }
}

impl Default for RewardProvisionHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventHandler for RewardProvisionHandler {
    fn id(&self) -> &str {
        "reward_provision"
    }

    fn descriptor(&self, _identity: &BroadcastIdentity) -> EventDescriptor {
        EventDescriptor::Startup { priority: 30 }
    }

    async fn setup(&self, ctx: &Arc<BotContext>) -> SetupOutcome {
        let definitions = &ctx.config.rewards;
        if definitions.is_empty() {
            return SetupOutcome::Skipped;
        }

        let mut failures = 0usize;
        for def in definitions {
            match ctx.api.create_custom_reward(def).await {
                Ok(reward_id) => {
                    info!("provisioned reward '{}' => {}", def.title, reward_id);
                    self.created_ids
                        .lock()
                        .map(|mut ids| ids.push(reward_id))
                        .ok();
                }
                Err(e) => {
                    // A duplicate from a previous unclean shutdown lands
                    // here too; either way the reward exists or we say so.
                    warn!("could not provision reward '{}': {:?}", def.title, e);
                    failures += 1;
                }
            }
        }

        if failures == definitions.len() {
            SetupOutcome::Failed(format!("all {failures} reward creations failed"))
        } else {
            SetupOutcome::Ready
        }
    }

    async fn unload(&self, ctx: &Arc<BotContext>) -> SetupOutcome {
        let ids: Vec<String> = match self.created_ids.lock() {
            Ok(mut guard) => guard.drain(..).collect(),
            Err(_) => return SetupOutcome::Failed("created-ids lock poisoned".into()),
        };
        if ids.is_empty() {
            return SetupOutcome::Skipped;
        }

        let mut failures = 0usize;
        for id in &ids {
            if let Err(e) = ctx.api.delete_custom_reward(id).await {
                warn!("could not delete reward {}: {:?}", id, e);
                failures += 1;
            }
        }
        if failures > 0 {
            SetupOutcome::Failed(format!("{failures} of {} reward deletions failed", ids.len()))
        } else {
            SetupOutcome::Ready
        }
    }
}
