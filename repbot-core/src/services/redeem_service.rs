use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use repbot_common::Error;
use repbot_common::models::{Redemption, RewardInfo};

use crate::platforms::twitch_eventsub::events::ChannelPointsRedemptionAdd;
use crate::services::command_service::Trigger;
use crate::services::context::BotContext;

/// Handed to redeem bodies: the shared context plus the two terminal
/// actions. Exactly one terminal action is expected per redemption;
/// calling both, or one twice, is a caller bug this layer does not guard.
#[derive(Clone)]
pub struct RedeemContext {
    pub ctx: Arc<BotContext>,
    pending: Arc<DashMap<String, String>>,
}

impl RedeemContext {
    /// Accept the redemption (points are kept).
    pub async fn fulfil(&self, redemption: &Redemption) -> Result<(), Error> {
        self.pending.remove(&redemption.id);
        self.ctx
            .api
            .update_redemption_status(&redemption.reward.id, &redemption.id, "FULFILLED")
            .await
    }

    /// Decline the redemption (points return to the redeemer).
    pub async fn cancel(&self, redemption: &Redemption) -> Result<(), Error> {
        self.pending.remove(&redemption.id);
        self.ctx
            .api
            .update_redemption_status(&redemption.reward.id, &redemption.id, "CANCELED")
            .await
    }
}

/// A channel-point redeem. The trigger is matched against the reward
/// *title* (or, for dynamic triggers, the whole redemption).
#[async_trait]
pub trait RedeemHandler: Send + Sync {
    fn id(&self) -> &str;

    fn trigger(&self) -> &Trigger;

    /// Consulted only for [`Trigger::Dynamic`].
    async fn matches(&self, _redemption: &Redemption) -> Result<bool, Error> {
        Ok(false)
    }

    async fn execute(&self, redemption: &Redemption, rctx: &RedeemContext) -> Result<(), Error>;
}

/// Registry for redemption triggers; a specialization of event dispatch
/// keyed on reward titles instead of event names.
pub struct RedeemService {
    handlers: Vec<Arc<dyn RedeemHandler>>,
    /// Redemptions a body has not resolved yet, id => reward title. Kept
    /// for observability, not idempotence.
    pending: Arc<DashMap<String, String>>,
    ctx: Arc<BotContext>,
}

impl RedeemService {
    pub fn new(ctx: Arc<BotContext>) -> Self {
        Self {
            handlers: Vec::new(),
            pending: Arc::new(DashMap::new()),
            ctx,
        }
    }

    pub fn register(&mut self, handler: Arc<dyn RedeemHandler>) {
        debug!("registering redeem handler '{}'", handler.id());
        self.handlers.push(handler);
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Called for every incoming redemption-add notification. Matching
    /// bodies are spawned independently, like command dispatch. A
    /// redemption no handler matches is left to the platform queue.
    pub async fn handle_incoming_redeem(
        &self,
        evt: &ChannelPointsRedemptionAdd,
    ) -> Vec<JoinHandle<()>> {
        let redemption = to_redemption(evt);

        let mut spawned = Vec::new();
        for handler in &self.handlers {
            let matched = match handler.trigger() {
                Trigger::Exact(re) => re.is_match(&redemption.reward.title),
                Trigger::Dynamic => match handler.matches(&redemption).await {
                    Ok(m) => m,
                    Err(e) => {
                        warn!(
                            "redeem trigger of '{}' errored, skipping: {:?}",
                            handler.id(),
                            e
                        );
                        false
                    }
                },
            };
            if !matched {
                continue;
            }

            debug!(
                "redeem '{}' matched reward '{}' for {}",
                handler.id(),
                redemption.reward.title,
                redemption.user_login
            );
            self.pending
                .insert(redemption.id.clone(), redemption.reward.title.clone());

            let handler = handler.clone();
            let redemption = redemption.clone();
            let rctx = RedeemContext {
                ctx: self.ctx.clone(),
                pending: self.pending.clone(),
            };
            spawned.push(tokio::spawn(async move {
                if let Err(e) = handler.execute(&redemption, &rctx).await {
                    error!("redeem '{}' failed: {:?}", handler.id(), e);
                }
            }));
        }
        spawned
    }

    /// Shutdown hygiene: a body that never called its terminal action
    /// leaves the redemption pending forever; at least say so.
    pub fn log_pending(&self) {
        for entry in self.pending.iter() {
            warn!(
                "redemption {} ('{}') still unresolved at shutdown",
                entry.key(),
                entry.value()
            );
        }
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

fn to_redemption(evt: &ChannelPointsRedemptionAdd) -> Redemption {
    Redemption {
        id: evt.id.clone(),
        broadcaster_id: evt.broadcaster_user_id.clone(),
        user_id: evt.user_id.clone(),
        user_login: evt.user_login.clone(),
        user_name: evt.user_name.clone(),
        user_input: evt.user_input.clone(),
        status: evt.status.clone(),
        redeemed_at: evt.redeemed_at.to_rfc3339(),
        reward: RewardInfo {
            id: evt.reward.id.clone(),
            title: evt.reward.title.clone(),
            prompt: evt.reward.prompt.clone(),
            cost: evt.reward.cost,
        },
    }
}
