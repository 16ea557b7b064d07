use async_trait::async_trait;
use tracing::warn;

use repbot_common::Error;
use repbot_common::models::Redemption;

use crate::services::command_service::Trigger;
use crate::services::redeem_service::{RedeemContext, RedeemHandler};

/// "Timeout Me": the redeemer buys themselves a timeout of the configured
/// length. A failed moderation call refunds the points.
pub struct TimeoutRedeem {
    trigger: Trigger,
}

impl TimeoutRedeem {
    pub fn new() -> Result<Self, Error> {
        Ok(Self {
            trigger: Trigger::exact("Timeout Me")?,
        })
    }
}

#[async_trait]
impl RedeemHandler for TimeoutRedeem {
    fn id(&self) -> &str {
        "timeout_me"
    }

    fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    async fn execute(&self, redemption: &Redemption, rctx: &RedeemContext) -> Result<(), Error> {
        let secs = rctx.ctx.config.timers.timeout_seconds;
        match rctx
            .ctx
            .api
            .timeout_user(&redemption.user_id, secs, "Redeemed a timeout")
            .await
        {
            Ok(()) => {
                rctx.ctx
                    .api
                    .send_chat_message(
                        &format!("See you in {secs} seconds, {}!", redemption.user_name),
                        None,
                    )
                    .await?;
                rctx.fulfil(redemption).await
            }
            Err(e) => {
                warn!("timeout redemption failed, refunding: {:?}", e);
                rctx.cancel(redemption).await?;
                rctx.ctx
                    .api
                    .send_chat_message(
                        &format!(
                            "Couldn't time you out, {}. Points refunded!",
                            redemption.user_name
                        ),
                        None,
                    )
                    .await
            }
        }
    }
}
