use async_trait::async_trait;
use tracing::warn;

use repbot_common::Error;
use repbot_common::models::Redemption;

use crate::services::command_service::Trigger;
use crate::services::redeem_service::{RedeemContext, RedeemHandler};

/// "VIP Me": grant the redeemer the VIP badge. Fails (with a refund) if
/// the channel is out of VIP slots or the user is already one.
pub struct VipRedeem {
    trigger: Trigger,
}

impl VipRedeem {
    pub fn new() -> Result<Self, Error> {
        Ok(Self {
            trigger: Trigger::exact("VIP Me")?,
        })
    }
}

#[async_trait]
impl RedeemHandler for VipRedeem {
    fn id(&self) -> &str {
        "vip_me"
    }

    fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    async fn execute(&self, redemption: &Redemption, rctx: &RedeemContext) -> Result<(), Error> {
        match rctx.ctx.api.add_vip(&redemption.user_id).await {
            Ok(()) => {
                rctx.ctx
                    .api
                    .send_chat_message(
                        &format!("Welcome to the VIP lounge, {}!", redemption.user_name),
                        None,
                    )
                    .await?;
                rctx.fulfil(redemption).await
            }
            Err(e) => {
                warn!("vip redemption failed, refunding: {:?}", e);
                rctx.cancel(redemption).await?;
                rctx.ctx
                    .api
                    .send_chat_message(
                        &format!(
                            "Couldn't make you a VIP, {}. Points refunded!",
                            redemption.user_name
                        ),
                        None,
                    )
                    .await
            }
        }
    }
}
