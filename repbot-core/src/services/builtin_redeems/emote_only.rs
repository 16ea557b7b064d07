use async_trait::async_trait;
use tokio::time::{Duration, sleep};
use tracing::{error, info};

use repbot_common::Error;
use repbot_common::models::Redemption;

use crate::services::command_service::Trigger;
use crate::services::redeem_service::{RedeemContext, RedeemHandler};

/// "Emote-Only Chat": turns emote-only mode on for the configured number
/// of minutes, then turns it off and fulfils the redemption. The
/// redemption stays pending while the timer runs.
///
/// If emote-only is already active the redemption is cancelled with an
/// apology and nothing is toggled.
pub struct EmoteOnlyRedeem {
    trigger: Trigger,
}

impl EmoteOnlyRedeem {
    pub fn new() -> Result<Self, Error> {
        Ok(Self {
            trigger: Trigger::exact("Emote-Only Chat")?,
        })
    }
}

#[async_trait]
impl RedeemHandler for EmoteOnlyRedeem {
    fn id(&self) -> &str {
        "emote_only"
    }

    fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    async fn execute(&self, redemption: &Redemption, rctx: &RedeemContext) -> Result<(), Error> {
        let settings = rctx.ctx.api.get_chat_settings().await?;
        if settings.emote_mode {
            rctx.cancel(redemption).await?;
            return rctx
                .ctx
                .api
                .send_chat_message(
                    &format!(
                        "Sorry {}, emote-only is already on. Points refunded!",
                        redemption.user_name
                    ),
                    None,
                )
                .await;
        }

        let minutes = rctx.ctx.config.timers.emote_only_minutes;
        rctx.ctx.api.set_emote_only(true).await?;
        rctx.ctx
            .api
            .send_chat_message(
                &format!(
                    "Emote-only chat for {minutes} minutes, courtesy of {}!",
                    redemption.user_name
                ),
                None,
            )
            .await?;

        // Delayed resolution: the redemption is fulfilled only once the
        // timer has restored normal chat.
        let rctx = rctx.clone();
        let redemption = redemption.clone();
        tokio::spawn(async move {
            sleep(Duration::from_secs(minutes * 60)).await;
            if let Err(e) = rctx.ctx.api.set_emote_only(false).await {
                error!("failed to restore chat after emote-only timer: {:?}", e);
            }
            if let Err(e) = rctx
                .ctx
                .api
                .send_chat_message("Emote-only is over, chat away!", None)
                .await
            {
                error!("failed to announce emote-only end: {:?}", e);
            }
            match rctx.fulfil(&redemption).await {
                Ok(()) => info!("emote-only redemption {} fulfilled", redemption.id),
                Err(e) => error!("failed to fulfil emote-only redemption: {:?}", e),
            }
        });

        Ok(())
    }
}
