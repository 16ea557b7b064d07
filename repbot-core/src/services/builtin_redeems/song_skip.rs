use async_trait::async_trait;
use tracing::warn;

use repbot_common::Error;
use repbot_common::models::Redemption;

use crate::services::command_service::Trigger;
use crate::services::redeem_service::{RedeemContext, RedeemHandler};

/// "Skip Song": skip the current Spotify track. If Spotify never came up
/// (or the skip fails) the points go back.
pub struct SkipSongRedeem {
    trigger: Trigger,
}

impl SkipSongRedeem {
    pub fn new() -> Result<Self, Error> {
        Ok(Self {
            trigger: Trigger::exact("Skip Song")?,
        })
    }
}

#[async_trait]
impl RedeemHandler for SkipSongRedeem {
    fn id(&self) -> &str {
        "skip_song"
    }

    fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    async fn execute(&self, redemption: &Redemption, rctx: &RedeemContext) -> Result<(), Error> {
        let guard = rctx.ctx.spotify.read().await;
        let Some(spotify) = guard.as_ref() else {
            rctx.cancel(redemption).await?;
            return rctx
                .ctx
                .api
                .send_chat_message(
                    &format!(
                        "Spotify isn't hooked up right now, sorry {}! Points refunded.",
                        redemption.user_name
                    ),
                    None,
                )
                .await;
        };

        match spotify.skip_track().await {
            Ok(()) => {
                rctx.ctx.api.send_chat_message("Track skipped!", None).await?;
                rctx.fulfil(redemption).await
            }
            Err(e) => {
                warn!("skip-song redemption failed, refunding: {:?}", e);
                rctx.cancel(redemption).await?;
                rctx.ctx
                    .api
                    .send_chat_message(
                        &format!(
                            "Couldn't skip that one, {}. Points refunded!",
                            redemption.user_name
                        ),
                        None,
                    )
                    .await
            }
        }
    }
}
