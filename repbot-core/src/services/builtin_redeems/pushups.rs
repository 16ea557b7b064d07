use async_trait::async_trait;
use regex::Regex;

use repbot_common::Error;
use repbot_common::models::Redemption;

use crate::services::command_service::Trigger;
use crate::services::redeem_service::{RedeemContext, RedeemHandler};

/// Any reward titled "+N Pushups" adds N to the standalone counter. A
/// dynamic trigger, because the increment is parsed out of the title
/// itself and the channel may carry several tiers of this reward.
pub struct PushupRedeem {
    trigger: Trigger,
    title_re: Regex,
}

impl PushupRedeem {
    pub fn new() -> Result<Self, Error> {
        let title_re = Regex::new(r"^\+(\d+) Pushups$")
            .map_err(|e| Error::Parse(format!("bad pushup reward pattern: {e}")))?;
        Ok(Self {
            trigger: Trigger::Dynamic,
            title_re,
        })
    }

    fn increment_of(&self, title: &str) -> Option<i64> {
        self.title_re
            .captures(title)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<i64>().ok())
    }
}

#[async_trait]
impl RedeemHandler for PushupRedeem {
    fn id(&self) -> &str {
        "pushup_reward"
    }

    fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    async fn matches(&self, redemption: &Redemption) -> Result<bool, Error> {
        Ok(self.increment_of(&redemption.reward.title).is_some())
    }

    async fn execute(&self, redemption: &Redemption, rctx: &RedeemContext) -> Result<(), Error> {
        let Some(n) = self.increment_of(&redemption.reward.title) else {
            // Dispatch only calls us after `matches`, so this is dead in
            // practice; cancel rather than eat the points if it happens.
            return rctx.cancel(redemption).await;
        };
        let total = rctx.ctx.pushups.add(n);
        rctx.ctx
            .api
            .send_chat_message(
                &format!(
                    "{} added {n} pushups! {total} on the board.",
                    redemption.user_name
                ),
                None,
            )
            .await?;
        rctx.fulfil(redemption).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increment_parses_from_title() {
        let redeem = PushupRedeem::new().unwrap();
        assert_eq!(redeem.increment_of("+10 Pushups"), Some(10));
        assert_eq!(redeem.increment_of("+5 Pushups"), Some(5));
        assert_eq!(redeem.increment_of("Pushups"), None);
        assert_eq!(redeem.increment_of("+10 pushups"), None); // case-sensitive
        assert_eq!(redeem.increment_of("Do +10 Pushups"), None); // anchored
    }
}
