// File: repbot-core/src/services/builtin_redeems/mod.rs
//! Built-in channel-point redeems, one per file.

pub mod emote_only;
pub mod pushups;
pub mod song_skip;
pub mod timeout;
pub mod vip;

use std::sync::Arc;

use repbot_common::Error;

use crate::services::redeem_service::RedeemService;

pub fn register_builtin_redeems(service: &mut RedeemService) -> Result<(), Error> {
    service.register(Arc::new(emote_only::EmoteOnlyRedeem::new()?));
    service.register(Arc::new(pushups::PushupRedeem::new()?));
    service.register(Arc::new(timeout::TimeoutRedeem::new()?));
    service.register(Arc::new(song_skip::SkipSongRedeem::new()?));
    service.register(Arc::new(vip::VipRedeem::new()?));
    Ok(())
}
