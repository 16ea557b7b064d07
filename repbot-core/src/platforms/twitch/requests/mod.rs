// File: repbot-core/src/platforms/twitch/requests/mod.rs
pub mod channel_points;
pub mod chat;
pub mod moderation;
pub mod stream;
