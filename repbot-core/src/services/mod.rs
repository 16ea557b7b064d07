// File: repbot-core/src/services/mod.rs
pub mod builtin_commands;
pub mod builtin_redeems;
pub mod command_service;
pub mod context;
pub mod counters;
pub mod dispatch;
pub mod event_handlers;
pub mod event_service;
pub mod redeem_service;

pub use command_service::{CommandHandler, CommandService, Trigger};
pub use context::BotContext;
pub use dispatch::Dispatcher;
pub use event_service::{
    BroadcastIdentity, EventDescriptor, EventHandler, EventRegistry, SetupOutcome,
};
pub use redeem_service::{RedeemContext, RedeemHandler, RedeemService};
