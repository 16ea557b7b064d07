use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

use repbot_common::config::BotConfig;
use repbot_core::eventbus::EventBus;
use repbot_core::platforms::twitch::TwitchHelixClient;
use repbot_core::platforms::twitch_eventsub::TwitchEventSubPlatform;
use repbot_core::services::builtin_commands::register_builtin_commands;
use repbot_core::services::builtin_redeems::register_builtin_redeems;
use repbot_core::services::event_handlers::register_builtin_events;
use repbot_core::services::{
    BotContext, BroadcastIdentity, CommandService, Dispatcher, EventRegistry, RedeemService,
};

#[derive(Parser, Debug, Clone)]
#[command(name = "repbot")]
#[command(author, version, about = "repbot - a single-channel Twitch chat bot")]
struct Args {
    /// Path to the bot configuration file
    #[arg(long, default_value = "repbot.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Arc::new(
        BotConfig::load(&args.config)
            .with_context(|| format!("loading config from {}", args.config.display()))?,
    );

    let access_token =
        std::env::var("TWITCH_ACCESS_TOKEN").context("TWITCH_ACCESS_TOKEN must be set")?;
    let client_id = std::env::var("TWITCH_CLIENT_ID").context("TWITCH_CLIENT_ID must be set")?;

    let api = Arc::new(TwitchHelixClient::new(
        &access_token,
        &client_id,
        &config.channel.broadcaster_id,
        &config.channel.bot_user_id,
    ));
    let ctx = Arc::new(BotContext::new(config.clone(), api));

    let identity = BroadcastIdentity {
        broadcaster_user_id: config.channel.broadcaster_id.clone(),
        bot_user_id: config.channel.bot_user_id.clone(),
    };

    let mut commands = CommandService::new(ctx.clone());
    register_builtin_commands(&mut commands).context("registering commands")?;

    let mut events = EventRegistry::new(ctx.clone());
    register_builtin_events(&mut events, &identity);

    let mut redeems = RedeemService::new(ctx.clone());
    register_builtin_redeems(&mut redeems).context("registering redeems")?;

    info!(
        "registered {} commands, {} event handlers, {} redeems",
        commands.handler_count(),
        events.handler_count(),
        redeems.handler_count()
    );

    let subscriptions = events.subscriptions();
    let dispatcher = Arc::new(Dispatcher::new(commands, events, redeems));

    // Ordered boot sequence before any event can arrive.
    dispatcher.startup().await;

    let event_bus = Arc::new(EventBus::new());
    let dispatch_rx = event_bus.subscribe(None).await;

    let eventsub = TwitchEventSubPlatform::new(
        &access_token,
        &client_id,
        &config.channel.broadcaster_id,
        &config.channel.bot_user_id,
        event_bus.clone(),
        subscriptions,
    );
    let eventsub_handle = tokio::spawn(async move {
        if let Err(e) = eventsub.start_loop().await {
            error!("eventsub loop ended with error: {:?}", e);
        }
    });

    let dispatch_handle = {
        let dispatcher = dispatcher.clone();
        let shutdown_rx = event_bus.shutdown_rx.clone();
        tokio::spawn(async move {
            dispatcher.run(dispatch_rx, shutdown_rx).await;
        })
    };

    tokio::signal::ctrl_c()
        .await
        .context("waiting for ctrl-c")?;
    info!("ctrl-c received, shutting down");

    event_bus.shutdown();
    let _ = dispatch_handle.await;
    eventsub_handle.abort();

    // Ordered shutdown sequence (reward cleanup, spotify pause, ...).
    dispatcher.shutdown().await;

    info!("bye");
    Ok(())
}
