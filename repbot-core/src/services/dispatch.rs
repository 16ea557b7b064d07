use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

use crate::eventbus::{BotEvent, TwitchEvent};
use crate::services::command_service::CommandService;
use crate::services::event_service::EventRegistry;
use crate::services::redeem_service::RedeemService;

/// Owns the three registries and drains the event bus: chat messages go
/// to the command registry, redemption-adds to the redemption registry
/// (and any event handlers listening on the same event), everything else
/// to the event registry.
pub struct Dispatcher {
    pub commands: CommandService,
    pub events: EventRegistry,
    pub redeems: RedeemService,
}

impl Dispatcher {
    pub fn new(commands: CommandService, events: EventRegistry, redeems: RedeemService) -> Self {
        Self {
            commands,
            events,
            redeems,
        }
    }

    /// The ordered boot sequence.
    pub async fn startup(&self) {
        self.events.run_setup().await;
    }

    /// The ordered shutdown sequence, then pending-redemption hygiene.
    pub async fn shutdown(&self) {
        self.events.run_unload().await;
        self.redeems.log_pending();
    }

    /// Drain the bus until shutdown is signalled or the bus closes.
    pub async fn run(
        &self,
        mut rx: mpsc::Receiver<BotEvent>,
        mut shutdown_rx: watch::Receiver<bool>,
    ) {
        info!("dispatch loop started");
        loop {
            tokio::select! {
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
                maybe_event = rx.recv() => {
                    let Some(event) = maybe_event else { break };
                    self.handle_event(&event).await;
                }
            }
        }
        info!("dispatch loop stopped");
    }

    /// Route one event. Spawned handler bodies are detached here; tests
    /// drive the registries directly when they need to await completion.
    pub async fn handle_event(&self, event: &BotEvent) {
        match event {
            BotEvent::ChatMessage(msg) => {
                let _ = self.commands.handle_chat_message(msg).await;
            }
            BotEvent::Twitch(TwitchEvent::RedemptionAdd(evt)) => {
                let _ = self.redeems.handle_incoming_redeem(evt).await;
                let _ = self.events.dispatch(event);
            }
            BotEvent::Twitch(_) => {
                let _ = self.events.dispatch(event);
            }
            BotEvent::SystemMessage(text) => {
                debug!("system message: {}", text);
            }
            BotEvent::Tick => {}
        }
    }
}
