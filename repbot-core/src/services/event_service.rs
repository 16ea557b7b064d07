use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use repbot_common::Error;

use crate::eventbus::BotEvent;
use crate::services::context::BotContext;

/// Default priority for handlers that do not declare one (platform-event
/// handlers). Lifecycle handlers usually sit below this to run first.
pub const DEFAULT_PRIORITY: i32 = 100;

/// Identities descriptors may need: EventSub conditions are keyed by the
/// broadcaster's user id, moderator-scoped ones by the bot's.
#[derive(Debug, Clone)]
pub struct BroadcastIdentity {
    pub broadcaster_user_id: String,
    pub bot_user_id: String,
}

/// What a handler listens to. Computed once per handler at registration,
/// with the identities in hand.
#[derive(Debug, Clone)]
pub enum EventDescriptor {
    /// Run `setup` during the ordered boot sequence.
    Startup { priority: i32 },
    /// Run `unload` during the ordered shutdown sequence.
    Shutdown { priority: i32 },
    /// Receive `execute` for one named EventSub event. `condition` is the
    /// subscription condition sent to Helix verbatim.
    Platform {
        event_type: String,
        version: String,
        condition: serde_json::Value,
    },
}

impl EventDescriptor {
    pub fn priority(&self) -> i32 {
        match self {
            EventDescriptor::Startup { priority } | EventDescriptor::Shutdown { priority } => {
                *priority
            }
            EventDescriptor::Platform { .. } => DEFAULT_PRIORITY,
        }
    }
}

/// Three-way setup/unload result. `Failed` is surfaced but never aborts
/// the remaining sequence; `Skipped` covers inapplicability that must not
/// produce a user-visible error (e.g. an integration that is simply not
/// configured).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupOutcome {
    Ready,
    Failed(String),
    Skipped,
}

/// A lifecycle or platform-event handler. Long-lived, owned by the
/// registry; `setup`/`unload` default to `Ready` and `execute` to a no-op
/// so each handler only implements the parts its descriptor makes
/// reachable.
#[async_trait]
pub trait EventHandler: Send + Sync {
    fn id(&self) -> &str;

    fn descriptor(&self, identity: &BroadcastIdentity) -> EventDescriptor;

    async fn setup(&self, _ctx: &Arc<BotContext>) -> SetupOutcome {
        SetupOutcome::Ready
    }

    async fn unload(&self, _ctx: &Arc<BotContext>) -> SetupOutcome {
        SetupOutcome::Ready
    }

    async fn execute(&self, _event: &BotEvent, _ctx: &Arc<BotContext>) -> Result<(), Error> {
        Ok(())
    }
}

struct RegisteredHandler {
    handler: Arc<dyn EventHandler>,
    descriptor: EventDescriptor,
}

/// Holds every loaded event handler with its pre-computed descriptor.
pub struct EventRegistry {
    handlers: Vec<RegisteredHandler>,
    ctx: Arc<BotContext>,
}

impl EventRegistry {
    pub fn new(ctx: Arc<BotContext>) -> Self {
        Self {
            handlers: Vec::new(),
            ctx,
        }
    }

    pub fn register(&mut self, handler: Arc<dyn EventHandler>, identity: &BroadcastIdentity) {
        let descriptor = handler.descriptor(identity);
        debug!(
            "registering event handler '{}' => {:?}",
            handler.id(),
            descriptor
        );
        self.handlers.push(RegisteredHandler {
            handler,
            descriptor,
        });
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Ordered boot: every handler's `setup`, ascending priority, each
    /// awaited to completion before the next begins. Failures are
    /// reported and skipped handlers stay silent; neither stops the
    /// sequence.
    pub async fn run_setup(&self) {
        for reg in self.ordered() {
            match reg.handler.setup(&self.ctx).await {
                SetupOutcome::Ready => {
                    debug!("setup '{}' ok", reg.handler.id());
                }
                SetupOutcome::Failed(reason) => {
                    warn!("setup '{}' failed (continuing): {}", reg.handler.id(), reason);
                }
                SetupOutcome::Skipped => {
                    debug!("setup '{}' skipped", reg.handler.id());
                }
            }
        }
        info!("boot sequence finished ({} handlers)", self.handlers.len());
    }

    /// Ordered shutdown: every handler's `unload`, same priority
    /// discipline as boot.
    pub async fn run_unload(&self) {
        for reg in self.ordered() {
            match reg.handler.unload(&self.ctx).await {
                SetupOutcome::Ready => {
                    debug!("unload '{}' ok", reg.handler.id());
                }
                SetupOutcome::Failed(reason) => {
                    warn!("unload '{}' failed: {}", reg.handler.id(), reason);
                }
                SetupOutcome::Skipped => {
                    debug!("unload '{}' skipped", reg.handler.id());
                }
            }
        }
    }

    /// The EventSub subscriptions platform handlers asked for, deduped by
    /// event type (two handlers on the same event share one
    /// subscription).
    pub fn subscriptions(&self) -> Vec<(String, String, serde_json::Value)> {
        let mut out: Vec<(String, String, serde_json::Value)> = Vec::new();
        for reg in &self.handlers {
            if let EventDescriptor::Platform {
                event_type,
                version,
                condition,
            } = &reg.descriptor
            {
                if out.iter().any(|(t, _, _)| t == event_type) {
                    continue;
                }
                out.push((event_type.clone(), version.clone(), condition.clone()));
            }
        }
        out
    }

    /// Fan one platform event out to every subscribed handler. Bodies are
    /// spawned in registration order and run independently; there is no
    /// completion-order guarantee and an error in one is contained.
    pub fn dispatch(&self, event: &BotEvent) -> Vec<JoinHandle<()>> {
        let BotEvent::Twitch(twitch_event) = event else {
            return Vec::new();
        };
        let event_type = twitch_event.event_type();

        let mut spawned = Vec::new();
        for reg in &self.handlers {
            let subscribed = matches!(
                &reg.descriptor,
                EventDescriptor::Platform { event_type: t, .. } if t == event_type
            );
            if !subscribed {
                continue;
            }

            let handler = reg.handler.clone();
            let event = event.clone();
            let ctx = self.ctx.clone();
            spawned.push(tokio::spawn(async move {
                if let Err(e) = handler.execute(&event, &ctx).await {
                    error!("event handler '{}' failed: {:?}", handler.id(), e);
                }
            }));
        }
        spawned
    }

    /// Ascending priority; stable, so equal priorities keep registration
    /// order.
    fn ordered(&self) -> Vec<&RegisteredHandler> {
        let mut ordered: Vec<&RegisteredHandler> = self.handlers.iter().collect();
        ordered.sort_by_key(|r| r.descriptor.priority());
        ordered
    }
}
