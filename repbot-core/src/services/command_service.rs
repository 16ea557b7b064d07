use std::sync::Arc;

use async_trait::async_trait;
use regex::Regex;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use repbot_common::Error;
use repbot_common::models::ChatMessage;

use crate::services::context::BotContext;

/// How a handler decides whether it should run.
#[derive(Debug, Clone)]
pub enum Trigger {
    /// Anchored, case-sensitive pattern over the whole relevant text.
    Exact(Regex),
    /// The handler's async `matches` predicate decides.
    Dynamic,
}

impl Trigger {
    /// Compile `pattern` anchored at both ends. Whole-text matching is
    /// what keeps overlapping prefixes apart: `!tower` must never fire
    /// for `!thetower`.
    pub fn exact(pattern: &str) -> Result<Trigger, Error> {
        let anchored = format!("^(?:{pattern})$");
        let re = Regex::new(&anchored)
            .map_err(|e| Error::Parse(format!("bad trigger pattern '{pattern}': {e}")))?;
        Ok(Trigger::Exact(re))
    }
}

/// A chat command. Long-lived: created at load time, owned by the
/// registry for the process lifetime. Handlers may carry their own
/// internal state (atomics) across invocations.
///
/// Permission gating happens inside `execute`, never in the registry;
/// a body that fails its check silently returns.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    fn id(&self) -> &str;

    fn trigger(&self) -> &Trigger;

    /// Consulted only for [`Trigger::Dynamic`].
    async fn matches(&self, _msg: &ChatMessage) -> Result<bool, Error> {
        Ok(false)
    }

    async fn execute(&self, msg: &ChatMessage, ctx: &Arc<BotContext>) -> Result<(), Error>;
}

/// Holds every loaded command handler and runs the dispatch pass for each
/// incoming chat message.
pub struct CommandService {
    handlers: Vec<Arc<dyn CommandHandler>>,
    ctx: Arc<BotContext>,
}

impl CommandService {
    pub fn new(ctx: Arc<BotContext>) -> Self {
        Self {
            handlers: Vec::new(),
            ctx,
        }
    }

    pub fn register(&mut self, handler: Arc<dyn CommandHandler>) {
        debug!("registering command handler '{}'", handler.id());
        self.handlers.push(handler);
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// One dispatch pass: evaluate every trigger in registration order and
    /// spawn each matching body as its own task. Bodies run independently
    /// of one another; an error in one is logged and contained. A trigger
    /// predicate that errors skips that handler for this message only.
    ///
    /// Returns the spawned handles; normal callers drop them, tests await
    /// them.
    pub async fn handle_chat_message(&self, msg: &ChatMessage) -> Vec<JoinHandle<()>> {
        let mut spawned = Vec::new();
        for handler in &self.handlers {
            let matched = match handler.trigger() {
                Trigger::Exact(re) => re.is_match(&msg.text),
                Trigger::Dynamic => match handler.matches(msg).await {
                    Ok(m) => m,
                    Err(e) => {
                        warn!(
                            "trigger predicate of '{}' errored, skipping for this message: {:?}",
                            handler.id(),
                            e
                        );
                        false
                    }
                },
            };
            if !matched {
                continue;
            }

            debug!("command '{}' matched message '{}'", handler.id(), msg.text);
            let handler = handler.clone();
            let msg = msg.clone();
            let ctx = self.ctx.clone();
            spawned.push(tokio::spawn(async move {
                if let Err(e) = handler.execute(&msg, &ctx).await {
                    error!("command '{}' failed: {:?}", handler.id(), e);
                }
            }));
        }
        spawned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_trigger_is_anchored() {
        let t = Trigger::exact("!tower").unwrap();
        let Trigger::Exact(re) = &t else {
            panic!("expected exact trigger")
        };
        assert!(re.is_match("!tower"));
        assert!(!re.is_match("!thetower"));
        assert!(!re.is_match("!tower extra"));
        assert!(!re.is_match("say !tower"));
    }

    #[test]
    fn exact_trigger_is_case_sensitive() {
        let t = Trigger::exact("!so (\\w+)").unwrap();
        let Trigger::Exact(re) = &t else {
            panic!("expected exact trigger")
        };
        assert!(re.is_match("!so someuser"));
        assert!(!re.is_match("!SO someuser"));
    }

    #[test]
    fn bad_pattern_is_a_parse_error() {
        assert!(Trigger::exact("(unclosed").is_err());
    }
}
