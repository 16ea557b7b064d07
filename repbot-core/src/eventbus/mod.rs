//! src/eventbus/mod.rs
//!
//! In-process event bus with guaranteed delivery to multiple subscribers
//! via bounded MPSC queues. The EventSub runtime publishes here; the
//! dispatch loop and anything else interested subscribes.

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc, watch};

use repbot_common::models::ChatMessage;

use crate::platforms::twitch_eventsub::events::{
    ChannelFollow, ChannelPointsRedemptionAdd, ChannelRaid, ChannelSubscribe, StreamOffline,
    StreamOnline,
};

/// Everything the bot can publish or subscribe to.
#[derive(Debug, Clone)]
pub enum BotEvent {
    /// A chat message, already normalized from the EventSub payload.
    ChatMessage(ChatMessage),

    /// A typed Twitch EventSub notification.
    Twitch(TwitchEvent),

    /// System-wide message for debugging or administration.
    SystemMessage(String),

    /// Periodic heartbeat.
    Tick,
}

/// The EventSub notifications this bot subscribes to. One variant per
/// subscription type; payload structs live in `twitch_eventsub::events`.
#[derive(Debug, Clone)]
pub enum TwitchEvent {
    StreamOnline(StreamOnline),
    StreamOffline(StreamOffline),
    ChannelFollow(ChannelFollow),
    ChannelRaid(ChannelRaid),
    ChannelSubscribe(ChannelSubscribe),
    RedemptionAdd(ChannelPointsRedemptionAdd),
}

impl TwitchEvent {
    /// The EventSub subscription type string for this event.
    pub fn event_type(&self) -> &'static str {
        match self {
            TwitchEvent::StreamOnline(_) => "stream.online",
            TwitchEvent::StreamOffline(_) => "stream.offline",
            TwitchEvent::ChannelFollow(_) => "channel.follow",
            TwitchEvent::ChannelRaid(_) => "channel.raid",
            TwitchEvent::ChannelSubscribe(_) => "channel.subscribe",
            TwitchEvent::RedemptionAdd(_) => {
                "channel.channel_points_custom_reward_redemption.add"
            }
        }
    }
}

/// Each subscriber gets its own `mpsc::Sender<BotEvent>` for guaranteed
/// delivery.
///
/// - If a subscriber's buffer fills, `publish` awaits until there is
///   space (backpressure).
/// - If a subscriber dropped its `Receiver`, the send error is ignored.
#[derive(Clone)]
pub struct EventBus {
    subscribers: Arc<Mutex<Vec<mpsc::Sender<BotEvent>>>>,
    shutdown_tx: watch::Sender<bool>,
    pub shutdown_rx: watch::Receiver<bool>,
}

const DEFAULT_BUFFER_SIZE: usize = 10000;

impl EventBus {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            subscribers: Arc::new(Mutex::new(vec![])),
            shutdown_tx: tx,
            shutdown_rx: rx,
        }
    }

    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    pub fn is_shutdown(&self) -> bool {
        *self.shutdown_rx.borrow()
    }

    /// Returns a receiver on which events will be delivered.
    pub async fn subscribe(&self, buffer_size: Option<usize>) -> mpsc::Receiver<BotEvent> {
        let size = buffer_size.unwrap_or(DEFAULT_BUFFER_SIZE);
        let (tx, rx) = mpsc::channel(size);
        let mut subs = self.subscribers.lock().await;
        subs.push(tx);
        rx
    }

    /// Publish an event to all subscribers.
    pub async fn publish(&self, event: BotEvent) {
        let senders = {
            let subs = self.subscribers.lock().await;
            subs.clone()
        };
        for s in senders {
            let _ = s.send(event.clone()).await;
        }
    }

    /// Convenience: publish a normalized chat message.
    pub async fn publish_chat(&self, msg: ChatMessage) {
        self.publish(BotEvent::ChatMessage(msg)).await;
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{Duration, sleep, timeout};

    #[tokio::test]
    async fn test_subscribers_receive_events() {
        let bus = EventBus::new();

        let mut rx1 = bus.subscribe(Some(5)).await;
        let mut rx2 = bus.subscribe(Some(5)).await;

        bus.publish(BotEvent::Tick).await;

        let evt1 = rx1.recv().await.expect("rx1 should get event");
        let evt2 = rx2.recv().await.expect("rx2 should get event");

        assert!(matches!(evt1, BotEvent::Tick));
        assert!(matches!(evt2, BotEvent::Tick));
    }

    #[tokio::test]
    async fn test_backpressure_blocking() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe(Some(1)).await; // queue size = 1

        bus.publish(BotEvent::SystemMessage("msg1".into())).await;

        // Read both messages after a short delay so the second publish has
        // to wait for space.
        let handle = tokio::spawn(async move {
            sleep(Duration::from_millis(50)).await;
            let first = rx.recv().await.expect("expected first message");
            let second = rx.recv().await.expect("expected second message");
            (first, second)
        });

        let second_publish = bus.publish(BotEvent::SystemMessage("msg2".into()));
        let result = timeout(Duration::from_millis(500), second_publish).await;
        assert!(result.is_ok(), "publish should eventually unblock");

        let (evt1, evt2) = handle.await.unwrap();
        match evt1 {
            BotEvent::SystemMessage(txt) => assert_eq!(txt, "msg1"),
            _ => panic!("first message mismatch"),
        }
        match evt2 {
            BotEvent::SystemMessage(txt) => assert_eq!(txt, "msg2"),
            _ => panic!("second message mismatch"),
        }
    }
}
