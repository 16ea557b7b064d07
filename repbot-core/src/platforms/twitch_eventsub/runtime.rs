// File: repbot-core/src/platforms/twitch_eventsub/runtime.rs

use std::sync::Arc;

use futures_util::StreamExt;
use reqwest::Client as ReqwestClient;
use serde_json::json;
use tokio::net::TcpStream;
use tokio::time::{Duration, sleep};
use tokio_tungstenite::tungstenite::protocol::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, error, info, trace, warn};

use repbot_common::Error;

use crate::eventbus::EventBus;
use crate::platforms::twitch_eventsub::events::{EventSubNotificationEnvelope, parse_notification};

/// One EventSub subscription request: (type, version, condition).
pub type SubscriptionRequest = (String, String, serde_json::Value);

/// Holds all state for the EventSub websocket session. Notifications are
/// parsed into typed events and published on the bus; the dispatch loop
/// takes it from there.
pub struct TwitchEventSubPlatform {
    access_token: String,
    client_id: String,
    event_bus: Arc<EventBus>,
    subscriptions: Vec<SubscriptionRequest>,
}

impl TwitchEventSubPlatform {
    /// `subscriptions` is what the event registry asked for; the chat
    /// message subscription the command registry needs is appended here
    /// so callers don't have to remember it.
    pub fn new(
        access_token: &str,
        client_id: &str,
        broadcaster_user_id: &str,
        bot_user_id: &str,
        event_bus: Arc<EventBus>,
        mut subscriptions: Vec<SubscriptionRequest>,
    ) -> Self {
        subscriptions.push((
            "channel.chat.message".to_string(),
            "1".to_string(),
            json!({
                "broadcaster_user_id": broadcaster_user_id,
                "user_id": bot_user_id,
            }),
        ));
        Self {
            access_token: access_token.to_string(),
            client_id: client_id.to_string(),
            event_bus,
            subscriptions,
        }
    }

    /// Entrypoint: keeps the socket alive and hops when Twitch says so.
    /// Returns only on graceful close; connection errors back off and
    /// retry.
    pub async fn start_loop(&self) -> Result<(), Error> {
        let mut url = "wss://eventsub.wss.twitch.tv/ws".to_string();
        let mut current_ws: Option<WebSocketStream<MaybeTlsStream<TcpStream>>> = None;

        loop {
            if self.event_bus.is_shutdown() {
                info!("[EventSub] shutdown flag set, leaving socket loop");
                return Ok(());
            }

            if current_ws.is_none() {
                let (ws, _) = match connect_async(&url).await {
                    Ok(pair) => pair,
                    Err(e) => {
                        error!("[EventSub] connect error: {}", e);
                        sleep(Duration::from_secs(15)).await;
                        continue;
                    }
                };
                info!("[EventSub] connected => {}", url);
                current_ws = Some(ws);
            }

            if let Some(mut ws) = current_ws.take() {
                match self.run_read_loop(&mut ws).await {
                    // Twitch asked us to hop to a new URL.
                    Ok(Some(new_url)) => {
                        warn!("[EventSub] reconnecting => {}", new_url);
                        match self.handle_reconnect(&mut ws, &new_url).await {
                            Ok(new_ws) => {
                                info!("[EventSub] reconnect successful");
                                current_ws = Some(new_ws);
                                url = new_url;
                            }
                            Err(e) => {
                                error!("[EventSub] reconnect failed: {}", e);
                                let _ = ws.close(None).await;
                                sleep(Duration::from_secs(15)).await;
                                url = "wss://eventsub.wss.twitch.tv/ws".to_string();
                            }
                        }
                    }
                    // Graceful close.
                    Ok(None) => {
                        info!("[EventSub] websocket closed gracefully.");
                        return Ok(());
                    }
                    // Hard error: back off and retry from the default URL.
                    Err(e) => {
                        error!("[EventSub] loop error: {}", e);
                        sleep(Duration::from_secs(15)).await;
                        url = "wss://eventsub.wss.twitch.tv/ws".to_string();
                    }
                }
            }
        }
    }

    async fn handle_reconnect(
        &self,
        old_ws: &mut WebSocketStream<MaybeTlsStream<TcpStream>>,
        new_url: &str,
    ) -> Result<WebSocketStream<MaybeTlsStream<TcpStream>>, Error> {
        let (mut new_ws, _) = connect_async(new_url)
            .await
            .map_err(|e| Error::Platform(format!("failed to connect to reconnect URL: {e}")))?;

        // Only drop the old socket once the new one has said welcome;
        // subscriptions carry over on a session_reconnect hop.
        let welcome =
            tokio::time::timeout(Duration::from_secs(10), Self::wait_for_welcome(&mut new_ws))
                .await;

        match welcome {
            Ok(Ok(())) => {
                let _ = old_ws.close(None).await;
                Ok(new_ws)
            }
            Ok(Err(e)) => {
                let _ = new_ws.close(None).await;
                Err(e)
            }
            Err(_) => {
                let _ = new_ws.close(None).await;
                Err(Error::Platform(
                    "timeout waiting for welcome message on reconnect".into(),
                ))
            }
        }
    }

    async fn wait_for_welcome(
        ws: &mut WebSocketStream<MaybeTlsStream<TcpStream>>,
    ) -> Result<(), Error> {
        while let Some(msg_res) = ws.next().await {
            let msg = msg_res.map_err(|e| Error::Platform(format!("ws error: {e}")))?;

            if msg.is_close() {
                return Err(Error::Platform(
                    "connection closed while waiting for welcome".into(),
                ));
            }
            if msg.is_ping() || msg.is_pong() {
                continue;
            }

            let Message::Text(txt) = msg else { continue };
            let parsed: serde_json::Value =
                serde_json::from_str(&txt).map_err(|e| Error::Platform(format!("bad json: {e}")))?;

            if let Some("session_welcome") = parsed
                .get("metadata")
                .and_then(|m| m.get("message_type"))
                .and_then(|v| v.as_str())
            {
                debug!("[EventSub] received welcome on reconnect");
                return Ok(());
            }
        }
        Err(Error::Platform(
            "connection closed without welcome message".into(),
        ))
    }

    /// Reads until the socket closes or a reconnect URL arrives.
    /// `Ok(Some(url))` => caller must reconnect to `url`.
    async fn run_read_loop(
        &self,
        ws: &mut WebSocketStream<MaybeTlsStream<TcpStream>>,
    ) -> Result<Option<String>, Error> {
        while let Some(msg_res) = ws.next().await {
            let msg = msg_res.map_err(|e| Error::Platform(format!("ws error: {e}")))?;

            if msg.is_close() {
                return Ok(None);
            }
            if msg.is_ping() || msg.is_pong() {
                continue;
            }

            let Message::Text(txt) = msg else { continue };
            let parsed: serde_json::Value =
                serde_json::from_str(&txt).map_err(|e| Error::Platform(format!("bad json: {e}")))?;

            match parsed
                .get("metadata")
                .and_then(|m| m.get("message_type"))
                .and_then(|v| v.as_str())
            {
                Some("session_welcome") => {
                    if let Some(id) = parsed
                        .pointer("/payload/session/id")
                        .and_then(|v| v.as_str())
                    {
                        if let Err(e) = self.subscribe_all_events(id).await {
                            error!("subscribe failed: {e:?}");
                        }
                    }
                }
                Some("session_keepalive") => trace!("keepalive"),
                Some("session_reconnect") => {
                    let url = parsed
                        .pointer("/payload/session/reconnect_url")
                        .and_then(|v| v.as_str())
                        .ok_or_else(|| Error::Platform("missing reconnect_url".into()))?
                        .to_string();
                    return Ok(Some(url));
                }
                Some("notification") => {
                    if let Some(payload) = parsed.get("payload") {
                        if let Ok(env) =
                            serde_json::from_value::<EventSubNotificationEnvelope>(payload.clone())
                        {
                            match parse_notification(&env.subscription.sub_type, &env.event) {
                                Some(evt) => self.event_bus.publish(evt).await,
                                None => debug!(
                                    "unparsed notification type={}",
                                    env.subscription.sub_type
                                ),
                            }
                        }
                    }
                }
                Some("revocation") => warn!("subscription revoked, check scopes"),
                other => debug!("unhandled message_type={:?}", other),
            }
        }
        Ok(None) // natural close
    }

    /// Create every requested subscription against the fresh session.
    /// Failures are logged per type and non-fatal.
    async fn subscribe_all_events(&self, session_id: &str) -> Result<(), Error> {
        let http = ReqwestClient::new();

        for (etype, version, condition) in &self.subscriptions {
            let body = json!({
                "type": etype,
                "version": version,
                "condition": condition,
                "transport": {
                    "method": "websocket",
                    "session_id": session_id
                }
            });
            debug!("subscribing to {} v{}", etype, version);

            let resp = http
                .post("https://api.twitch.tv/helix/eventsub/subscriptions")
                .header("Client-Id", &self.client_id)
                .header("Authorization", format!("Bearer {}", self.access_token))
                .json(&body)
                .send()
                .await
                .map_err(|e| Error::Platform(format!("error posting subscribe for {etype}: {e}")))?;

            let status = resp.status();
            if !status.is_success() {
                let text = resp.text().await.unwrap_or_default();
                warn!(
                    "[EventSub] could not subscribe to {} => HTTP {} => {}",
                    etype, status, text
                );
            } else {
                debug!("[EventSub] subscribed to {} OK", etype);
            }
        }

        Ok(())
    }
}
