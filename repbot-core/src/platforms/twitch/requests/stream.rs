//! Helix stream requests:
//!  - getStreams (live check)
//!  - startCommercial

use serde::{Deserialize, Serialize};
use tracing::debug;

use repbot_common::Error;

use crate::platforms::twitch::client::TwitchHelixClient;

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct StreamEntry {
    id: String,
    #[serde(rename = "type")]
    stream_type: String,
}

#[derive(Debug, Deserialize)]
struct StreamsResponse {
    data: Vec<StreamEntry>,
}

#[derive(Debug, Serialize)]
struct CommercialBody<'a> {
    broadcaster_id: &'a str,
    length: u32,
}

impl TwitchHelixClient {
    /// True when the channel currently has a live stream entry.
    pub async fn fetch_stream_live(&self) -> Result<bool, Error> {
        let url = format!(
            "https://api.twitch.tv/helix/streams?user_id={}",
            self.broadcaster_id()
        );

        let resp = self
            .http_client()
            .get(&url)
            .header("Client-Id", self.client_id())
            .header("Authorization", format!("Bearer {}", self.bearer_token()))
            .send()
            .await
            .map_err(|e| Error::Platform(format!("fetch_stream_live network error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(Error::Platform(format!(
                "fetch_stream_live: HTTP {status} => {text}"
            )));
        }

        let parsed: StreamsResponse = resp
            .json()
            .await
            .map_err(|e| Error::Platform(format!("fetch_stream_live parse error: {e}")))?;
        Ok(!parsed.data.is_empty())
    }

    /// Run a commercial break. Helix accepts 30..180 in 30s steps.
    /// Required scope: `channel:edit:commercial`
    pub async fn start_commercial_req(&self, length_secs: u32) -> Result<(), Error> {
        let url = "https://api.twitch.tv/helix/channels/commercial";

        let body = CommercialBody {
            broadcaster_id: self.broadcaster_id(),
            length: length_secs,
        };

        debug!("start_commercial => {}s", length_secs);

        let resp = self
            .http_client()
            .post(url)
            .header("Client-Id", self.client_id())
            .header("Authorization", format!("Bearer {}", self.bearer_token()))
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Platform(format!("start_commercial network error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(Error::Platform(format!(
                "start_commercial: HTTP {status} => {text}"
            )));
        }
        Ok(())
    }
}
