//! Thin façade over the Spotify Web API: token refresh plus the three
//! playback calls the bot actually uses. Credentials come from the
//! environment (optionally bootstrapped from Drive first).

use std::sync::Arc;

use reqwest::Client as ReqwestClient;
use serde::Deserialize;
use tracing::debug;

use repbot_common::Error;

/// What `!song` reports about the current track.
#[derive(Debug, Clone)]
pub struct NowPlaying {
    pub track: String,
    pub artists: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct CurrentlyPlayingResponse {
    is_playing: bool,
    item: Option<TrackItem>,
}

#[derive(Debug, Deserialize)]
struct TrackItem {
    name: String,
    #[serde(default)]
    artists: Vec<ArtistItem>,
}

#[derive(Debug, Deserialize)]
struct ArtistItem {
    name: String,
}

#[derive(Clone)]
pub struct SpotifyClient {
    http: Arc<ReqwestClient>,
    access_token: String,
}

impl SpotifyClient {
    /// Exchange a refresh token for an access token and build the client.
    pub async fn from_refresh_token(
        client_id: &str,
        client_secret: &str,
        refresh_token: &str,
    ) -> Result<Self, Error> {
        let http = ReqwestClient::new();
        let params = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ];

        let resp = http
            .post("https://accounts.spotify.com/api/token")
            .basic_auth(client_id, Some(client_secret))
            .form(&params)
            .send()
            .await
            .map_err(|e| Error::Platform(format!("spotify token network error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(Error::Auth(format!("spotify token: HTTP {status} => {text}")));
        }

        let parsed: TokenResponse = resp
            .json()
            .await
            .map_err(|e| Error::Platform(format!("spotify token parse error: {e}")))?;

        debug!("spotify access token refreshed");
        Ok(Self {
            http: Arc::new(http),
            access_token: parsed.access_token,
        })
    }

    /// Current track, or `None` when playback is stopped.
    pub async fn currently_playing(&self) -> Result<Option<NowPlaying>, Error> {
        let resp = self
            .http
            .get("https://api.spotify.com/v1/me/player/currently-playing")
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| Error::Platform(format!("currently_playing network error: {e}")))?;

        // 204 = nothing playing at all.
        if resp.status() == reqwest::StatusCode::NO_CONTENT {
            return Ok(None);
        }
        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(Error::Platform(format!(
                "currently_playing: HTTP {status} => {text}"
            )));
        }

        let parsed: CurrentlyPlayingResponse = resp
            .json()
            .await
            .map_err(|e| Error::Platform(format!("currently_playing parse error: {e}")))?;

        if !parsed.is_playing {
            return Ok(None);
        }
        Ok(parsed.item.map(|item| NowPlaying {
            track: item.name,
            artists: item.artists.into_iter().map(|a| a.name).collect(),
        }))
    }

    pub async fn skip_track(&self) -> Result<(), Error> {
        self.player_post("https://api.spotify.com/v1/me/player/next", "skip_track")
            .await
    }

    pub async fn pause(&self) -> Result<(), Error> {
        let resp = self
            .http
            .put("https://api.spotify.com/v1/me/player/pause")
            .header(reqwest::header::CONTENT_LENGTH, 0)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| Error::Platform(format!("pause network error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(Error::Platform(format!("pause: HTTP {status} => {text}")));
        }
        Ok(())
    }

    async fn player_post(&self, url: &str, what: &str) -> Result<(), Error> {
        let resp = self
            .http
            .post(url)
            .header(reqwest::header::CONTENT_LENGTH, 0)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| Error::Platform(format!("{what} network error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(Error::Platform(format!("{what}: HTTP {status} => {text}")));
        }
        Ok(())
    }
}

impl NowPlaying {
    /// "Track by Artist1, Artist2" as posted to chat.
    pub fn display(&self) -> String {
        if self.artists.is_empty() {
            self.track.clone()
        } else {
            format!("{} by {}", self.track, self.artists.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_playing_display_joins_artists() {
        let np = NowPlaying {
            track: "Song".to_string(),
            artists: vec!["A".to_string(), "B".to_string()],
        };
        assert_eq!(np.display(), "Song by A, B");
    }

    #[test]
    fn now_playing_display_without_artists() {
        let np = NowPlaying {
            track: "Song".to_string(),
            artists: vec![],
        };
        assert_eq!(np.display(), "Song");
    }
}
