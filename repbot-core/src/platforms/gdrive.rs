//! Google Drive credential bootstrap: downloads one credentials file at
//! boot so later setup steps (Spotify) can source their refresh tokens
//! from it instead of the local environment.

use std::collections::HashMap;

use reqwest::Client as ReqwestClient;
use tracing::debug;

use repbot_common::Error;

/// Key/value credential blob fetched from Drive, e.g.
/// `{ "spotify_refresh_token": "..." }`.
#[derive(Debug, Clone, Default)]
pub struct CredentialBundle {
    values: HashMap<String, String>,
}

impl CredentialBundle {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn from_json(raw: &str) -> Result<Self, Error> {
        let values: HashMap<String, String> = serde_json::from_str(raw)?;
        Ok(Self { values })
    }
}

/// Download the credentials file via the Drive v3 files endpoint.
pub async fn fetch_credentials(
    access_token: &str,
    file_id: &str,
) -> Result<CredentialBundle, Error> {
    let url = format!(
        "https://www.googleapis.com/drive/v3/files/{}?alt=media",
        file_id
    );

    let resp = ReqwestClient::new()
        .get(&url)
        .bearer_auth(access_token)
        .send()
        .await
        .map_err(|e| Error::Platform(format!("gdrive fetch network error: {e}")))?;

    if !resp.status().is_success() {
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        return Err(Error::Platform(format!(
            "gdrive fetch: HTTP {status} => {text}"
        )));
    }

    let raw = resp
        .text()
        .await
        .map_err(|e| Error::Platform(format!("gdrive fetch read error: {e}")))?;

    let bundle = CredentialBundle::from_json(&raw)?;
    debug!("gdrive credentials fetched ({} keys)", bundle.values.len());
    Ok(bundle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundle_parses_flat_json() {
        let bundle =
            CredentialBundle::from_json(r#"{"spotify_refresh_token":"abc","other":"x"}"#).unwrap();
        assert_eq!(bundle.get("spotify_refresh_token"), Some("abc"));
        assert_eq!(bundle.get("missing"), None);
    }

    #[test]
    fn bundle_rejects_non_object() {
        assert!(CredentialBundle::from_json("[1,2,3]").is_err());
    }
}
