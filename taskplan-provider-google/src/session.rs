//! A valid Google session (access token) for calling the Calendar API.
//!
//! Tokens are kept in an authorized-user JSON file, the format written by
//! Google's client libraries:
//!
//! ```json
//! {"token": "...", "refresh_token": "...", "client_id": "...",
//!  "client_secret": "...", "expiry": "2024-03-01T10:00:00Z"}
//! ```
//!
//! Obtaining the first token (the consent flow) is not handled here.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Refresh slightly early so a token does not expire mid-request.
const EXPIRY_SLACK_SECS: i64 = 60;

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    /// Current access token.
    #[serde(default)]
    pub token: String,
    pub refresh_token: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    pub client_id: String,
    pub client_secret: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
    /// Fields we do not use (scopes, universe_domain...), written back as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug)]
pub struct Session {
    path: PathBuf,
    data: SessionData,
}

impl Session {
    pub fn new(path: impl Into<PathBuf>, data: SessionData) -> Self {
        Session {
            path: path.into(),
            data,
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!(
                "Google OAuth token not found.\n\n\
                Save an authorized-user token file (token, refresh_token, \
                client_id, client_secret) at:\n  {}\n\n\
                or point TASKPLAN_TOKEN_FILE at an existing one.",
                path.display()
            );
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read Google OAuth token from {}", path.display()))?;

        let data: SessionData = serde_json::from_str(&contents).with_context(|| {
            format!("Failed to parse Google OAuth token from {}", path.display())
        })?;

        Ok(Session::new(path, data))
    }

    pub fn save(&self) -> Result<()> {
        let contents =
            serde_json::to_string_pretty(&self.data).context("Failed to serialize session")?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write session to {}", self.path.display()))?;

        // Set to owner-only (0600) since file contains OAuth tokens:
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("Failed to set permissions on {}", self.path.display()))?;
        }

        Ok(())
    }

    pub fn data(&self) -> &SessionData {
        &self.data
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        if self.data.token.is_empty() {
            return true;
        }
        match self.data.expiry {
            Some(expiry) => now + Duration::seconds(EXPIRY_SLACK_SECS) >= expiry,
            None => false,
        }
    }

    /// Access token, refreshed first if it has expired.
    pub async fn access_token(&mut self, http: &reqwest::Client) -> Result<String> {
        if self.is_expired() {
            self.refresh(http).await?;
        }
        Ok(self.data.token.clone())
    }

    async fn refresh(&mut self, http: &reqwest::Client) -> Result<()> {
        let response = http
            .post(&self.data.token_uri)
            .form(&[
                ("client_id", self.data.client_id.as_str()),
                ("client_secret", self.data.client_secret.as_str()),
                ("refresh_token", self.data.refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .context("Failed to send token refresh request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Failed to refresh Google token ({status}): {error_text}");
        }

        let refreshed: RefreshResponse = response
            .json()
            .await
            .context("Failed to parse token refresh response")?;

        self.apply(refreshed, Utc::now());
        self.save()?;
        info!(path = %self.path.display(), "refreshed Google access token");

        Ok(())
    }

    fn apply(&mut self, refreshed: RefreshResponse, now: DateTime<Utc>) {
        self.data.token = refreshed.access_token;
        self.data.expiry = Some(now + Duration::seconds(refreshed.expires_in));
        // Google typically doesn't return a new refresh_token on refresh
        if let Some(refresh_token) = refreshed.refresh_token.filter(|t| !t.is_empty()) {
            self.data.refresh_token = refresh_token;
        }
    }
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
    expires_in: i64,
    #[serde(default)]
    refresh_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const TOKEN_JSON: &str = r#"{
        "token": "ya29.access",
        "refresh_token": "1//refresh",
        "token_uri": "https://oauth2.googleapis.com/token",
        "client_id": "id.apps.googleusercontent.com",
        "client_secret": "secret",
        "scopes": ["https://www.googleapis.com/auth/calendar"],
        "expiry": "2024-03-01T10:00:00Z"
    }"#;

    fn session() -> Session {
        Session::new("/unused", serde_json::from_str(TOKEN_JSON).unwrap())
    }

    #[test]
    fn test_expiry_with_slack() {
        let session = session();
        let expiry = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();

        assert!(!session.is_expired_at(expiry - Duration::minutes(5)));
        assert!(session.is_expired_at(expiry - Duration::seconds(30)));
        assert!(session.is_expired_at(expiry + Duration::minutes(1)));
    }

    #[test]
    fn test_empty_token_needs_refresh() {
        let mut session = session();
        session.data.token.clear();
        session.data.expiry = None;
        assert!(session.is_expired_at(Utc::now()));
    }

    #[test]
    fn test_apply_keeps_refresh_token_when_absent() {
        let mut session = session();
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();

        session.apply(
            RefreshResponse {
                access_token: "ya29.new".into(),
                expires_in: 3599,
                refresh_token: None,
            },
            now,
        );

        assert_eq!(session.data.token, "ya29.new");
        assert_eq!(session.data.refresh_token, "1//refresh");
        assert_eq!(session.data.expiry, Some(now + Duration::seconds(3599)));
    }

    #[test]
    fn test_save_and_load_preserve_unknown_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");

        let mut session = session();
        session.path = path.clone();
        session.save().unwrap();

        let loaded = Session::load(&path).unwrap();
        assert_eq!(loaded.data.token, "ya29.access");
        assert_eq!(
            loaded.data.extra["scopes"][0],
            "https://www.googleapis.com/auth/calendar"
        );

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }

    #[test]
    fn test_missing_file_explains_where_to_put_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");

        let err = Session::load(&path).unwrap_err();
        assert!(err.to_string().contains("token.json"));
    }
}
