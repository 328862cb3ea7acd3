//! Google Calendar v3 events API.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use taskplan_core::{CalendarProvider, Config, Error, ProviderEvent, RangeWindow, Result};
use tokio::sync::Mutex;
use tracing::debug;
use url::Url;

use crate::session::Session;

const API_BASE_URL: &str = "https://www.googleapis.com/calendar/v3/";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Largest page the events list endpoint accepts.
const MAX_RESULTS: &str = "2500";

pub struct GoogleCalendar {
    http: reqwest::Client,
    base_url: Url,
    calendar_id: String,
    session: Mutex<Session>,
}

impl GoogleCalendar {
    pub fn new(calendar_id: impl Into<String>, session: Session) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Provider(format!("Failed to build HTTP client: {e}")))?;
        let base_url = Url::parse(API_BASE_URL)
            .map_err(|e| Error::Config(format!("Invalid API URL: {e}")))?;

        Ok(GoogleCalendar {
            http,
            base_url,
            calendar_id: calendar_id.into(),
            session: Mutex::new(session),
        })
    }

    /// Calendar from the configured id and token file.
    pub fn from_config(config: &Config) -> Result<Self> {
        let session = load_session(&config.token_path())?;
        Self::new(config.calendar_id.clone(), session)
    }

    /// Point the client at another API root (must end with `/`).
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn calendar_id(&self) -> &str {
        &self.calendar_id
    }

    /// `{base}/calendars/{calendar_id}/events[/{event_id}]`, with each id
    /// percent-encoded as a single path segment.
    pub fn events_url(&self, event_id: Option<&str>) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| Error::Config(format!("Invalid API URL: {}", self.base_url)))?;
            segments
                .pop_if_empty()
                .extend(["calendars", self.calendar_id.as_str(), "events"]);
            if let Some(id) = event_id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    async fn authorized(&self, request: RequestBuilder) -> Result<Response> {
        let token = {
            let mut session = self.session.lock().await;
            session
                .access_token(&self.http)
                .await
                .map_err(|e| Error::Provider(format!("{e:#}")))?
        };

        request
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| Error::Provider(format!("Google Calendar request failed: {e}")))
    }

    async fn fetch_page(
        &self,
        window: &RangeWindow,
        page_token: Option<&str>,
    ) -> Result<EventsPage> {
        let (time_min, time_max) = window.bounds();
        let mut query = vec![
            ("timeMin", time_min),
            ("timeMax", time_max),
            ("singleEvents", "true".to_string()),
            ("orderBy", "startTime".to_string()),
            ("maxResults", MAX_RESULTS.to_string()),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token.to_string()));
        }

        let request = self.http.get(self.events_url(None)?).query(&query);
        let response = check(self.authorized(request).await?, None).await?;
        json(response).await
    }
}

#[async_trait]
impl CalendarProvider for GoogleCalendar {
    async fn list_events(&self, window: &RangeWindow) -> Result<Vec<ProviderEvent>> {
        let mut events = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self.fetch_page(window, page_token.as_deref()).await?;
            events.extend(page.items.into_iter().filter(|e| !e.is_cancelled()));

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        debug!(
            calendar_id = %self.calendar_id,
            count = events.len(),
            "fetched events"
        );
        Ok(events)
    }

    async fn get_event(&self, event_id: &str) -> Result<ProviderEvent> {
        let request = self.http.get(self.events_url(Some(event_id))?);
        let response = check(self.authorized(request).await?, Some(event_id)).await?;
        json(response).await
    }

    async fn insert_event(&self, event: &ProviderEvent) -> Result<ProviderEvent> {
        let mut body = event.clone();
        body.id.clear(); // Let Google assign the ID

        let request = self.http.post(self.events_url(None)?).json(&body);
        let response = check(self.authorized(request).await?, None).await?;
        json(response).await
    }

    async fn update_event(&self, event_id: &str, event: &ProviderEvent) -> Result<ProviderEvent> {
        let request = self.http.put(self.events_url(Some(event_id))?).json(event);
        let response = check(self.authorized(request).await?, Some(event_id)).await?;
        json(response).await
    }

    async fn delete_event(&self, event_id: &str) -> Result<()> {
        let request = self.http.delete(self.events_url(Some(event_id))?);
        let response = self.authorized(request).await?;

        // Already deleted
        if response.status() == StatusCode::GONE {
            return Ok(());
        }

        check(response, Some(event_id)).await.map(|_| ())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventsPage {
    #[serde(default)]
    items: Vec<ProviderEvent>,
    #[serde(default)]
    next_page_token: Option<String>,
}

fn load_session(path: &Path) -> Result<Session> {
    Session::load(path).map_err(|e| Error::Config(format!("{e:#}")))
}

async fn check(response: Response, event_id: Option<&str>) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(status_error(status, &body, event_id))
}

async fn json<T: serde::de::DeserializeOwned>(response: Response) -> Result<T> {
    response
        .json()
        .await
        .map_err(|e| Error::Provider(format!("Failed to parse Google Calendar response: {e}")))
}

fn status_error(status: StatusCode, body: &str, event_id: Option<&str>) -> Error {
    match event_id {
        Some(id) if status == StatusCode::NOT_FOUND || status == StatusCode::GONE => {
            Error::EventNotFound(id.to_string())
        }
        _ => Error::Provider(format!("Google Calendar returned {status}: {}", body.trim())),
    }
}
