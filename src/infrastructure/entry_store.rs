//! Entry persistence service

use crate::domain::{Entry, EntryPayload};
use crate::error::{PersistenceFailure, Result as HatchlingResult};
use crate::infrastructure::http::{build_client, parse_url, USER_ID_HEADER};
use async_trait::async_trait;
use reqwest::multipart::Form;
use reqwest::{StatusCode, Url};
use serde::Deserialize;

/// Stores entries and returns their canonical server form
#[async_trait]
pub trait EntryStore: Send + Sync {
    async fn create(&self, payload: &EntryPayload) -> Result<Entry, PersistenceFailure>;

    async fn update(&self, entry_id: &str, payload: &EntryPayload)
        -> Result<Entry, PersistenceFailure>;
}

/// Entry store backed by the journal HTTP API.
///
/// `POST {api}/entry` creates, `PUT {api}/entry/{id}` overwrites.
#[derive(Debug, Clone)]
pub struct HttpEntryStore {
    base_url: Url,
    client: reqwest::Client,
}

impl HttpEntryStore {
    pub fn new(api_url: &str) -> HatchlingResult<Self> {
        Ok(Self {
            base_url: parse_url(api_url, "api_url")?,
            client: build_client()?,
        })
    }

    /// `{api}/entry`, or `{api}/entry/{id}` with the id as one escaped segment
    pub fn entry_url(&self, entry_id: Option<&str>) -> Result<Url, PersistenceFailure> {
        if let Some(id) = entry_id {
            if id.is_empty() || id == "." || id == ".." {
                return Err(PersistenceFailure::Rejected(format!(
                    "invalid entry id: '{}'",
                    id
                )));
            }
        }

        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                PersistenceFailure::Transport(format!(
                    "api_url cannot take a path: {}",
                    self.base_url
                ))
            })?;
            segments.pop_if_empty().push("entry");
            if let Some(id) = entry_id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        payload: &EntryPayload,
        entry_id: Option<&str>,
    ) -> Result<Entry, PersistenceFailure> {
        let response = request
            .header(USER_ID_HEADER, payload.author_id.as_str())
            .multipart(payload_form(payload))
            .send()
            .await
            .map_err(|e| PersistenceFailure::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PersistenceFailure::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(classify_status(status, &body));
        }

        parse_entry_response(&body, payload, entry_id)
    }
}

#[async_trait]
impl EntryStore for HttpEntryStore {
    async fn create(&self, payload: &EntryPayload) -> Result<Entry, PersistenceFailure> {
        let url = self.entry_url(None)?;
        self.send(self.client.post(url), payload, None).await
    }

    async fn update(
        &self,
        entry_id: &str,
        payload: &EntryPayload,
    ) -> Result<Entry, PersistenceFailure> {
        let url = self.entry_url(Some(entry_id))?;
        self.send(self.client.put(url), payload, Some(entry_id)).await
    }
}

fn payload_form(payload: &EntryPayload) -> Form {
    payload
        .form_fields()
        .into_iter()
        .fold(Form::new(), |form, (name, value)| form.text(name, value))
}

/// Map a non-success status to a failure kind
pub fn classify_status(status: StatusCode, body: &str) -> PersistenceFailure {
    let message = error_message(body);
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            PersistenceFailure::Rejected(message)
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            PersistenceFailure::Unauthorized(message)
        }
        StatusCode::NOT_FOUND => PersistenceFailure::NotFound(message),
        _ => PersistenceFailure::Server {
            status: status.as_u16(),
            message,
        },
    }
}

/// Pull `error` out of a JSON error body, falling back to the raw text
fn error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: String,
    }

    serde_json::from_str::<ErrorBody>(body)
        .map(|parsed| parsed.error)
        .unwrap_or_else(|_| body.trim().to_string())
}

/// Read the service's answer to a create or update.
///
/// A full entry (bare or as `{"entry": {..}}`) is taken as is. A plain
/// acknowledgement such as `{"entry_id": "..", "status": "created"}` means the
/// payload was stored as sent; its id falls back to `entry_id` for updates.
pub fn parse_entry_response(
    body: &str,
    payload: &EntryPayload,
    entry_id: Option<&str>,
) -> Result<Entry, PersistenceFailure> {
    #[derive(Deserialize)]
    struct Wrapped {
        entry: Entry,
    }

    #[derive(Deserialize)]
    struct Acknowledged {
        #[serde(default)]
        entry_id: Option<String>,
    }

    if let Ok(entry) = serde_json::from_str::<Entry>(body) {
        return Ok(entry);
    }
    if let Ok(wrapped) = serde_json::from_str::<Wrapped>(body) {
        return Ok(wrapped.entry);
    }

    let unreadable = |detail: String| PersistenceFailure::Server {
        status: 200,
        message: format!("unreadable entry response: {}", detail),
    };

    let ack =
        serde_json::from_str::<Acknowledged>(body).map_err(|e| unreadable(e.to_string()))?;
    match ack.entry_id.as_deref().or(entry_id) {
        Some(id) if !id.is_empty() => Ok(Entry::from_payload(id, payload)),
        _ => Err(unreadable("no entry id".to_string())),
    }
}
