//! Remote tag classification service

use crate::domain::MediaRef;
use crate::error::Result as HatchlingResult;
use crate::infrastructure::http::{build_client, parse_url};
use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

/// External service that suggests tags for a memory
#[async_trait]
pub trait TagClassifier: Send + Sync {
    /// Suggest raw tags for the content; an empty list is a valid answer
    async fn classify(&self, content: &str, media: Option<&MediaRef>) -> Result<Vec<String>>;
}

/// Classifier reached over HTTP.
///
/// Sends `{"content": .., "media": {..}}` and expects `{"tags": [..]}`.
#[derive(Debug, Clone)]
pub struct HttpTagClassifier {
    url: reqwest::Url,
    timeout: Duration,
    client: reqwest::Client,
}

impl HttpTagClassifier {
    pub fn new(url: &str, timeout: Duration) -> HatchlingResult<Self> {
        Ok(Self {
            url: parse_url(url, "classifier_url")?,
            timeout,
            client: build_client()?,
        })
    }
}

#[async_trait]
impl TagClassifier for HttpTagClassifier {
    async fn classify(&self, content: &str, media: Option<&MediaRef>) -> Result<Vec<String>> {
        let mut body = json!({ "content": content });
        if let Some(media) = media {
            body["media"] = json!({
                "url": media.url,
                "mime_type": media.mime_type,
                "kind": media.kind(),
            });
        }

        let response = self
            .client
            .post(self.url.clone())
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("tag classification request to {} failed", self.url))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .context("failed to read classification response body")?;

        if !status.is_success() {
            bail!("tag classification failed: status {status}, body {text}");
        }

        parse_classifier_tags(&text)
    }
}

/// Extract tags from a classifier response.
///
/// Accepts `{"tags": ["a", "b"]}` and the free-text form `{"tags": "a, b"}`.
pub fn parse_classifier_tags(body: &str) -> Result<Vec<String>> {
    let value: Value =
        serde_json::from_str(body).context("failed to parse classification response JSON")?;

    match value.get("tags") {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| anyhow!("non-string tag in classification response: {item}"))
            })
            .collect(),
        Some(Value::String(raw)) => Ok(raw
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect()),
        Some(other) => bail!("unexpected tags value in classification response: {other}"),
        None => bail!("missing tags in classification response"),
    }
}
