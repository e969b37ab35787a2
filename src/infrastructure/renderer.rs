//! Export rendering service

use crate::domain::{ExportFormat, ExportRequest, ExportScope};
use crate::error::Result as HatchlingResult;
use crate::infrastructure::http::{build_client, join_url, parse_url, USER_ID_HEADER};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use std::time::Duration;
use thiserror::Error;

/// Raw failure from the renderer, before export classification
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderFailure {
    #[error("renderer answered {status}: {body}")]
    Status { status: u16, body: String },

    #[error("renderer did not answer in time")]
    Timeout,

    #[error("could not reach renderer: {0}")]
    Network(String),

    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for RenderFailure {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            RenderFailure::Timeout
        } else if e.is_connect() || e.is_request() || e.is_body() {
            RenderFailure::Network(e.to_string())
        } else {
            RenderFailure::Other(e.to_string())
        }
    }
}

/// Produces export documents; rendering happens outside this crate
#[async_trait]
pub trait ExportRenderer: Send + Sync {
    async fn render(
        &self,
        request: &ExportRequest,
        timeout: Duration,
    ) -> Result<Vec<u8>, RenderFailure>;
}

/// Renderer behind the journal HTTP API.
///
/// CSV and JSON share `GET {api}/export?format=..`, PDF lives at `GET {api}/export/pdf`.
#[derive(Debug, Clone)]
pub struct HttpExportRenderer {
    base_url: String,
    client: reqwest::Client,
}

impl HttpExportRenderer {
    pub fn new(api_url: &str) -> HatchlingResult<Self> {
        parse_url(api_url, "api_url")?;
        Ok(Self {
            base_url: api_url.trim_end_matches('/').to_string(),
            client: build_client()?,
        })
    }

    /// Endpoint and query string for a request
    pub fn request_url(&self, request: &ExportRequest) -> Result<reqwest::Url, RenderFailure> {
        let path = match request.format {
            ExportFormat::Pdf => "export/pdf",
            ExportFormat::Csv | ExportFormat::Json => "export",
        };
        let mut url = reqwest::Url::parse(&join_url(&self.base_url, path))
            .map_err(|e| RenderFailure::Other(e.to_string()))?;

        {
            let mut query = url.query_pairs_mut();
            if request.format != ExportFormat::Pdf {
                query.append_pair("format", request.format.extension());
            }
            match &request.scope {
                ExportScope::All => {}
                ExportScope::Single(id) => {
                    query.append_pair("entry_id", id);
                }
                ExportScope::Batch(ids) => {
                    query.append_pair("entry_ids", &ids.join(","));
                }
            }
            if let Some(start) = request.filters.start_date {
                query.append_pair("start_date", &start.format("%Y-%m-%d").to_string());
            }
            if let Some(end) = request.filters.end_date {
                query.append_pair("end_date", &end.format("%Y-%m-%d").to_string());
            }
            if let Some(privacy) = request.filters.privacy {
                query.append_pair("privacy", privacy.as_str());
            }
        }

        if url.query() == Some("") {
            url.set_query(None);
        }

        Ok(url)
    }
}

#[async_trait]
impl ExportRenderer for HttpExportRenderer {
    async fn render(
        &self,
        request: &ExportRequest,
        timeout: Duration,
    ) -> Result<Vec<u8>, RenderFailure> {
        let url = self.request_url(request)?;

        let response = self
            .client
            .get(url)
            .header(ACCEPT, request.format.accept())
            .header(USER_ID_HEADER, request.requester.as_str())
            .timeout(timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RenderFailure::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ExportFilters, Privacy};
    use chrono::NaiveDate;

    fn request(format: ExportFormat, scope: ExportScope) -> ExportRequest {
        ExportRequest {
            format,
            scope,
            requester: "parent-1".to_string(),
            filters: ExportFilters::default(),
        }
    }

    #[test]
    fn test_request_url_all_csv() {
        let renderer = HttpExportRenderer::new("http://localhost:5000/api/").unwrap();
        let url = renderer
            .request_url(&request(ExportFormat::Csv, ExportScope::All))
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/export?format=csv");
    }

    #[test]
    fn test_request_url_pdf_has_own_endpoint() {
        let renderer = HttpExportRenderer::new("http://localhost:5000/api").unwrap();
        let url = renderer
            .request_url(&request(ExportFormat::Pdf, ExportScope::All))
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/export/pdf");
    }

    #[test]
    fn test_request_url_scopes() {
        let renderer = HttpExportRenderer::new("http://h/api").unwrap();

        let single = renderer
            .request_url(&request(ExportFormat::Json, ExportScope::Single("e1".to_string())))
            .unwrap();
        assert_eq!(single.as_str(), "http://h/api/export?format=json&entry_id=e1");

        let batch = renderer
            .request_url(&request(
                ExportFormat::Json,
                ExportScope::Batch(vec!["e1".to_string(), "e2".to_string()]),
            ))
            .unwrap();
        assert_eq!(
            batch.as_str(),
            "http://h/api/export?format=json&entry_ids=e1%2Ce2"
        );
    }

    #[test]
    fn test_request_url_filters() {
        let renderer = HttpExportRenderer::new("http://h/api").unwrap();
        let mut req = request(ExportFormat::Csv, ExportScope::All);
        req.filters = ExportFilters {
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1),
            end_date: NaiveDate::from_ymd_opt(2025, 1, 31),
            privacy: Some(Privacy::Shared),
        };

        let url = renderer.request_url(&req).unwrap();
        assert_eq!(url.path(), "/api/export");
        assert_eq!(
            url.query(),
            Some("format=csv&start_date=2025-01-01&end_date=2025-01-31&privacy=shared")
        );
    }
}
