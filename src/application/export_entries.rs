//! Export use case
//!
//! One export is one request to the renderer followed by a local save:
//!
//! ```text
//! Idle -> Requesting -> Validating -> Downloading -> Idle
//!              \-> Failed -> Idle
//! ```
//!
//! Invocations share nothing but the collaborators, so several exports may run
//! at once. Retrying is always left to the caller.

use crate::domain::{
    export_filename, ExportFilters, ExportFormat, ExportRequest, ExportScope, ExportTimeouts,
    SelectionManager,
};
use crate::error::{ExportError, ExportErrorKind};
use crate::infrastructure::{DownloadSink, ExportRenderer, RenderFailure};
use chrono::{Local, NaiveDateTime};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Source of export timestamps
pub type Clock = Arc<dyn Fn() -> NaiveDateTime + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportPhase {
    Idle,
    Requesting,
    Validating,
    Downloading,
    Failed,
}

/// A saved export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReceipt {
    pub format: ExportFormat,
    pub scope: ExportScope,
    pub filename: String,
    pub path: PathBuf,
    pub bytes: usize,
}

pub struct ExportOrchestrator {
    renderer: Arc<dyn ExportRenderer>,
    sink: Arc<dyn DownloadSink>,
    requester: String,
    timeouts: ExportTimeouts,
    clock: Clock,
}

impl ExportOrchestrator {
    pub fn new(
        renderer: Arc<dyn ExportRenderer>,
        sink: Arc<dyn DownloadSink>,
        requester: impl Into<String>,
    ) -> Self {
        ExportOrchestrator {
            renderer,
            sink,
            requester: requester.into(),
            timeouts: ExportTimeouts::default(),
            clock: Arc::new(|| Local::now().naive_local()),
        }
    }

    pub fn with_timeouts(mut self, timeouts: ExportTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Build the request for `ids`: none exports everything the requester can see.
    pub fn request<S: AsRef<str>>(
        &self,
        format: ExportFormat,
        ids: &[S],
        filters: ExportFilters,
    ) -> ExportRequest {
        ExportRequest {
            format,
            scope: ExportScope::from_ids(ids),
            requester: self.requester.clone(),
            filters,
        }
    }

    /// Export zero, one or many entries
    pub async fn export<S: AsRef<str>>(
        &self,
        format: ExportFormat,
        ids: &[S],
    ) -> Result<ExportReceipt, ExportError> {
        self.export_request(self.request(format, ids, ExportFilters::default()))
            .await
    }

    /// Export the current selection.
    ///
    /// The selection is read once up front. It is cleared only when a
    /// non-empty selection exported successfully; on failure it is kept so
    /// the user can retry.
    pub async fn export_selection(
        &self,
        format: ExportFormat,
        selection: &mut SelectionManager,
        filters: ExportFilters,
    ) -> Result<ExportReceipt, ExportError> {
        let snapshot = selection.snapshot();
        let receipt = self
            .export_request(self.request(format, snapshot.as_slice(), filters))
            .await?;

        if !snapshot.is_empty() {
            selection.clear();
        }
        Ok(receipt)
    }

    pub async fn export_request(
        &self,
        request: ExportRequest,
    ) -> Result<ExportReceipt, ExportError> {
        let format = request.format;
        let timeout = self.timeouts.for_format(format);
        trace_phase(format, ExportPhase::Requesting);

        let rendered =
            tokio::time::timeout(timeout, self.renderer.render(&request, timeout)).await;
        let payload = match rendered {
            Ok(Ok(payload)) => payload,
            Ok(Err(failure)) => return Err(fail(classify_render_failure(format, failure))),
            Err(_) => {
                return Err(fail(ExportError::new(
                    ExportErrorKind::Timeout,
                    format,
                    format!("no response within {}s", timeout.as_secs()),
                )))
            }
        };

        trace_phase(format, ExportPhase::Validating);
        if payload.is_empty() {
            return Err(fail(ExportError::new(
                ExportErrorKind::EmptyResult,
                format,
                format!("renderer returned no data for {}", request.scope.describe()),
            )));
        }

        trace_phase(format, ExportPhase::Downloading);
        let filename = export_filename(format, (self.clock)());
        let bytes = payload.len();
        let path = self.sink.save(&filename, payload).await.map_err(|e| {
            fail(ExportError::new(
                ExportErrorKind::Unknown,
                format,
                format!("could not save {}: {}", filename, e),
            ))
        })?;

        trace_phase(format, ExportPhase::Idle);
        info!(
            format = %format,
            scope = %request.scope.describe(),
            bytes,
            path = %path.display(),
            "export saved"
        );

        Ok(ExportReceipt {
            format,
            scope: request.scope,
            filename,
            path,
            bytes,
        })
    }
}

fn trace_phase(format: ExportFormat, phase: ExportPhase) {
    debug!(format = %format, phase = ?phase, "export phase");
}

fn fail(error: ExportError) -> ExportError {
    warn!(format = %error.format, kind = %error.kind, detail = %error.detail, "export failed");
    trace_phase(error.format, ExportPhase::Failed);
    error
}

/// Map a renderer failure to the kind the UI acts on.
///
/// 404 and 501 mean the format is not offered. A 400 that names an invalid
/// format means the same thing.
pub fn classify_render_failure(format: ExportFormat, failure: RenderFailure) -> ExportError {
    let kind = match &failure {
        RenderFailure::Status { status: 404 | 501, .. } => ExportErrorKind::NotSupported,
        RenderFailure::Status { status: 400, body }
            if body.to_lowercase().contains("invalid format") =>
        {
            ExportErrorKind::NotSupported
        }
        RenderFailure::Status { status: 408 | 504, .. } => ExportErrorKind::Timeout,
        RenderFailure::Status { .. } => ExportErrorKind::Unknown,
        RenderFailure::Timeout => ExportErrorKind::Timeout,
        RenderFailure::Network(_) => ExportErrorKind::NetworkError,
        RenderFailure::Other(_) => ExportErrorKind::Unknown,
    };

    ExportError::new(kind, format, failure.to_string())
}
