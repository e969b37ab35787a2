//! Error types for hatchling

use crate::domain::ExportFormat;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Reasons an entry draft is rejected before anything is sent over the network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Entry needs text content or a media attachment")]
    ContentRequired,

    #[error("Date of memory is missing or in the future")]
    InvalidDate,
}

impl ValidationError {
    /// Stable kind label for UI layers
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::ContentRequired => "ContentRequired",
            ValidationError::InvalidDate => "InvalidDate",
        }
    }
}

/// Failure reported by the entry store while creating or updating an entry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistenceFailure {
    /// Server-side validation refused the payload
    #[error("Entry rejected by server: {0}")]
    Rejected(String),

    #[error("Not authorized to save this entry: {0}")]
    Unauthorized(String),

    #[error("Entry not found: {0}")]
    NotFound(String),

    #[error("Entry service error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Request never got a response
    #[error("Could not reach entry service: {0}")]
    Transport(String),
}

/// Classification kind for a failed export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportErrorKind {
    /// Renderer does not offer this format
    NotSupported,
    /// Renderer answered but produced no bytes
    EmptyResult,
    NetworkError,
    Timeout,
    Unknown,
}

impl fmt::Display for ExportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ExportErrorKind::NotSupported => "NotSupported",
            ExportErrorKind::EmptyResult => "EmptyResult",
            ExportErrorKind::NetworkError => "NetworkError",
            ExportErrorKind::Timeout => "Timeout",
            ExportErrorKind::Unknown => "Unknown",
        };
        f.write_str(label)
    }
}

/// Classified export failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{format} export failed ({kind}): {detail}")]
pub struct ExportError {
    pub kind: ExportErrorKind,
    pub format: ExportFormat,
    pub detail: String,
}

impl ExportError {
    pub fn new(kind: ExportErrorKind, format: ExportFormat, detail: impl Into<String>) -> Self {
        ExportError {
            kind,
            format,
            detail: detail.into(),
        }
    }

    /// Whether re-running the same export can succeed.
    ///
    /// An unsupported format will keep failing until the user picks another one.
    pub fn is_retryable(&self) -> bool {
        !matches!(self.kind, ExportErrorKind::NotSupported)
    }
}

/// Main error type for the hatchling application
#[derive(Debug, Error)]
pub enum HatchlingError {
    #[error("Not a hatchling directory: {0}")]
    NotHatchlingDirectory(PathBuf),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Persistence(#[from] PersistenceFailure),

    #[error("{0}")]
    Export(#[from] ExportError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP client error: {0}")]
    Http(String),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl HatchlingError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            HatchlingError::NotHatchlingDirectory(_) => 2,
            HatchlingError::Validation(_) | HatchlingError::InvalidArgument(_) => 3,
            HatchlingError::Persistence(_) => 4,
            HatchlingError::Export(_) => 5,
            _ => 1,
        }
    }

    /// Get a user-friendly error message with suggestions
    pub fn display_with_suggestions(&self) -> String {
        match self {
            HatchlingError::NotHatchlingDirectory(path) => {
                format!(
                    "Not a hatchling directory: {}\n\n\
                    Suggestions:\n\
                    • Run 'hatchling init' in this directory to create a workspace\n\
                    • Navigate to an existing hatchling directory\n\
                    • Set HATCHLING_ROOT environment variable to your workspace path",
                    path.display()
                )
            }
            HatchlingError::Validation(ValidationError::ContentRequired) => {
                format!(
                    "{}\n\n\
                    Suggestions:\n\
                    • Write a few words with --content\n\
                    • Or attach media with --media-url and --media-type",
                    self
                )
            }
            HatchlingError::Validation(ValidationError::InvalidDate) => {
                format!(
                    "{}\n\n\
                    Expected format: YYYY-MM-DD, today or earlier\n\
                    Example: hatchling submit --content 'First steps' --date 2025-01-17",
                    self
                )
            }
            HatchlingError::Persistence(PersistenceFailure::Unauthorized(_)) => {
                format!(
                    "{}\n\n\
                    Suggestions:\n\
                    • Check the configured author: hatchling config author_id\n\
                    • Entries can only be edited by their author",
                    self
                )
            }
            HatchlingError::Persistence(PersistenceFailure::Transport(_)) => {
                format!(
                    "{}\n\n\
                    Suggestions:\n\
                    • Check your connection and retry\n\
                    • Verify the service address: hatchling config api_url",
                    self
                )
            }
            HatchlingError::Export(err) => match err.kind {
                ExportErrorKind::NotSupported => format!(
                    "{}\n\n\
                    This format is not available yet. Try another one:\n\
                    hatchling export --format csv\n\
                    hatchling export --format json",
                    self
                ),
                ExportErrorKind::EmptyResult => format!(
                    "{}\n\n\
                    Nothing was found to export.\n\
                    • Check the selected entry ids\n\
                    • Try a wider date range",
                    self
                ),
                ExportErrorKind::NetworkError | ExportErrorKind::Timeout => format!(
                    "{}\n\n\
                    Check your connection and retry. Your selection was kept.",
                    self
                ),
                ExportErrorKind::Unknown => format!(
                    "{}\n\n\
                    Please retry. Your selection was kept.",
                    self
                ),
            },
            HatchlingError::Config(msg) => {
                if msg.contains("Unknown config key") {
                    format!(
                        "{}\n\n\
                        Example: hatchling config classify_timeout_secs 10",
                        msg
                    )
                } else {
                    msg.clone()
                }
            }
            _ => self.to_string(),
        }
    }
}

/// Result type using HatchlingError
pub type Result<T> = std::result::Result<T, HatchlingError>;
