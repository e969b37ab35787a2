//! Infrastructure layer - External I/O and service clients

pub mod classifier;
pub mod config;
pub mod downloads;
pub mod entry_store;
pub mod http;
pub mod renderer;
pub mod workspace;

pub use classifier::{HttpTagClassifier, TagClassifier};
pub use config::Config;
pub use downloads::{DownloadSink, FileSystemDownloads};
pub use entry_store::{EntryStore, HttpEntryStore};
pub use renderer::{ExportRenderer, HttpExportRenderer, RenderFailure};
pub use workspace::{FileSystemWorkspace, WorkspaceRepository};
