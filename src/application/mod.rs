//! Application layer - Use cases and orchestration

pub mod export_entries;
pub mod init;
pub mod manage_config;
pub mod resolve_tags;
pub mod submit_entry;

pub use export_entries::{ExportOrchestrator, ExportPhase, ExportReceipt};
pub use init::{init, InitOptions};
pub use manage_config::ConfigService;
pub use resolve_tags::{
    ResolutionOutcome, ResolutionTier, TagResolution, TagResolver, TagStrategy,
};
pub use submit_entry::SubmissionCoordinator;
