//! Domain layer - Business logic and domain models

pub mod entry;
pub mod export;
pub mod selection;
pub mod tags;

pub use entry::{Entry, EntryDraft, EntryPayload, MediaKind, MediaRef, Privacy, SourceType};
pub use export::{
    export_filename, ExportFilters, ExportFormat, ExportRequest, ExportScope, ExportTimeouts,
};
pub use selection::SelectionManager;
pub use tags::TagSet;
