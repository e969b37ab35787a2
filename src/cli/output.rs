//! Output formatting utilities

use crate::application::{ExportReceipt, ResolutionOutcome, ResolutionTier, TagResolution};
use crate::domain::Entry;

/// Format a tag resolution for display
pub fn format_tag_resolution(resolution: &TagResolution) -> String {
    match resolution.outcome {
        ResolutionOutcome::ContentTooShort => {
            "Content too short for tag suggestions (add media or write at least 10 characters)"
                .to_string()
        }
        ResolutionOutcome::Resolved(tier) => {
            let source = match tier {
                ResolutionTier::Remote => "classifier",
                ResolutionTier::Keyword => "keywords",
                ResolutionTier::Default => "default",
            };

            let mut output = String::new();
            for tag in resolution.tags.iter() {
                output.push_str(&format!("#{}\n", tag));
            }
            output.push_str(&format!("(source: {})", source));
            output
        }
    }
}

/// Format a saved entry for display
pub fn format_entry(entry: &Entry) -> String {
    let tags: Vec<String> = entry.tags.iter().map(|t| format!("#{}", t)).collect();
    let tags = if tags.is_empty() {
        "-".to_string()
    } else {
        tags.join(" ")
    };

    format!(
        "Saved entry {}\n  date:    {}\n  privacy: {}\n  tags:    {}",
        entry.entry_id,
        entry.date_of_memory.format("%Y-%m-%d"),
        entry.privacy,
        tags
    )
}

/// Format a finished export for display
pub fn format_export_receipt(receipt: &ExportReceipt) -> String {
    format!(
        "Exported {} as {} ({} bytes)\n{}",
        receipt.scope.describe(),
        receipt.format,
        receipt.bytes,
        receipt.path.display()
    )
}
