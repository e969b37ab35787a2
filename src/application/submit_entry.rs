//! Entry submission use case

use crate::application::resolve_tags::TagResolver;
use crate::domain::{Entry, EntryDraft, EntryPayload, TagSet};
use crate::error::{HatchlingError, Result, ValidationError};
use crate::infrastructure::EntryStore;
use chrono::{Local, NaiveDate};
use std::sync::Arc;
use tracing::{info, warn};

/// Validates drafts, fills in tags and hands them to the entry store
pub struct SubmissionCoordinator {
    store: Arc<dyn EntryStore>,
    resolver: TagResolver,
}

impl SubmissionCoordinator {
    pub fn new(store: Arc<dyn EntryStore>, resolver: TagResolver) -> Self {
        SubmissionCoordinator { store, resolver }
    }

    pub fn resolver(&self) -> &TagResolver {
        &self.resolver
    }

    /// Check a draft against `today`, returning its date of memory
    pub fn validate(
        draft: &EntryDraft,
        today: NaiveDate,
    ) -> std::result::Result<NaiveDate, ValidationError> {
        if !draft.has_content_or_media() {
            return Err(ValidationError::ContentRequired);
        }

        match draft.date_of_memory {
            Some(date) if date <= today => Ok(date),
            _ => Err(ValidationError::InvalidDate),
        }
    }

    /// Validate and package a draft without sending it.
    ///
    /// Generated tags are only requested when the draft has no explicit tags
    /// or asks for regeneration, and the input is long enough to tag.
    pub async fn prepare(&self, draft: &EntryDraft, today: NaiveDate) -> Result<EntryPayload> {
        let date_of_memory = Self::validate(draft, today)?;

        let explicit = TagSet::from_explicit(&draft.tags);
        let media = draft.media.as_ref();
        let wants_generated = explicit.is_empty() || draft.regenerate_tags;

        let tags = if wants_generated && TagResolver::meets_precondition(&draft.content, media) {
            let resolution = self.resolver.resolve(&draft.content, media).await;
            explicit.merge(&resolution.tags)
        } else {
            explicit
        };

        Ok(EntryPayload {
            content: draft.trimmed_content().to_string(),
            date_of_memory,
            privacy: draft.privacy,
            tags: tags.to_vec(),
            media_url: draft.media.as_ref().map(|m| m.url.clone()),
            media_type: draft.media.as_ref().map(|m| m.mime_type.clone()),
            author_id: draft.author_id.clone(),
            source_type: draft.source_type,
        })
    }

    /// Create (no `existing_id`) or overwrite an entry.
    ///
    /// Store failures are returned as-is; nothing is retried.
    pub async fn submit(&self, draft: &EntryDraft, existing_id: Option<&str>) -> Result<Entry> {
        self.submit_on(draft, existing_id, Local::now().date_naive())
            .await
    }

    /// [`submit`](Self::submit) with an explicit notion of today
    pub async fn submit_on(
        &self,
        draft: &EntryDraft,
        existing_id: Option<&str>,
        today: NaiveDate,
    ) -> Result<Entry> {
        let payload = self.prepare(draft, today).await?;

        let result = match existing_id {
            Some(id) => {
                info!(entry_id = id, tags = payload.tags.len(), "updating entry");
                self.store.update(id, &payload).await
            }
            None => {
                info!(tags = payload.tags.len(), "creating entry");
                self.store.create(&payload).await
            }
        };

        result
            .inspect(|entry| info!(entry_id = %entry.entry_id, "entry saved"))
            .map_err(|failure| {
                warn!(error = %failure, "entry save failed");
                HatchlingError::Persistence(failure)
            })
    }
}
