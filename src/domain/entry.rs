//! Journal entry model

use crate::domain::tags::TagSet;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Who can see an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Privacy {
    /// Visible to the author only
    #[default]
    Private,
    /// Visible to co-parents and invited family
    Shared,
}

impl Privacy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Privacy::Private => "private",
            Privacy::Shared => "shared",
        }
    }
}

impl FromStr for Privacy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "private" => Ok(Privacy::Private),
            "shared" => Ok(Privacy::Shared),
            _ => Err(format!(
                "Invalid privacy: '{}'. Valid values are: private, shared",
                s
            )),
        }
    }
}

impl fmt::Display for Privacy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Channel an entry was captured through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    #[default]
    App,
    Sms,
    Voice,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::App => "app",
            SourceType::Sms => "sms",
            SourceType::Voice => "voice",
        }
    }
}

impl FromStr for SourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "app" => Ok(SourceType::App),
            "sms" => Ok(SourceType::Sms),
            "voice" => Ok(SourceType::Voice),
            _ => Err(format!(
                "Invalid source type: '{}'. Valid values are: app, sms, voice",
                s
            )),
        }
    }
}

/// Broad media family derived from the MIME type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Audio,
    Other,
}

impl MediaKind {
    pub fn from_mime(mime_type: &str) -> Self {
        let top_level = mime_type
            .split('/')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match top_level.as_str() {
            "image" => MediaKind::Image,
            "video" => MediaKind::Video,
            "audio" => MediaKind::Audio,
            _ => MediaKind::Other,
        }
    }
}

/// Reference to an uploaded photo, video or voice note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRef {
    pub url: String,
    pub mime_type: String,
}

impl MediaRef {
    pub fn new(url: impl Into<String>, mime_type: impl Into<String>) -> Self {
        MediaRef {
            url: url.into(),
            mime_type: mime_type.into(),
        }
    }

    pub fn kind(&self) -> MediaKind {
        MediaKind::from_mime(&self.mime_type)
    }
}

/// A stored journal entry as returned by the entry service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub entry_id: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default)]
    pub media_type: Option<String>,
    pub date_of_memory: NaiveDate,
    #[serde(default)]
    pub privacy: Privacy,
    #[serde(default)]
    pub tags: TagSet,
    pub author_id: String,
    #[serde(default)]
    pub source_type: SourceType,
    #[serde(default)]
    pub timestamp_created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub timestamp_updated: Option<DateTime<Utc>>,
}

impl Entry {
    /// Entry as stored from `payload`, for services that only acknowledge with an id
    pub fn from_payload(entry_id: impl Into<String>, payload: &EntryPayload) -> Self {
        Entry {
            entry_id: entry_id.into(),
            content: Some(payload.content.clone()).filter(|c| !c.is_empty()),
            media_url: payload.media_url.clone(),
            media_type: payload.media_type.clone(),
            date_of_memory: payload.date_of_memory,
            privacy: payload.privacy,
            tags: TagSet::from_explicit(&payload.tags),
            author_id: payload.author_id.clone(),
            source_type: payload.source_type,
            timestamp_created: None,
            timestamp_updated: None,
        }
    }

    pub fn media(&self) -> Option<MediaRef> {
        match (&self.media_url, &self.media_type) {
            (Some(url), Some(mime)) => Some(MediaRef::new(url, mime)),
            (Some(url), None) => Some(MediaRef::new(url, "application/octet-stream")),
            _ => None,
        }
    }
}

/// Editable form of an entry, before validation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryDraft {
    pub content: String,
    pub media: Option<MediaRef>,
    pub date_of_memory: Option<NaiveDate>,
    pub privacy: Privacy,
    /// Tags typed by the user
    pub tags: Vec<String>,
    pub author_id: String,
    pub source_type: SourceType,
    /// Ask for fresh generated tags even when explicit tags exist
    pub regenerate_tags: bool,
}

impl EntryDraft {
    pub fn new(content: impl Into<String>, author_id: impl Into<String>) -> Self {
        EntryDraft {
            content: content.into(),
            author_id: author_id.into(),
            ..Default::default()
        }
    }

    pub fn trimmed_content(&self) -> &str {
        self.content.trim()
    }

    pub fn has_content_or_media(&self) -> bool {
        !self.trimmed_content().is_empty() || self.media.is_some()
    }
}

/// Transport form of an entry sent to the entry service
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryPayload {
    pub content: String,
    pub date_of_memory: NaiveDate,
    pub privacy: Privacy,
    pub tags: Vec<String>,
    pub media_url: Option<String>,
    pub media_type: Option<String>,
    pub author_id: String,
    pub source_type: SourceType,
}

impl EntryPayload {
    /// Flatten into form fields; `tags` is repeated once per tag.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("content", self.content.clone()),
            ("date_of_memory", self.date_of_memory.format("%Y-%m-%d").to_string()),
            ("privacy", self.privacy.as_str().to_string()),
            ("author_id", self.author_id.clone()),
            ("source_type", self.source_type.as_str().to_string()),
        ];

        for tag in &self.tags {
            fields.push(("tags", tag.clone()));
        }
        if let Some(url) = &self.media_url {
            fields.push(("media_url", url.clone()));
        }
        if let Some(media_type) = &self.media_type {
            fields.push(("media_type", media_type.clone()));
        }

        fields
    }
}
