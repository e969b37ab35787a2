//! Tag resolution use case
//!
//! Tags come from an ordered list of strategies. Each strategy may decline by
//! returning `None`; the first non-empty proposal wins. The last strategy
//! always answers, so content that is long enough never ends up untagged.
//!
//! Tiers, in order:
//! 1. remote classification service (optional, bounded by a timeout)
//! 2. keyword heuristic over the content
//! 3. the default `memory` tag

use crate::domain::tags::{match_keyword_tags, TagSet};
use crate::domain::MediaRef;
use crate::infrastructure::TagClassifier;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Minimum trimmed content length (in characters) for tagging without media
pub const MIN_CONTENT_CHARS: usize = 10;

/// Tag used when nothing else matched
pub const DEFAULT_TAG: &str = "memory";

/// Default bound on a classification round trip
pub const DEFAULT_CLASSIFY_TIMEOUT: Duration = Duration::from_secs(10);

/// Strategy level that produced a tag set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionTier {
    Remote,
    Keyword,
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// Content too short and no media: tagging was not attempted
    ContentTooShort,
    Resolved(ResolutionTier),
}

/// Result of a resolution; the caller owns it and merges it as needed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagResolution {
    pub tags: TagSet,
    pub outcome: ResolutionOutcome,
}

impl TagResolution {
    pub fn tier(&self) -> Option<ResolutionTier> {
        match self.outcome {
            ResolutionOutcome::ContentTooShort => None,
            ResolutionOutcome::Resolved(tier) => Some(tier),
        }
    }
}

/// One level of the fallback chain
#[async_trait]
pub trait TagStrategy: Send + Sync {
    fn tier(&self) -> ResolutionTier;

    /// Propose tags, or `None` to defer to the next strategy
    async fn propose(&self, content: &str, media: Option<&MediaRef>) -> Option<TagSet>;
}

/// Asks the classification service. Every failure turns into `None`.
pub struct RemoteStrategy {
    classifier: Arc<dyn TagClassifier>,
    timeout: Duration,
}

impl RemoteStrategy {
    pub fn new(classifier: Arc<dyn TagClassifier>, timeout: Duration) -> Self {
        RemoteStrategy {
            classifier,
            timeout,
        }
    }
}

#[async_trait]
impl TagStrategy for RemoteStrategy {
    fn tier(&self) -> ResolutionTier {
        ResolutionTier::Remote
    }

    async fn propose(&self, content: &str, media: Option<&MediaRef>) -> Option<TagSet> {
        let call = self.classifier.classify(content, media);

        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(raw)) => {
                let tags = TagSet::from_generated(&raw);
                if tags.is_empty() {
                    debug!(returned = raw.len(), "classifier returned no usable tags");
                    None
                } else {
                    Some(tags)
                }
            }
            Ok(Err(e)) => {
                warn!(error = %format!("{e:#}"), "tag classification failed, falling back");
                None
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.timeout.as_millis() as u64,
                    "tag classification timed out, falling back"
                );
                None
            }
        }
    }
}

/// Scans the content against the fixed keyword table
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordStrategy;

#[async_trait]
impl TagStrategy for KeywordStrategy {
    fn tier(&self) -> ResolutionTier {
        ResolutionTier::Keyword
    }

    async fn propose(&self, content: &str, _media: Option<&MediaRef>) -> Option<TagSet> {
        let tags = TagSet::from_generated(match_keyword_tags(content));
        (!tags.is_empty()).then_some(tags)
    }
}

/// Always answers with the default tag
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultStrategy;

#[async_trait]
impl TagStrategy for DefaultStrategy {
    fn tier(&self) -> ResolutionTier {
        ResolutionTier::Default
    }

    async fn propose(&self, _content: &str, _media: Option<&MediaRef>) -> Option<TagSet> {
        Some(TagSet::single(DEFAULT_TAG))
    }
}

/// Runs the strategy chain
pub struct TagResolver {
    strategies: Vec<Box<dyn TagStrategy>>,
}

impl TagResolver {
    /// Standard chain; the remote tier is left out when no classifier is configured.
    pub fn new(classifier: Option<Arc<dyn TagClassifier>>, timeout: Duration) -> Self {
        let mut strategies: Vec<Box<dyn TagStrategy>> = Vec::new();
        if let Some(classifier) = classifier {
            strategies.push(Box::new(RemoteStrategy::new(classifier, timeout)));
        }
        strategies.push(Box::new(KeywordStrategy));
        strategies.push(Box::new(DefaultStrategy));
        TagResolver { strategies }
    }

    /// Keyword and default tiers only
    pub fn offline() -> Self {
        Self::new(None, DEFAULT_CLASSIFY_TIMEOUT)
    }

    /// Custom chain. A default strategy is appended if the chain does not end with one.
    pub fn with_strategies(mut strategies: Vec<Box<dyn TagStrategy>>) -> Self {
        let ends_with_default = strategies
            .last()
            .is_some_and(|s| s.tier() == ResolutionTier::Default);
        if !ends_with_default {
            strategies.push(Box::new(DefaultStrategy));
        }
        TagResolver { strategies }
    }

    pub fn tiers(&self) -> Vec<ResolutionTier> {
        self.strategies.iter().map(|s| s.tier()).collect()
    }

    /// Whether tagging is attempted for this input at all
    pub fn meets_precondition(content: &str, media: Option<&MediaRef>) -> bool {
        media.is_some() || content.trim().chars().count() >= MIN_CONTENT_CHARS
    }

    /// Resolve tags for free text and optional media.
    ///
    /// Never fails. Returns an empty set only with `ContentTooShort`.
    pub async fn resolve(&self, content: &str, media: Option<&MediaRef>) -> TagResolution {
        if !Self::meets_precondition(content, media) {
            debug!("content too short for tagging");
            return TagResolution {
                tags: TagSet::new(),
                outcome: ResolutionOutcome::ContentTooShort,
            };
        }

        let content = content.trim();
        for strategy in &self.strategies {
            if let Some(tags) = strategy.propose(content, media).await {
                if !tags.is_empty() {
                    debug!(tier = ?strategy.tier(), count = tags.len(), "tags resolved");
                    return TagResolution {
                        tags,
                        outcome: ResolutionOutcome::Resolved(strategy.tier()),
                    };
                }
            }
        }

        TagResolution {
            tags: TagSet::single(DEFAULT_TAG),
            outcome: ResolutionOutcome::Resolved(ResolutionTier::Default),
        }
    }
}
