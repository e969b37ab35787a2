//! Normalized tag sets

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Cap applied to machine-generated tag sets
pub const MAX_GENERATED_TAGS: usize = 5;

/// Allowed shape of a normalized tag
fn tag_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^[a-z0-9 ,'-]{1,24}$").unwrap())
}

/// Normalize a raw tag: trim, drop `#`/comma decoration, lowercase.
///
/// Returns `None` when the result is empty or contains characters outside
/// `[a-z0-9 ,'-]`, or is longer than 24 characters.
pub fn normalize_tag(raw: &str) -> Option<String> {
    let tag = raw
        .trim()
        .trim_matches(|c: char| c == '#' || c == ',' || c.is_whitespace())
        .to_lowercase();

    if tag_regex().is_match(&tag) {
        Some(tag)
    } else {
        None
    }
}

/// Set of normalized tags.
///
/// Order carries no meaning; tags are kept sorted so output is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct TagSet {
    tags: BTreeSet<String>,
}

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag set holding exactly one tag (must already be normalized)
    pub fn single(tag: &str) -> Self {
        let mut set = Self::new();
        set.insert(tag);
        set
    }

    /// Build from user-supplied tags; invalid entries are dropped, no cap.
    pub fn from_explicit<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for tag in raw {
            set.insert(tag.as_ref());
        }
        set
    }

    /// Build from machine-generated tags.
    ///
    /// Keeps the first [`MAX_GENERATED_TAGS`] distinct valid tags in source order.
    pub fn from_generated<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for tag in raw {
            if set.len() == MAX_GENERATED_TAGS {
                break;
            }
            set.insert(tag.as_ref());
        }
        set
    }

    /// Insert a raw tag, returning true if it was valid and new
    pub fn insert(&mut self, raw: &str) -> bool {
        match normalize_tag(raw) {
            Some(tag) => self.tags.insert(tag),
            None => false,
        }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    /// Union of explicit tags and generated tags, without duplicates
    pub fn merge(&self, generated: &TagSet) -> TagSet {
        let mut merged = self.clone();
        merged.tags.extend(generated.tags.iter().cloned());
        merged
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.tags.iter().cloned().collect()
    }
}

impl From<Vec<String>> for TagSet {
    fn from(raw: Vec<String>) -> Self {
        TagSet::from_explicit(raw)
    }
}

impl From<TagSet> for Vec<String> {
    fn from(set: TagSet) -> Self {
        set.tags.into_iter().collect()
    }
}
