//! Tag system

pub mod keywords;
pub mod tag_set;

pub use keywords::{match_keyword_tags, KeywordGroup, KEYWORD_GROUPS};
pub use tag_set::{normalize_tag, TagSet, MAX_GENERATED_TAGS};
