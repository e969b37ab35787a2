//! Keyword heuristic used when the classification service is unavailable

/// Keywords that map to a single tag
#[derive(Debug, Clone, Copy)]
pub struct KeywordGroup {
    pub tag: &'static str,
    pub keywords: &'static [&'static str],
}

/// Groups in evaluation order
pub const KEYWORD_GROUPS: &[KeywordGroup] = &[
    KeywordGroup {
        tag: "baby",
        keywords: &["baby", "infant", "newborn"],
    },
    KeywordGroup {
        tag: "sleep",
        keywords: &["sleep", "nap", "bedtime"],
    },
    KeywordGroup {
        tag: "food",
        keywords: &["food", "eat", "feeding"],
    },
    KeywordGroup {
        tag: "happy",
        keywords: &["smile", "laugh", "happy"],
    },
    KeywordGroup {
        tag: "emotional",
        keywords: &["cry", "sad", "tears"],
    },
    KeywordGroup {
        tag: "milestone",
        keywords: &["walk", "crawl", "step"],
    },
    KeywordGroup {
        tag: "health",
        keywords: &["doctor", "sick", "health"],
    },
];

/// Tags whose keywords occur in `content` (case-insensitive substring match).
///
/// Each group contributes at most once, in table order.
pub fn match_keyword_tags(content: &str) -> Vec<&'static str> {
    let haystack = content.to_lowercase();

    KEYWORD_GROUPS
        .iter()
        .filter(|group| group.keywords.iter().any(|kw| haystack.contains(kw)))
        .map(|group| group.tag)
        .collect()
}
