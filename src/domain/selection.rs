//! Entry selection for batch operations

use std::collections::BTreeSet;

/// Entry ids picked for a batch export.
///
/// Membership is independent of any entry listing: an id stays selected
/// after its entry disappears from the backing list until cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionManager {
    ids: BTreeSet<String>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the id if absent, remove it if present.
    ///
    /// Returns true when the id is selected afterwards.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn members(&self) -> &BTreeSet<String> {
        &self.ids
    }

    /// Owned copy of the current members, for handing to an export
    pub fn snapshot(&self) -> Vec<String> {
        self.ids.iter().cloned().collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
