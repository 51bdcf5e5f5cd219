//! Navigation history — ordered, de-duplicated record of viewed sections.
//!
//! Created empty per page view, written only by the owning session, never
//! persisted across page loads.

use crate::registry::SectionKey;

/// Delimiter used when serializing the history for the ranking
/// collaborator.
const HISTORY_DELIMITER: &str = ", ";

/// Ordered sequence of section keys in first-seen order, each key at most
/// once.
#[derive(Debug, Clone, Default)]
pub struct NavigationHistory {
    entries: Vec<SectionKey>,
}

impl NavigationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a section entry. Returns `true` if the key was newly
    /// appended; repeat entries for an already-recorded key are no-ops.
    pub fn record(&mut self, key: SectionKey) -> bool {
        if self.entries.contains(&key) {
            return false;
        }
        self.entries.push(key);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[SectionKey] {
        &self.entries
    }

    /// Arrival-order history as the delimited string the ranking
    /// collaborator expects.
    pub fn serialized(&self) -> String {
        self.entries
            .iter()
            .map(|k| k.as_str())
            .collect::<Vec<_>>()
            .join(HISTORY_DELIMITER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_arrival_order() {
        let mut history = NavigationHistory::new();
        assert!(history.record(SectionKey::from("faq")));
        assert!(history.record(SectionKey::from("benefits")));
        assert_eq!(history.serialized(), "faq, benefits");
    }

    #[test]
    fn repeat_entries_are_noops() {
        let mut history = NavigationHistory::new();
        assert!(history.record(SectionKey::from("benefits")));
        assert!(!history.record(SectionKey::from("benefits")));
        assert!(history.record(SectionKey::from("contact")));
        assert!(!history.record(SectionKey::from("benefits")));
        assert_eq!(history.len(), 2);
        assert_eq!(history.serialized(), "benefits, contact");
    }

    #[test]
    fn each_key_kept_at_first_position() {
        let mut history = NavigationHistory::new();
        for key in ["a", "b", "a", "c", "b", "a"] {
            history.record(SectionKey::from(key));
        }
        let entries: Vec<&str> = history.entries().iter().map(|k| k.as_str()).collect();
        assert_eq!(entries, vec!["a", "b", "c"]);
    }

    #[test]
    fn empty_history_serializes_empty() {
        let history = NavigationHistory::new();
        assert!(history.is_empty());
        assert_eq!(history.serialized(), "");
    }
}
