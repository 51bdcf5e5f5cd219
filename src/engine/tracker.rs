//! Visibility tracker — subscription registry over rendered sections.
//!
//! The page reports intersection ratios for its rendered sections; the
//! tracker turns qualifying reports into "entered viewport" events for
//! subscribed keys and maintains the cosmetic visible set the renderer
//! uses for its fade-in class. Entry only — exits are not tracked.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::registry::SectionKey;

/// Handle returned by `subscribe`, releasing a single subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Tracks which rendered sections have an active visibility subscription.
#[derive(Debug)]
pub struct VisibilityTracker {
    /// Minimum fraction of a section's area that must be on screen for a
    /// report to count as an entry.
    min_fraction: f64,
    next_id: u64,
    subscriptions: HashMap<SectionKey, SubscriptionId>,
    visible: HashSet<SectionKey>,
}

impl VisibilityTracker {
    pub fn new(min_fraction: f64) -> Self {
        Self {
            min_fraction,
            next_id: 0,
            subscriptions: HashMap::new(),
            visible: HashSet::new(),
        }
    }

    /// Subscribe to entry events for a rendered section. A fresh
    /// subscription replaces any previous one for the same key (the
    /// backing element changed identity).
    pub fn subscribe(&mut self, key: SectionKey) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.subscriptions.insert(key, id);
        id
    }

    /// Release one subscription. Returns `false` for stale handles.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let key = self
            .subscriptions
            .iter()
            .find(|(_, v)| **v == id)
            .map(|(k, _)| k.clone());
        match key {
            Some(key) => {
                self.subscriptions.remove(&key);
                true
            }
            None => false,
        }
    }

    /// Release every subscription (page teardown, or just before a
    /// re-render replaces the element set).
    pub fn clear(&mut self) {
        self.subscriptions.clear();
    }

    /// Replace the subscription set with one per rendered key. Called
    /// whenever the backing elements change identity, e.g. after a
    /// reorder.
    pub fn resubscribe_all(&mut self, keys: &[SectionKey]) {
        self.clear();
        for key in keys {
            self.subscribe(key.clone());
        }
    }

    /// Process an intersection report. Returns `true` when the report
    /// counts as the section entering the viewport. Reports for keys
    /// without an active subscription are dropped.
    pub fn report(&mut self, key: &SectionKey, visible_fraction: f64) -> bool {
        if !self.subscriptions.contains_key(key) {
            debug!(key = %key, "Visibility report for unsubscribed section; dropping");
            return false;
        }
        if visible_fraction < self.min_fraction {
            return false;
        }
        self.visible.insert(key.clone());
        true
    }

    /// Whether a section carries the cosmetic visible marker.
    pub fn is_visible(&self, key: &SectionKey) -> bool {
        self.visible.contains(key)
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> SectionKey {
        SectionKey::from(s)
    }

    #[test]
    fn entry_requires_threshold() {
        let mut tracker = VisibilityTracker::new(0.1);
        tracker.subscribe(key("benefits"));

        assert!(!tracker.report(&key("benefits"), 0.05));
        assert!(!tracker.is_visible(&key("benefits")));

        assert!(tracker.report(&key("benefits"), 0.1));
        assert!(tracker.is_visible(&key("benefits")));
    }

    #[test]
    fn unsubscribed_keys_are_dropped() {
        let mut tracker = VisibilityTracker::new(0.1);
        assert!(!tracker.report(&key("benefits"), 0.9));
        assert!(!tracker.is_visible(&key("benefits")));
    }

    #[test]
    fn resubscribe_replaces_the_set() {
        let mut tracker = VisibilityTracker::new(0.1);
        tracker.subscribe(key("benefits"));
        tracker.subscribe(key("faq"));
        assert_eq!(tracker.subscription_count(), 2);

        tracker.resubscribe_all(&[key("faq"), key("contact")]);
        assert_eq!(tracker.subscription_count(), 2);
        assert!(!tracker.report(&key("benefits"), 0.5));
        assert!(tracker.report(&key("contact"), 0.5));
    }

    #[test]
    fn visible_marker_survives_resubscribe() {
        let mut tracker = VisibilityTracker::new(0.1);
        tracker.subscribe(key("benefits"));
        tracker.report(&key("benefits"), 0.5);

        tracker.resubscribe_all(&[key("benefits"), key("faq")]);
        assert!(tracker.is_visible(&key("benefits")));
    }

    #[test]
    fn unsubscribe_releases_one_key() {
        let mut tracker = VisibilityTracker::new(0.1);
        let id = tracker.subscribe(key("benefits"));
        assert!(tracker.unsubscribe(id));
        assert!(!tracker.unsubscribe(id));
        assert_eq!(tracker.subscription_count(), 0);
    }

    #[test]
    fn clear_releases_everything() {
        let mut tracker = VisibilityTracker::new(0.1);
        tracker.subscribe(key("a"));
        tracker.subscribe(key("b"));
        tracker.clear();
        assert_eq!(tracker.subscription_count(), 0);
    }

    #[test]
    fn repeat_entries_still_count() {
        // Dedup is the history's job; the tracker fires on any entry.
        let mut tracker = VisibilityTracker::new(0.1);
        tracker.subscribe(key("faq"));
        assert!(tracker.report(&key("faq"), 0.4));
        assert!(tracker.report(&key("faq"), 0.8));
    }
}
