//! Order validator — structural check on a proposed section order.

use std::collections::HashSet;

use crate::registry::SectionKey;

/// Check a candidate ordering against the registry key set.
///
/// Valid iff the candidate has the registry's length and, viewed as a set,
/// equals the registry key set — which jointly rules out wrong length,
/// duplicates, omissions and foreign keys. Returns the normalized order on
/// success.
pub fn validate_order(
    candidate: &[String],
    registry_keys: &[SectionKey],
) -> Option<Vec<SectionKey>> {
    if candidate.len() != registry_keys.len() {
        return None;
    }

    let candidate_set: HashSet<&str> = candidate.iter().map(|s| s.as_str()).collect();
    if candidate_set.len() != candidate.len() {
        return None;
    }

    let registry_set: HashSet<&str> = registry_keys.iter().map(|k| k.as_str()).collect();
    if candidate_set != registry_set {
        return None;
    }

    Some(candidate.iter().map(|s| SectionKey::from(s.as_str())).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(names: &[&str]) -> Vec<SectionKey> {
        names.iter().map(|n| SectionKey::from(*n)).collect()
    }

    fn candidate(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn accepts_a_permutation() {
        let registry = keys(&["a", "b", "c", "d"]);
        let order = validate_order(&candidate(&["b", "a", "d", "c"]), &registry).unwrap();
        let order: Vec<&str> = order.iter().map(|k| k.as_str()).collect();
        assert_eq!(order, vec!["b", "a", "d", "c"]);
    }

    #[test]
    fn rejects_wrong_length() {
        let registry = keys(&["a", "b", "c", "d"]);
        assert!(validate_order(&candidate(&["a", "b", "c"]), &registry).is_none());
        assert!(validate_order(&candidate(&["a", "b", "c", "d", "a"]), &registry).is_none());
        assert!(validate_order(&candidate(&[]), &registry).is_none());
    }

    #[test]
    fn rejects_duplicates() {
        let registry = keys(&["a", "b", "c", "d"]);
        assert!(validate_order(&candidate(&["a", "a", "b", "c"]), &registry).is_none());
    }

    #[test]
    fn rejects_foreign_keys() {
        let registry = keys(&["a", "b", "c", "d"]);
        assert!(validate_order(&candidate(&["a", "b", "c", "x"]), &registry).is_none());
    }

    #[test]
    fn identity_order_is_valid() {
        let registry = keys(&["a", "b"]);
        assert!(validate_order(&candidate(&["a", "b"]), &registry).is_some());
    }
}
