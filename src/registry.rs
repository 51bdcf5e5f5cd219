//! Section registry — the fixed catalog of orderable landing-page blocks.
//!
//! The registry is built once at startup and never changes afterwards: no
//! key may be introduced or removed at runtime. Declaration order doubles
//! as the default render order.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::RegistryError;

/// Stable identifier for one landing-page content block. Doubles as the
/// section's URL fragment anchor (`#benefits`), so it must stay a
/// lowercase slug.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionKey(String);

impl SectionKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SectionKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for SectionKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// One orderable content block: a stable key plus its rendered content.
/// The engine orders sections; it never defines their content.
#[derive(Debug, Clone)]
pub struct Section {
    pub key: SectionKey,
    /// Heading shown in the page navigation.
    pub title: String,
    /// Pre-rendered body markup, supplied at config time.
    pub body_html: String,
}

impl Section {
    pub fn new(
        key: impl Into<SectionKey>,
        title: impl Into<String>,
        body_html: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            body_html: body_html.into(),
        }
    }
}

/// Immutable, ordered catalog of sections.
#[derive(Debug, Clone)]
pub struct SectionRegistry {
    sections: Vec<Section>,
}

impl SectionRegistry {
    /// Build a registry, validating that every key is a unique lowercase
    /// slug. The given order becomes the default order.
    pub fn new(sections: Vec<Section>) -> Result<Self, RegistryError> {
        if sections.is_empty() {
            return Err(RegistryError::Empty);
        }

        let slug = Regex::new(r"^[a-z][a-z0-9-]*$").unwrap();
        let mut seen = std::collections::HashSet::new();
        for section in &sections {
            if !slug.is_match(section.key.as_str()) {
                return Err(RegistryError::InvalidKey(section.key.to_string()));
            }
            if !seen.insert(section.key.clone()) {
                return Err(RegistryError::DuplicateKey(section.key.to_string()));
            }
        }

        Ok(Self { sections })
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn contains(&self, key: &SectionKey) -> bool {
        self.sections.iter().any(|s| &s.key == key)
    }

    pub fn get(&self, key: &SectionKey) -> Option<&Section> {
        self.sections.iter().find(|s| &s.key == key)
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Every key, in declaration order.
    pub fn keys(&self) -> Vec<SectionKey> {
        self.sections.iter().map(|s| s.key.clone()).collect()
    }

    /// The registry-declared default order, used whenever no valid reorder
    /// has been applied.
    pub fn default_order(&self) -> Vec<SectionKey> {
        self.keys()
    }

    /// The landing page shipped with the binary: benefits, testimonials,
    /// faq, contact.
    pub fn default_landing() -> Self {
        Self::new(vec![
            Section::new(
                "benefits",
                "Benefits",
                "<h2>Why teams pick us</h2>\
                 <ul>\
                 <li><strong>Smart automation</strong> — guest conversations answered around the clock.</li>\
                 <li><strong>Time back</strong> — check-in coordination handled without staff involvement.</li>\
                 <li><strong>Professional image</strong> — every reply is fast, polite and on-brand.</li>\
                 </ul>",
            ),
            Section::new(
                "testimonials",
                "Testimonials",
                "<h2>What our customers say</h2>\
                 <blockquote>\"Setup took one afternoon and bookings stopped slipping through.\"</blockquote>\
                 <blockquote>\"Our guests get answers at 3am. We get to sleep.\"</blockquote>",
            ),
            Section::new(
                "faq",
                "FAQ",
                "<h2>Frequently asked questions</h2>\
                 <p><strong>Do I need technical knowledge?</strong> No — if you can use a phone, you can use this.</p>\
                 <p><strong>Is there a trial period?</strong> Yes, every plan starts with a free trial.</p>",
            ),
            Section::new(
                "contact",
                "Contact",
                "<h2>Ready to start?</h2>\
                 <p>Book a free demo and see the assistant on your own listings.</p>",
            ),
        ])
        .expect("default registry is valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(key: &str) -> Section {
        Section::new(key, key.to_uppercase(), format!("<p>{key}</p>"))
    }

    #[test]
    fn default_order_matches_declaration() {
        let registry =
            SectionRegistry::new(vec![section("alpha"), section("beta"), section("gamma")])
                .unwrap();
        let order: Vec<String> = registry
            .default_order()
            .iter()
            .map(|k| k.to_string())
            .collect();
        assert_eq!(order, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn rejects_duplicate_keys() {
        let result = SectionRegistry::new(vec![section("alpha"), section("alpha")]);
        assert!(matches!(result, Err(RegistryError::DuplicateKey(_))));
    }

    #[test]
    fn rejects_non_slug_keys() {
        for bad in ["Benefits", "has space", "", "-leading", "1numeric"] {
            let result = SectionRegistry::new(vec![section(bad)]);
            assert!(
                matches!(result, Err(RegistryError::InvalidKey(_))),
                "expected {bad:?} to be rejected"
            );
        }
    }

    #[test]
    fn rejects_empty_registry() {
        assert!(matches!(
            SectionRegistry::new(vec![]),
            Err(RegistryError::Empty)
        ));
    }

    #[test]
    fn default_landing_has_expected_keys() {
        let registry = SectionRegistry::default_landing();
        let keys: Vec<String> = registry.keys().iter().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["benefits", "testimonials", "faq", "contact"]);
    }

    #[test]
    fn lookup_by_key() {
        let registry = SectionRegistry::default_landing();
        assert!(registry.contains(&SectionKey::from("faq")));
        assert!(!registry.contains(&SectionKey::from("pricing")));
        assert_eq!(
            registry.get(&SectionKey::from("contact")).unwrap().title,
            "Contact"
        );
    }
}
