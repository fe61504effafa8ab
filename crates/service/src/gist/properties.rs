//! Named gist properties that can be switched on (PUT) and off (DELETE).

use std::collections::HashMap;

use super::domain::GistRecord;

pub type Toggle = fn(&mut GistRecord);

#[derive(Clone, Copy)]
pub struct PropertyToggle {
    pub on_put: Toggle,
    pub on_delete: Toggle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyAction {
    Put,
    Delete,
}

/// Dispatch table keyed by property name.
#[derive(Clone)]
pub struct PropertyRegistry {
    toggles: HashMap<&'static str, PropertyToggle>,
}

impl PropertyRegistry {
    pub fn empty() -> Self { Self { toggles: HashMap::new() } }

    /// Returns the toggle previously registered under `name`, if any.
    pub fn register(&mut self, name: &'static str, toggle: PropertyToggle) -> Option<PropertyToggle> {
        self.toggles.insert(name, toggle)
    }

    pub fn supports(&self, name: &str) -> bool { self.toggles.contains_key(name) }

    /// Apply the toggle for `name`; false when the property is unsupported.
    pub fn apply(&self, name: &str, action: PropertyAction, gist: &mut GistRecord) -> bool {
        let Some(toggle) = self.toggles.get(name) else { return false };
        match action {
            PropertyAction::Put => (toggle.on_put)(gist),
            PropertyAction::Delete => (toggle.on_delete)(gist),
        }
        true
    }
}

impl Default for PropertyRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register("star", PropertyToggle { on_put: |g| g.starred = true, on_delete: |g| g.starred = false });
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gist::domain::Owner;
    use chrono::Utc;

    fn gist() -> GistRecord {
        let now = Utc::now().into();
        GistRecord {
            id: 1,
            owner: Owner { id: 1, username: "alice".into() },
            description: None,
            content: None,
            starred: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn star_is_registered_by_default() {
        let registry = PropertyRegistry::default();
        assert!(registry.supports("star"));

        let mut g = gist();
        assert!(registry.apply("star", PropertyAction::Put, &mut g));
        assert!(g.starred);
        assert!(registry.apply("star", PropertyAction::Put, &mut g));
        assert!(g.starred);
        assert!(registry.apply("star", PropertyAction::Delete, &mut g));
        assert!(!g.starred);
    }

    #[test]
    fn unknown_property_is_left_alone() {
        let registry = PropertyRegistry::default();
        let mut g = gist();
        let before = g.clone();
        assert!(!registry.supports("pin"));
        assert!(!registry.apply("pin", PropertyAction::Put, &mut g));
        assert_eq!(g, before);
    }

    #[test]
    fn registering_extends_the_table() {
        let mut registry = PropertyRegistry::empty();
        assert!(registry.register("clear", PropertyToggle { on_put: |g| g.content = None, on_delete: |_| {} }).is_none());
        let mut g = GistRecord { content: Some("x".into()), ..gist() };
        assert!(registry.apply("clear", PropertyAction::Put, &mut g));
        assert!(g.content.is_none());
        assert!(!registry.supports("star"));
    }
}
