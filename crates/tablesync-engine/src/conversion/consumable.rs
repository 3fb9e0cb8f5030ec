//! Claim tracking for conversion. Once a handler consumes a part of a view
//! element (a style, class or attribute) or a model change event, later
//! handlers see it as unavailable and skip it.

use std::collections::{HashMap, HashSet};

use super::MatcherPattern;
use crate::css;
use crate::model::ModelNodeId;
use crate::view::{ViewElement, ViewElementId};

#[derive(Debug, Default)]
struct ConsumedParts {
    styles: HashSet<String>,
    classes: HashSet<String>,
    attributes: HashSet<String>,
}

/// Per-element record of consumed view parts. The element name is only
/// matched, never consumed; structural conversion owns it.
#[derive(Debug, Default)]
pub struct ViewConsumables {
    consumed: HashMap<ViewElementId, ConsumedParts>,
}

impl ViewConsumables {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when every style, class and attribute listed in `pattern` is
    /// present on `element` and not yet consumed. A pattern listing nothing
    /// is never consumable.
    pub fn test(&self, element: &ViewElement, pattern: &MatcherPattern) -> bool {
        if pattern.styles.is_empty() && pattern.classes.is_empty() && pattern.attributes.is_empty()
        {
            return false;
        }
        let parts = self.consumed.get(&element.id());
        let styles_free = pattern.styles.iter().all(|(name, _)| {
            let keys = present_longhands(element, name);
            !keys.is_empty()
                && parts.is_none_or(|parts| keys.iter().all(|key| !parts.styles.contains(key)))
        });
        let classes_free = pattern.classes.iter().all(|class| {
            element.has_class(class) && parts.is_none_or(|parts| !parts.classes.contains(class))
        });
        let attributes_free = pattern.attributes.iter().all(|(key, _)| {
            element.has_attribute(key) && parts.is_none_or(|parts| !parts.attributes.contains(key))
        });
        styles_free && classes_free && attributes_free
    }

    /// Consumes every part of `pattern` if all of them are available.
    /// Returns false, consuming nothing, otherwise.
    pub fn consume(&mut self, element: &ViewElement, pattern: &MatcherPattern) -> bool {
        if !self.test(element, pattern) {
            return false;
        }
        let parts = self.consumed.entry(element.id()).or_default();
        for (name, _) in &pattern.styles {
            parts.styles.extend(present_longhands(element, name));
        }
        parts.classes.extend(pattern.classes.iter().cloned());
        parts
            .attributes
            .extend(pattern.attributes.iter().map(|(key, _)| key.clone()));
        true
    }

    pub fn is_style_consumed(&self, element: ViewElementId, longhand: &str) -> bool {
        self.consumed
            .get(&element)
            .is_some_and(|parts| parts.styles.contains(longhand))
    }
}

/// Stored keys a style name resolves to on `element`.
fn present_longhands(element: &ViewElement, name: &str) -> Vec<String> {
    let mut keys = css::longhands_of(name)
        .into_iter()
        .filter(|longhand| element.style(longhand).is_some())
        .collect::<Vec<_>>();
    if keys.is_empty() && element.style(name).is_some() {
        keys.push(name.to_string());
    }
    keys
}

/// Model change events available to downcast handlers, keyed by node and
/// event name.
#[derive(Debug, Default)]
pub struct ModelConsumables {
    available: HashSet<(ModelNodeId, String)>,
}

impl ModelConsumables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, node: ModelNodeId, event: &str) {
        self.available.insert((node, event.to_string()));
    }

    pub fn test(&self, node: ModelNodeId, event: &str) -> bool {
        self.available.contains(&(node, event.to_string()))
    }

    /// Claims the event. False when it was never added or is already taken.
    pub fn consume(&mut self, node: ModelNodeId, event: &str) -> bool {
        self.available.remove(&(node, event.to_string()))
    }
}
