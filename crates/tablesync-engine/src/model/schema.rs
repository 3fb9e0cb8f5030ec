use std::collections::{BTreeSet, HashMap};

/// Which attributes each model node type accepts.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    allowed: HashMap<String, BTreeSet<String>>,
}

impl Schema {
    /// Allows `attributes` on `node_type`. Extending twice is harmless.
    pub fn extend<I, S>(&mut self, node_type: &str, attributes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed
            .entry(node_type.to_string())
            .or_default()
            .extend(attributes.into_iter().map(Into::into));
    }

    pub fn check_attribute(&self, node_type: &str, key: &str) -> bool {
        self.allowed
            .get(node_type)
            .is_some_and(|attributes| attributes.contains(key))
    }

    pub fn allowed_attributes(&self, node_type: &str) -> impl Iterator<Item = &str> {
        self.allowed
            .get(node_type)
            .into_iter()
            .flat_map(|attributes| attributes.iter().map(String::as_str))
    }
}
