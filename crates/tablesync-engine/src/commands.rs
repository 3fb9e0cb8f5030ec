//! Attribute commands: the only writers of property attributes while editing.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::model::{AttributeValue, ModelDocument, ModelNodeId, ModelWriter};

/// Reads and writes one model attribute on one node type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeCommand {
    attribute_key: String,
    node_type: String,
    default_value: String,
}

impl AttributeCommand {
    pub fn new(
        attribute_key: impl Into<String>,
        node_type: impl Into<String>,
        default_value: impl Into<String>,
    ) -> Self {
        Self {
            attribute_key: attribute_key.into(),
            node_type: node_type.into(),
            default_value: default_value.into(),
        }
    }

    pub fn attribute_key(&self) -> &str {
        &self.attribute_key
    }

    pub fn default_value(&self) -> &str {
        &self.default_value
    }

    /// True when `node` exists and has the command's node type.
    pub fn is_enabled(&self, model: &ModelDocument, node: ModelNodeId) -> bool {
        model
            .node(node)
            .is_some_and(|node| node.name() == self.node_type)
    }

    /// Current value; an absent attribute reads as `None`.
    pub fn value(&self, model: &ModelDocument, node: ModelNodeId) -> Option<AttributeValue> {
        model
            .node(node)
            .and_then(|node| node.attribute(&self.attribute_key))
            .cloned()
    }

    /// Sets the attribute, or removes it when `value` is `None`, empty or the
    /// default.
    pub fn execute(
        &self,
        writer: &mut ModelWriter<'_>,
        node: ModelNodeId,
        value: Option<AttributeValue>,
    ) -> Result<()> {
        match value {
            Some(value) if !value.is_empty() && !value.is_default(&self.default_value) => {
                writer.set_attribute(&self.attribute_key, value, node)
            }
            _ => writer.remove_attribute(&self.attribute_key, node),
        }
    }
}

/// Commands by name.
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: BTreeMap<String, AttributeCommand>,
}

impl CommandRegistry {
    pub fn add(&mut self, name: impl Into<String>, command: AttributeCommand) {
        self.commands.insert(name.into(), command);
    }

    pub fn get(&self, name: &str) -> Result<&AttributeCommand> {
        self.commands
            .get(name)
            .ok_or_else(|| Error::UnknownCommand(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
