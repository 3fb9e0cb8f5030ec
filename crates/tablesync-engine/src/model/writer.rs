use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{AttributeValue, ModelDocument, ModelNodeId};
use crate::conversion::ModelMutation;
use crate::error::{Error, Result};

/// Net change of one attribute on one node within a change block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeChange {
    pub node: ModelNodeId,
    pub node_type: String,
    pub key: String,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_value: Option<AttributeValue>,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_value: Option<AttributeValue>,
}

impl AttributeChange {
    /// Dispatcher event name: `attribute:<key>:<nodeType>`.
    pub fn event_name(&self) -> String {
        format!("attribute:{}:{}", self.key, self.node_type)
    }
}

/// Scoped writer handed out by [`ModelDocument::change`]. Every write is
/// checked against the schema and journaled so the block can be rolled back.
pub struct ModelWriter<'a> {
    document: &'a mut ModelDocument,
    journal: Vec<AttributeChange>,
}

impl<'a> ModelWriter<'a> {
    pub(super) fn new(document: &'a mut ModelDocument) -> Self {
        Self {
            document,
            journal: Vec::new(),
        }
    }

    /// Read access to the document as modified so far.
    pub fn document(&self) -> &ModelDocument {
        self.document
    }

    pub fn set_attribute(
        &mut self,
        key: &str,
        value: impl Into<AttributeValue>,
        node: ModelNodeId,
    ) -> Result<()> {
        let value = value.into();
        let node_type = self.document.get(node)?.name().to_string();
        if !self.document.schema().check_attribute(&node_type, key) {
            return Err(Error::AttributeNotAllowed {
                node_type,
                key: key.to_string(),
            });
        }
        let target = self.document.get_mut(node)?;
        let old = target.attributes.insert(key.to_string(), value.clone());
        self.record(node, node_type, key, old, Some(value));
        Ok(())
    }

    /// Removing an absent attribute is a no-op.
    pub fn remove_attribute(&mut self, key: &str, node: ModelNodeId) -> Result<()> {
        let target = self.document.get_mut(node)?;
        let node_type = target.name().to_string();
        if let Some(old) = target.attributes.remove(key) {
            self.record(node, node_type, key, Some(old), None);
        }
        Ok(())
    }

    pub fn apply(&mut self, mutation: ModelMutation) -> Result<()> {
        match mutation {
            ModelMutation::SetAttribute { node, key, value } => {
                self.set_attribute(&key, value, node)
            }
            ModelMutation::RemoveAttribute { node, key } => self.remove_attribute(&key, node),
        }
    }

    fn record(
        &mut self,
        node: ModelNodeId,
        node_type: String,
        key: &str,
        old_value: Option<AttributeValue>,
        new_value: Option<AttributeValue>,
    ) {
        if let Some(pos) = self
            .journal
            .iter()
            .position(|change| change.node == node && change.key == key)
        {
            self.journal[pos].new_value = new_value;
            if self.journal[pos].old_value == self.journal[pos].new_value {
                self.journal.remove(pos);
            }
            return;
        }
        if old_value == new_value {
            return;
        }
        self.journal.push(AttributeChange {
            node,
            node_type,
            key: key.to_string(),
            old_value,
            new_value,
        });
    }

    pub(super) fn finish(self) -> Vec<AttributeChange> {
        self.journal
    }

    pub(super) fn rollback(self) {
        debug!(changes = self.journal.len(), "rolling back model change");
        for change in self.journal.into_iter().rev() {
            if let Ok(node) = self.document.get_mut(change.node) {
                match change.old_value {
                    Some(old) => {
                        node.attributes.insert(change.key, old);
                    }
                    None => {
                        node.attributes.remove(&change.key);
                    }
                }
            }
        }
    }
}
