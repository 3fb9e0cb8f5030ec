//! Semantic document model: typed nodes carrying named attributes.

mod schema;
mod writer;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::css::StyleValue;
use crate::error::{Error, Result};

pub use schema::Schema;
pub use writer::{AttributeChange, ModelWriter};

/// Model attribute values share the style value shape: a string or a
/// per-side map.
pub type AttributeValue = StyleValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelNodeId(usize);

impl ModelNodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ModelNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m{}", self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelNode {
    id: ModelNodeId,
    name: String,
    #[serde(default)]
    attributes: BTreeMap<String, AttributeValue>,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    parent: Option<ModelNodeId>,
    #[serde(default)]
    children: Vec<ModelNodeId>,
}

impl ModelNode {
    pub fn id(&self) -> ModelNodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<ModelNodeId> {
        self.parent
    }

    pub fn children(&self) -> &[ModelNodeId] {
        &self.children
    }

    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    pub fn has_attribute(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[derive(Debug, Clone, Default)]
pub struct ModelDocument {
    nodes: Vec<ModelNode>,
    roots: Vec<ModelNodeId>,
    schema: Schema,
}

impl ModelDocument {
    pub fn new(schema: Schema) -> Self {
        Self {
            nodes: Vec::new(),
            roots: Vec::new(),
            schema,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn schema_mut(&mut self) -> &mut Schema {
        &mut self.schema
    }

    /// Drops every node, keeping the schema.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.roots.clear();
    }

    /// Inserts a structural node. Attributes are only written through
    /// [`ModelDocument::change`].
    pub fn create_node(
        &mut self,
        name: impl Into<String>,
        parent: Option<ModelNodeId>,
    ) -> Result<ModelNodeId> {
        let id = ModelNodeId(self.nodes.len());
        match parent {
            Some(parent) => self.get_mut(parent)?.children.push(id),
            None => self.roots.push(id),
        }
        self.nodes.push(ModelNode {
            id,
            name: name.into(),
            attributes: BTreeMap::new(),
            parent,
            children: Vec::new(),
        });
        Ok(id)
    }

    pub fn node(&self, id: ModelNodeId) -> Option<&ModelNode> {
        self.nodes.get(id.0)
    }

    pub fn get(&self, id: ModelNodeId) -> Result<&ModelNode> {
        self.node(id).ok_or(Error::UnknownModelNode(id))
    }

    fn get_mut(&mut self, id: ModelNodeId) -> Result<&mut ModelNode> {
        self.nodes.get_mut(id.0).ok_or(Error::UnknownModelNode(id))
    }

    pub fn roots(&self) -> &[ModelNodeId] {
        &self.roots
    }

    pub fn nodes(&self) -> impl Iterator<Item = &ModelNode> {
        self.nodes.iter()
    }

    pub fn nodes_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = ModelNodeId> + 'a {
        self.nodes
            .iter()
            .filter(move |node| node.name == name)
            .map(|node| node.id)
    }

    /// Runs `f` with a writer. On success the net attribute changes are
    /// returned; on error every write made by `f` is undone and the error is
    /// passed through.
    pub fn change<T>(
        &mut self,
        f: impl FnOnce(&mut ModelWriter<'_>) -> Result<T>,
    ) -> Result<(T, Vec<AttributeChange>)> {
        let mut writer = ModelWriter::new(self);
        match f(&mut writer) {
            Ok(value) => Ok((value, writer.finish())),
            Err(err) => {
                writer.rollback();
                Err(err)
            }
        }
    }

    /// JSON snapshot of the tree: `{ name, attributes, children }` per node.
    pub fn to_json(&self) -> Value {
        fn node_json(doc: &ModelDocument, id: ModelNodeId) -> Value {
            let Some(node) = doc.node(id) else {
                return Value::Null;
            };
            let children = node
                .children
                .iter()
                .map(|child| node_json(doc, *child))
                .collect::<Vec<_>>();
            json!({
                "id": node.id,
                "name": node.name,
                "attributes": node.attributes,
                "children": children,
            })
        }
        Value::Array(self.roots.iter().map(|root| node_json(self, *root)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::css::BoxSides;

    fn table_doc() -> (ModelDocument, ModelNodeId) {
        let mut schema = Schema::default();
        schema.extend("table", ["tableWidth", "tableBorderWidth"]);
        let mut doc = ModelDocument::new(schema);
        let table = doc.create_node("table", None).unwrap();
        (doc, table)
    }

    #[test]
    fn change_journals_net_attribute_changes() {
        let (mut doc, table) = table_doc();
        let ((), changes) = doc
            .change(|writer| {
                writer.set_attribute("tableWidth", "50%", table)?;
                writer.set_attribute("tableWidth", "60%", table)?;
                writer.set_attribute("tableBorderWidth", "1px", table)?;
                writer.remove_attribute("tableBorderWidth", table)
            })
            .expect("change succeeds");

        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].event_name(), "attribute:tableWidth:table");
        assert_eq!(changes[0].old_value, None);
        assert_eq!(changes[0].new_value, Some(AttributeValue::from("60%")));
        assert_eq!(
            doc.get(table).unwrap().attribute("tableWidth"),
            Some(&AttributeValue::from("60%"))
        );
    }

    #[test]
    fn schema_violation_rolls_back_the_block() {
        let (mut doc, table) = table_doc();
        let err = doc
            .change(|writer| {
                writer.set_attribute("tableWidth", "50%", table)?;
                writer.set_attribute("tableCellWidth", "10px", table)
            })
            .expect_err("attribute is not allowed");

        assert!(matches!(err, Error::AttributeNotAllowed { .. }));
        assert!(!doc.get(table).unwrap().has_attribute("tableWidth"));
    }

    #[test]
    fn setting_the_same_value_is_not_a_change() {
        let (mut doc, table) = table_doc();
        doc.change(|writer| writer.set_attribute("tableWidth", "50%", table))
            .unwrap();
        let ((), changes) = doc
            .change(|writer| writer.set_attribute("tableWidth", "50%", table))
            .unwrap();
        assert!(changes.is_empty());
    }

    #[test]
    fn json_snapshot_contains_side_maps() {
        let (mut doc, table) = table_doc();
        doc.change(|writer| {
            writer.set_attribute(
                "tableBorderWidth",
                BoxSides::new("1px", "1px", "2px", "1px"),
                table,
            )
        })
        .unwrap();
        let snapshot = doc.to_json();
        assert_eq!(snapshot[0]["name"], "table");
        assert_eq!(snapshot[0]["attributes"]["tableBorderWidth"]["bottom"], "2px");
    }
}
