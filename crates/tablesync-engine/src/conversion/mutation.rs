use serde::{Deserialize, Serialize};

use crate::model::{AttributeValue, ModelNodeId};
use crate::view::ViewElementId;

/// View-side mutation produced by a downcast handler.
///
/// Serde uses an internal tag `type` in snake_case so mutation batches can be
/// dumped and replayed as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewMutation {
    AddClass {
        element: ViewElementId,
        class: String,
    },
    RemoveClass {
        element: ViewElementId,
        class: String,
    },
    /// Set an inline style. Shorthands are expanded by the document's style
    /// processor.
    SetStyle {
        element: ViewElementId,
        name: String,
        value: String,
    },
    /// Remove a style and every longhand it covers.
    RemoveStyle {
        element: ViewElementId,
        name: String,
    },
    SetAttribute {
        element: ViewElementId,
        key: String,
        value: String,
    },
    RemoveAttribute {
        element: ViewElementId,
        key: String,
    },
}

impl ViewMutation {
    pub fn element(&self) -> ViewElementId {
        match self {
            ViewMutation::AddClass { element, .. }
            | ViewMutation::RemoveClass { element, .. }
            | ViewMutation::SetStyle { element, .. }
            | ViewMutation::RemoveStyle { element, .. }
            | ViewMutation::SetAttribute { element, .. }
            | ViewMutation::RemoveAttribute { element, .. } => *element,
        }
    }
}

/// Model-side mutation produced by an upcast handler and applied through the
/// [`ModelWriter`](crate::model::ModelWriter).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ModelMutation {
    SetAttribute {
        node: ModelNodeId,
        key: String,
        value: AttributeValue,
    },
    RemoveAttribute {
        node: ModelNodeId,
        key: String,
    },
}

impl ModelMutation {
    pub fn set(node: ModelNodeId, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        ModelMutation::SetAttribute {
            node,
            key: key.into(),
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::css::BoxSides;

    #[test]
    fn view_mutation_uses_snake_case_type_tag() {
        let m = ViewMutation::AddClass {
            element: serde_json::from_str("3").unwrap(),
            class: "ck-custom-width".into(),
        };
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["type"], "add_class");
        assert_eq!(json["element"], 3);
        let back: ViewMutation = serde_json::from_value(json).unwrap();
        assert_eq!(m, back);
    }

    #[test]
    fn model_mutation_keeps_side_maps() {
        let node: ModelNodeId = serde_json::from_str("0").unwrap();
        let m = ModelMutation::set(
            node,
            "tableBorderWidth",
            BoxSides::new("1px", "1px", "2px", "1px"),
        );
        let json = serde_json::to_string(&m).unwrap();
        assert!(json.contains(r#""op":"set_attribute""#));
        let back: ModelMutation = serde_json::from_str(&json).unwrap();
        assert_eq!(m, back);
    }
}
