use std::collections::HashMap;

use crate::model::ModelNodeId;
use crate::view::ViewElementId;

/// Correlates model nodes with view elements.
///
/// A model node maps to exactly one view element. Several view elements may
/// map back to the same model node (a table and its wrapping container).
#[derive(Debug, Clone, Default)]
pub struct Mapper {
    model_to_view: HashMap<ModelNodeId, ViewElementId>,
    view_to_model: HashMap<ViewElementId, ModelNodeId>,
}

impl Mapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind_elements(&mut self, model: ModelNodeId, view: ViewElementId) {
        self.model_to_view.insert(model, view);
        self.view_to_model.insert(view, model);
    }

    /// One-way binding: `view` converts into `model`, but `model` keeps its
    /// primary view element.
    pub fn bind_view_to_model(&mut self, view: ViewElementId, model: ModelNodeId) {
        self.view_to_model.insert(view, model);
    }

    pub fn to_view_element(&self, model: ModelNodeId) -> Option<ViewElementId> {
        self.model_to_view.get(&model).copied()
    }

    pub fn to_model_element(&self, view: ViewElementId) -> Option<ModelNodeId> {
        self.view_to_model.get(&view).copied()
    }

    pub fn clear(&mut self) {
        self.model_to_view.clear();
        self.view_to_model.clear();
    }
}
