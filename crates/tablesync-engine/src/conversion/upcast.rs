use tracing::{debug, info};

use super::{HandlerList, Mapper, MatcherPattern, ModelMutation, Priority, ViewConsumables};
use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::model::{AttributeChange, ModelDocument, ModelNode, ModelNodeId};
use crate::view::{ViewDocument, ViewElement};

/// What an upcast handler sees while one view element is converted.
pub struct UpcastContext<'a> {
    pub view: &'a ViewDocument,
    /// Model state including writes of earlier handlers in the same pass.
    pub model: &'a ModelDocument,
    pub mapper: &'a Mapper,
    pub consumables: &'a mut ViewConsumables,
    pub item: &'a ViewElement,
    /// Model node the element converted into, if structural conversion
    /// produced one.
    pub model_node: Option<ModelNodeId>,
}

impl UpcastContext<'_> {
    pub fn model_element(&self) -> Option<&ModelNode> {
        self.model_node.and_then(|id| self.model.node(id))
    }

    pub fn test(&self, pattern: &MatcherPattern) -> bool {
        self.consumables.test(self.item, pattern)
    }

    pub fn consume(&mut self, pattern: &MatcherPattern) -> bool {
        self.consumables.consume(self.item, pattern)
    }
}

pub type UpcastHandler = Box<dyn Fn(&mut UpcastContext<'_>) -> Vec<ModelMutation>>;

/// Dispatches `element:<name>` events over a view tree.
///
/// Handlers registered for plain `element` run for every element, merged with
/// the name-specific ones by priority.
#[derive(Default)]
pub struct UpcastDispatcher {
    handlers: HandlerList<UpcastHandler>,
    diagnostics: Diagnostics,
}

impl UpcastDispatcher {
    pub fn new(diagnostics: Diagnostics) -> Self {
        Self {
            handlers: HandlerList::default(),
            diagnostics,
        }
    }

    pub fn add<F>(&mut self, event: impl Into<String>, priority: Priority, handler: F)
    where
        F: Fn(&mut UpcastContext<'_>) -> Vec<ModelMutation> + 'static,
    {
        self.handlers.insert(event.into(), priority, Box::new(handler));
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Fires `element:<name>` for every view element in post-order inside a
    /// single model change. A handler error (a schema violation) rolls the
    /// whole pass back.
    pub fn convert(
        &self,
        view: &ViewDocument,
        model: &mut ModelDocument,
        mapper: &Mapper,
    ) -> Result<Vec<AttributeChange>> {
        let mut consumables = ViewConsumables::new();
        let ((), changes) = model.change(|writer| {
            for id in view.post_order() {
                let item = view.get(id)?;
                let named = format!("element:{}", item.name());
                let events = ["element", named.as_str()];
                for record in self.handlers.matching(&events) {
                    let mutations = {
                        let mut context = UpcastContext {
                            view,
                            model: writer.document(),
                            mapper,
                            consumables: &mut consumables,
                            item,
                            model_node: mapper.to_model_element(id),
                        };
                        (record.handler)(&mut context)
                    };
                    if self.diagnostics.enabled("upcast") && !mutations.is_empty() {
                        info!(
                            element = %id,
                            name = item.name(),
                            event = %record.event,
                            mutations = mutations.len(),
                            "upcast handler produced mutations"
                        );
                    }
                    for mutation in mutations {
                        writer.apply(mutation)?;
                    }
                }
            }
            Ok(())
        })?;
        debug!(changes = changes.len(), "upcast finished");
        Ok(changes)
    }
}
