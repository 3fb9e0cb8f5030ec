use tracing::{debug, info};

use super::{HandlerList, Mapper, ModelConsumables, Priority, ViewMutation};
use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::model::{AttributeChange, ModelDocument};
use crate::view::ViewDocument;

/// What a downcast handler sees for one attribute change.
pub struct DowncastContext<'a> {
    pub view: &'a ViewDocument,
    pub model: &'a ModelDocument,
    pub mapper: &'a Mapper,
    pub consumables: &'a mut ModelConsumables,
    pub change: &'a AttributeChange,
    /// `attribute:<key>:<nodeType>`
    pub event: &'a str,
}

impl DowncastContext<'_> {
    /// Claims this change event. False when another handler already did.
    pub fn consume(&mut self) -> bool {
        self.consumables.consume(self.change.node, self.event)
    }
}

pub type DowncastHandler = Box<dyn Fn(&mut DowncastContext<'_>) -> Vec<ViewMutation>>;

/// Dispatches `attribute:<key>:<nodeType>` events for journaled model
/// changes.
#[derive(Default)]
pub struct DowncastDispatcher {
    handlers: HandlerList<DowncastHandler>,
    diagnostics: Diagnostics,
}

impl DowncastDispatcher {
    pub fn new(diagnostics: Diagnostics) -> Self {
        Self {
            handlers: HandlerList::default(),
            diagnostics,
        }
    }

    pub fn add<F>(&mut self, event: impl Into<String>, priority: Priority, handler: F)
    where
        F: Fn(&mut DowncastContext<'_>) -> Vec<ViewMutation> + 'static,
    {
        self.handlers.insert(event.into(), priority, Box::new(handler));
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Runs the handlers for each change in order and applies their view
    /// mutations. Returns every mutation applied.
    pub fn convert_changes(
        &self,
        changes: &[AttributeChange],
        model: &ModelDocument,
        view: &mut ViewDocument,
        mapper: &Mapper,
    ) -> Result<Vec<ViewMutation>> {
        let mut consumables = ModelConsumables::new();
        for change in changes {
            consumables.add(change.node, &change.event_name());
        }
        let mut applied = Vec::new();
        for change in changes {
            let event = change.event_name();
            let events = [event.as_str()];
            for record in self.handlers.matching(&events) {
                let mutations = {
                    let mut context = DowncastContext {
                        view: &*view,
                        model,
                        mapper,
                        consumables: &mut consumables,
                        change,
                        event: &event,
                    };
                    (record.handler)(&mut context)
                };
                if self.diagnostics.enabled("downcast") {
                    info!(
                        node = %change.node,
                        event = %event,
                        mutations = mutations.len(),
                        "downcast handler ran"
                    );
                }
                for mutation in &mutations {
                    view.apply(mutation)?;
                }
                applied.extend(mutations);
            }
        }
        debug!(
            changes = changes.len(),
            mutations = applied.len(),
            "downcast finished"
        );
        Ok(applied)
    }
}
