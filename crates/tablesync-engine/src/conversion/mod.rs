//! Conversion plumbing: handler registries for both directions, the mapper,
//! claim tracking and the mutation records handlers return.
//!
//! Handlers never touch the documents directly. An upcast handler inspects a
//! view element and returns [`ModelMutation`]s; a downcast handler inspects a
//! model attribute change and returns [`ViewMutation`]s. The dispatchers apply
//! the returned mutations, so every handler is a plain function of its
//! context.

mod consumable;
mod downcast;
mod mapper;
mod matcher;
mod mutation;
mod structure;
mod upcast;

pub use consumable::{ModelConsumables, ViewConsumables};
pub use downcast::{DowncastContext, DowncastDispatcher, DowncastHandler};
pub use mapper::Mapper;
pub use matcher::{Matcher, MatcherPattern};
pub use mutation::{ModelMutation, ViewMutation};
pub use structure::build_model;
pub use upcast::{UpcastContext, UpcastDispatcher, UpcastHandler};

use crate::diagnostics::Diagnostics;

/// Handler priority. Records are sorted by priority first, `Highest` running
/// first, then by registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Priority {
    Highest,
    High,
    #[default]
    Normal,
    Low,
    Lowest,
}

/// One registered handler.
pub struct HandlerRecord<H> {
    pub event: String,
    pub priority: Priority,
    seq: usize,
    pub handler: H,
}

/// Priority-ordered handler list shared by both dispatchers.
pub(crate) struct HandlerList<H> {
    records: Vec<HandlerRecord<H>>,
    next_seq: usize,
}

impl<H> Default for HandlerList<H> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            next_seq: 0,
        }
    }
}

impl<H> HandlerList<H> {
    pub(crate) fn insert(&mut self, event: String, priority: Priority, handler: H) {
        let seq = self.next_seq;
        self.next_seq += 1;
        let at = self
            .records
            .partition_point(|record| (record.priority, record.seq) <= (priority, seq));
        self.records.insert(
            at,
            HandlerRecord {
                event,
                priority,
                seq,
                handler,
            },
        );
    }

    /// Records listening to any of `events`, in dispatch order.
    pub(crate) fn matching<'a>(
        &'a self,
        events: &'a [&'a str],
    ) -> impl Iterator<Item = &'a HandlerRecord<H>> + 'a {
        self.records
            .iter()
            .filter(move |record| events.contains(&record.event.as_str()))
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }
}

/// Both conversion directions of one editor.
#[derive(Default)]
pub struct Conversion {
    upcast: UpcastDispatcher,
    downcast: DowncastDispatcher,
}

impl Conversion {
    pub fn new(diagnostics: Diagnostics) -> Self {
        Self {
            upcast: UpcastDispatcher::new(diagnostics.clone()),
            downcast: DowncastDispatcher::new(diagnostics),
        }
    }

    pub fn upcast(&self) -> &UpcastDispatcher {
        &self.upcast
    }

    pub fn upcast_mut(&mut self) -> &mut UpcastDispatcher {
        &mut self.upcast
    }

    pub fn downcast(&self) -> &DowncastDispatcher {
        &self.downcast
    }

    pub fn downcast_mut(&mut self) -> &mut DowncastDispatcher {
        &mut self.downcast
    }
}
