//! Curation notifications.
//!
//! Commands never call out to listeners themselves. They record what
//! happened as [`CurationEvent`]s in their [`crate::commands::CmdResult`], and
//! the API facade hands those to every subscribed [`EventSink`] once the
//! command returns: events in emission order, sinks in subscription order.

use crate::model::{ItemId, Module, ModuleChange};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CurationEvent {
    Curated {
        original: ItemId,
        curated: ItemId,
    },
    /// `original` is `None` when a record whose link had already dangled
    /// was removed.
    Uncurated {
        original: Option<ItemId>,
        curated: ItemId,
    },
    ModulesChanged {
        curated: ItemId,
        changes: Vec<(Module, ModuleChange)>,
    },
}

pub trait EventSink {
    fn notify(&mut self, event: &CurationEvent);
}

impl<F: FnMut(&CurationEvent)> EventSink for F {
    fn notify(&mut self, event: &CurationEvent) {
        self(event)
    }
}

#[derive(Default)]
pub struct EventBus {
    sinks: Vec<Box<dyn EventSink>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    pub fn dispatch(&mut self, events: &[CurationEvent]) {
        for event in events {
            for sink in self.sinks.iter_mut() {
                sink.notify(event);
            }
        }
    }
}
