//! Change events recorded by model objects.
//!
//! Mutating operations append an event to the owning object's journal;
//! callers drain the journal when they want to react to changes. Draining
//! is explicit so bulk edits (a resync, an import) produce one batch.

use serde::{Deserialize, Serialize};

/// A single recorded model mutation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModelEvent {
    /// A content was rebound to a (possibly different) enum type.
    EnumTypeChanged {
        old: Option<String>,
        new: String,
    },
    /// A content's attribute references were rebuilt from its type.
    ReferencesRebuilt { reference_count: usize },
    /// A value row was appended or inserted.
    RowAdded { row_index: usize },
    /// A value row was removed.
    RowRemoved { row_index: usize },
    /// A single cell of a row received a new value.
    CellChanged { cell_index: usize },
    /// Two cells of a row exchanged values.
    CellsSwapped { first: usize, second: usize },
    /// A cell of a row was moved to a new position.
    CellMoved { from: usize, to: usize },
}

/// Per-object event buffer. Not persisted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventJournal {
    events: Vec<ModelEvent>,
}

impl EventJournal {
    pub fn record(&mut self, event: ModelEvent) {
        self.events.push(event);
    }

    /// Hand out all recorded events and clear the journal.
    pub fn drain(&mut self) -> Vec<ModelEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}
