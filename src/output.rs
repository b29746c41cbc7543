//! Output Store
//!
//! Holds the current text of the three generated fields. The key set is fixed by the
//! `OutputState` struct itself; only values change, and only through [`OutputStore::merge`].

use crate::types::{Field, RequestMode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field values extracted from a reply. May cover any subset of the three fields.
pub type FieldPatch = BTreeMap<Field, String>;

/// Text of every generated field. Values may be empty; none is ever missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputState {
    listing: String,
    caption: String,
    subject: String,
}

impl OutputState {
    pub fn new(
        listing: impl Into<String>,
        caption: impl Into<String>,
        subject: impl Into<String>,
    ) -> Self {
        Self {
            listing: listing.into(),
            caption: caption.into(),
            subject: subject.into(),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Listing => &self.listing,
            Field::Caption => &self.caption,
            Field::Subject => &self.subject,
        }
    }

    /// Fields in display order with their current values.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        Field::ALL.into_iter().map(move |field| (field, self.get(field)))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().all(|(_, value)| value.is_empty())
    }

    fn slot_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Listing => &mut self.listing,
            Field::Caption => &mut self.caption,
            Field::Subject => &mut self.subject,
        }
    }
}

/// Owner of the live output state.
#[derive(Debug, Default)]
pub struct OutputStore {
    state: OutputState,
}

impl OutputStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a patch into `current` under the rules of `mode`.
    ///
    /// `Full` replaces each field present in the patch and keeps the prior value of
    /// anything absent. `Targeted(f)` replaces `f` only, ignoring every other key.
    pub fn merge(current: &OutputState, patch: &FieldPatch, mode: RequestMode) -> OutputState {
        let mut next = current.clone();
        match mode {
            RequestMode::Full => {
                for (field, value) in patch {
                    *next.slot_mut(*field) = value.clone();
                }
            }
            RequestMode::Targeted(target) => {
                if let Some(value) = patch.get(&target) {
                    *next.slot_mut(target) = value.clone();
                }
            }
        }
        next
    }

    /// Replace the live state with the merge of `patch`.
    pub fn apply(&mut self, patch: &FieldPatch, mode: RequestMode) {
        self.state = Self::merge(&self.state, patch, mode);
    }

    pub fn state(&self) -> &OutputState {
        &self.state
    }

    pub fn snapshot(&self) -> OutputState {
        self.state.clone()
    }
}
