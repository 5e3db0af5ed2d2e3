//! Roster model: per-person slip-day records and the authoritative roster state.
//!
//! A [`RosterState`] is rebuilt from every snapshot by [`reconcile`], mutated in
//! place by accounting commands, and persisted through [`crate::storage`].

pub mod accounting;
pub mod extract;
pub mod identity;
pub mod reconcile;

use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;
use serde::Serialize;

use crate::error::{Result, SlipError};

pub use accounting::{ATTENDANCES_PER_SLIP, earned, earned_at_rate};
pub use extract::{Extractor, PersonMeta, Snapshot};
pub use identity::{normalize_external_id, normalize_name};
pub use reconcile::reconcile;

/// One tracked or untracked individual.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonRecord {
    pub key: String,
    pub name: String,
    /// Empty when the snapshot carried no id for this person.
    pub external_id: String,
    pub tracked: bool,
    pub used: u32,
    pub notes: String,
    pub dropped: bool,
    /// Recomputed from every snapshot.
    pub attendance_confirmed: u32,
    pub earned: u32,
}

impl PersonRecord {
    /// Fresh record with default adjustments.
    #[must_use]
    pub fn new(key: impl Into<String>, name: impl Into<String>, external_id: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            external_id: external_id.into(),
            tracked: false,
            used: 0,
            notes: String::new(),
            dropped: false,
            attendance_confirmed: 0,
            earned: 0,
        }
    }
}

/// Full working/persisted unit: roster order, records by key, last snapshot name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RosterState {
    pub roster_keys_in_order: Vec<String>,
    pub records: BTreeMap<String, PersonRecord>,
    pub last_csv_name: String,
}

impl RosterState {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&PersonRecord> {
        self.records.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut PersonRecord> {
        self.records.get_mut(key)
    }

    /// 1-based roster position of `key`.
    #[must_use]
    pub fn roster_position(&self, key: &str) -> Option<usize> {
        self.roster_keys_in_order
            .iter()
            .position(|k| k == key)
            .map(|idx| idx + 1)
    }

    #[must_use]
    pub fn tracked_keys(&self) -> BTreeSet<String> {
        self.records
            .values()
            .filter(|record| record.tracked)
            .map(|record| record.key.clone())
            .collect()
    }

    /// Tracked records in roster order, dropped ones grouped after active ones.
    #[must_use]
    pub fn tracked_in_display_order(&self) -> Vec<&PersonRecord> {
        let in_order = self
            .roster_keys_in_order
            .iter()
            .filter_map(|key| self.records.get(key))
            .filter(|record| record.tracked);
        let (active, dropped): (Vec<_>, Vec<_>) = in_order.partition(|record| !record.dropped);
        active.into_iter().chain(dropped).collect()
    }

    /// Whether the snapshot's roster differs from the one this state was built from.
    ///
    /// An empty prior roster never counts as a change.
    #[must_use]
    pub fn roster_changed(&self, snapshot: &Snapshot) -> bool {
        !self.roster_keys_in_order.is_empty()
            && self.roster_keys_in_order != snapshot.keys_in_order
    }

    /// Find a record from user input: exact key, then `id:<input>`, then a
    /// unique case-insensitive name.
    pub fn resolve(&self, selector: &str, tracked_only: bool) -> Result<&PersonRecord> {
        let selector = selector.trim();
        let eligible = |record: &&PersonRecord| !tracked_only || record.tracked;

        if let Some(record) = self.records.get(selector).filter(eligible) {
            return Ok(record);
        }
        if let Some(record) = self
            .records
            .get(&identity::id_key(selector))
            .filter(eligible)
        {
            return Ok(record);
        }

        let lowered = selector.to_lowercase();
        let matches: Vec<&PersonRecord> = self
            .records
            .values()
            .filter(eligible)
            .filter(|record| record.name.to_lowercase() == lowered)
            .collect();
        match matches.as_slice() {
            [record] => Ok(*record),
            [] => Err(SlipError::RecordNotFound(format!(
                "no {}record matches '{selector}'",
                if tracked_only { "tracked " } else { "" }
            ))),
            many => Err(SlipError::AmbiguousSelector(format!(
                "'{selector}' matches {} records; use one of: {}",
                many.len(),
                many.iter().map(|r| r.key.as_str()).join(", ")
            ))),
        }
    }

    /// Key of the record `selector` resolves to.
    pub fn resolve_key(&self, selector: &str, tracked_only: bool) -> Result<String> {
        self.resolve(selector, tracked_only).map(|record| record.key.clone())
    }
}
