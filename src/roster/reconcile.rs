//! State reconciliation: merge a fresh snapshot with prior user adjustments.
//!
//! The snapshot is the source of truth for roster membership, order and
//! attendance. Only `used`, `notes`, `dropped` and `tracked` survive from the
//! prior state, located through a fallback chain:
//!
//! 1. exact key
//! 2. same external id
//! 3. the single prior record with the same name (ambiguous names match nothing)
//!
//! A prior record is adopted at most once. Exact matches are claimed first, so a
//! fallback can never hand the same adjustments to a second person.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use tracing::{debug, info, warn};

use super::accounting::earned_at_rate;
use super::{PersonMeta, PersonRecord, RosterState, Snapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchKind {
    Key,
    ExternalId,
    Name,
}

struct PriorIndex<'a> {
    records: &'a BTreeMap<String, PersonRecord>,
    by_external_id: BTreeMap<&'a str, &'a PersonRecord>,
    by_name: BTreeMap<&'a str, Vec<&'a PersonRecord>>,
    claimed: HashSet<&'a str>,
}

impl<'a> PriorIndex<'a> {
    fn new(records: &'a BTreeMap<String, PersonRecord>) -> Self {
        let mut by_external_id = BTreeMap::new();
        let mut by_name: BTreeMap<&str, Vec<&PersonRecord>> = BTreeMap::new();
        for record in records.values() {
            let external_id = record.external_id.trim();
            if !external_id.is_empty() {
                by_external_id.entry(external_id).or_insert(record);
            }
            by_name.entry(record.name.as_str()).or_default().push(record);
        }
        Self {
            records,
            by_external_id,
            by_name,
            claimed: HashSet::new(),
        }
    }

    fn claim_exact(&mut self, key: &str) -> Option<&'a PersonRecord> {
        let record = self.records.get(key)?;
        self.claimed.insert(record.key.as_str());
        Some(record)
    }

    fn claim_fallback(&mut self, meta: &PersonMeta) -> Option<(&'a PersonRecord, MatchKind)> {
        let by_id = (!meta.external_id.is_empty())
            .then(|| self.by_external_id.get(meta.external_id.as_str()).copied())
            .flatten()
            .map(|record| (record, MatchKind::ExternalId));

        let found = by_id.or_else(|| {
            if meta.name.is_empty() {
                return None;
            }
            match self.by_name.get(meta.name.as_str()).map(Vec::as_slice) {
                Some([record]) => Some((*record, MatchKind::Name)),
                Some(many) if many.len() > 1 => {
                    warn!(
                        name = %meta.name,
                        candidates = many.len(),
                        "ambiguous name in prior state; starting a fresh record"
                    );
                    None
                }
                _ => None,
            }
        })?;

        if !self.claimed.insert(found.0.key.as_str()) {
            debug!(prior = %found.0.key, "prior record already adopted");
            return None;
        }
        Some(found)
    }
}

/// Build the new authoritative state for `snapshot`.
///
/// With `selection` present every record's `tracked` flag becomes membership in
/// that set; otherwise matched records keep their prior flag and new ones start
/// untracked.
#[must_use]
pub fn reconcile(
    snapshot: &Snapshot,
    prior: Option<&RosterState>,
    selection: Option<&BTreeSet<String>>,
    attendances_per_slip: u32,
) -> RosterState {
    let empty = BTreeMap::new();
    let mut index = PriorIndex::new(prior.map_or(&empty, |state| &state.records));

    let mut matches: BTreeMap<&str, (&PersonRecord, MatchKind)> = BTreeMap::new();
    for key in &snapshot.keys_in_order {
        if let Some(record) = index.claim_exact(key) {
            matches.insert(key, (record, MatchKind::Key));
        }
    }
    for key in &snapshot.keys_in_order {
        if matches.contains_key(key.as_str()) {
            continue;
        }
        let Some(meta) = snapshot.meta.get(key) else {
            continue;
        };
        if let Some(found) = index.claim_fallback(meta) {
            matches.insert(key, found);
        }
    }

    let mut records = BTreeMap::new();
    for key in &snapshot.keys_in_order {
        let (name, external_id) = snapshot
            .meta
            .get(key)
            .map(|meta| (meta.name.clone(), meta.external_id.clone()))
            .unwrap_or_default();
        let mut record = PersonRecord::new(key.clone(), name, external_id);

        match matches.get(key.as_str()) {
            Some(&(prev, kind)) => {
                debug!(%key, prior = %prev.key, ?kind, "carried prior adjustments");
                record.tracked = prev.tracked;
                record.used = prev.used;
                record.notes.clone_from(&prev.notes);
                record.dropped = prev.dropped;
            }
            None => debug!(%key, "no prior record"),
        }

        if let Some(selected) = selection {
            record.tracked = selected.contains(key);
        }

        record.attendance_confirmed = snapshot.confirmed.get(key).copied().unwrap_or(0);
        record.earned = earned_at_rate(record.attendance_confirmed, attendances_per_slip);
        record.used = record.used.min(record.earned);

        records.insert(key.clone(), record);
    }

    info!(
        people = records.len(),
        matched = matches.len(),
        selection = selection.is_some(),
        "reconciled snapshot"
    );

    RosterState {
        roster_keys_in_order: snapshot.keys_in_order.clone(),
        records,
        last_csv_name: snapshot.source_name.clone(),
    }
}
