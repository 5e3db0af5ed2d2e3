//! Identity keys and roster ordering.
//!
//! Keys are reproducible within one snapshot and comparable across snapshots
//! that gain or lose an external id:
//! - `id:<external id>` when the row carries one
//! - `name:<First Last>#<n>` otherwise, `n` being the 1-based occurrence of that
//!   exact name among id-less rows seen so far

use std::cmp::Ordering;
use std::collections::HashMap;

const ID_PREFIX: &str = "id:";
const NAME_PREFIX: &str = "name:";

#[must_use]
pub fn id_key(external_id: &str) -> String {
    format!("{ID_PREFIX}{external_id}")
}

#[must_use]
pub fn name_key(name: &str, occurrence: usize) -> String {
    format!("{NAME_PREFIX}{name}#{occurrence}")
}

/// Rewrite `"Last, First"` as `"First Last"`; anything else is only trimmed.
#[must_use]
pub fn normalize_name(raw: &str) -> String {
    let trimmed = raw.trim();
    if let Some((last, first)) = trimmed.split_once(',') {
        let (last, first) = (last.trim(), first.trim());
        if !last.is_empty() && !first.is_empty() {
            return format!("{first} {last}");
        }
    }
    trimmed.to_string()
}

/// Clean an external id cell. Placeholders become empty; float artifacts such
/// as `4421.0` lose their `.0`.
#[must_use]
pub fn normalize_external_id(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("nan") {
        return String::new();
    }
    match trimmed.strip_suffix(".0") {
        Some(digits) if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
            digits.to_string()
        }
        _ => trimmed.to_string(),
    }
}

/// Assigns keys row by row, counting name occurrences among id-less rows.
#[derive(Debug, Default)]
pub struct KeyAssigner {
    name_occurrences: HashMap<String, usize>,
}

impl KeyAssigner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Key for the next row with the given normalized name and external id.
    pub fn assign(&mut self, name: &str, external_id: &str) -> String {
        if !external_id.is_empty() {
            return id_key(external_id);
        }
        let count = self.name_occurrences.entry(name.to_string()).or_insert(0);
        *count += 1;
        name_key(name, *count)
    }
}

/// `(last name, remaining names)`, both lowercased. Empty names sort first.
#[must_use]
pub fn last_name_sort_key(name: &str) -> (String, String) {
    let parts: Vec<&str> = name.split_whitespace().collect();
    match parts.split_last() {
        Some((last, rest)) => (last.to_lowercase(), rest.join(" ").to_lowercase()),
        None => (String::new(), String::new()),
    }
}

/// Roster ordering: last name, remaining names, external id, then key.
#[must_use]
pub fn compare_roster_entries(
    (a_key, a_name, a_id): (&str, &str, &str),
    (b_key, b_name, b_id): (&str, &str, &str),
) -> Ordering {
    last_name_sort_key(a_name)
        .cmp(&last_name_sort_key(b_name))
        .then_with(|| a_id.cmp(b_id))
        .then_with(|| a_key.cmp(b_key))
}
