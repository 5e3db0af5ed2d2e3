//! Attendance extraction from gradebook CSV exports.
//!
//! Turns a snapshot table into ordered identity keys, a confirmed-attendance
//! count per key, and display metadata per key.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::identity::{KeyAssigner, compare_roster_entries, normalize_external_id, normalize_name};
use crate::config::SnapshotConfig;
use crate::error::{Result, SlipError};

/// Attendance headers look like `1-12 (7448946)`.
static ATTENDANCE_COLUMN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d{1,2})-(\d{1,2})\s*\(").expect("attendance column pattern is valid")
});

pub const DEFAULT_IDENTITY_COLUMN: &str = "Student";
pub const DEFAULT_ID_COLUMN: &str = "SIS User ID";
pub const DEFAULT_CONFIRMED_VALUES: &[&str] = &["1", "1.0", "1.00", "1.000", "1.0000", "EX"];
pub const DEFAULT_PLACEHOLDER_ROWS: &[&str] = &["points possible"];

/// Display metadata for one snapshot entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonMeta {
    pub name: String,
    pub external_id: String,
}

/// Everything reconciliation needs from one parsed export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// File name of the export, recorded as `last_csv_name`.
    pub source_name: String,
    pub keys_in_order: Vec<String>,
    pub confirmed: BTreeMap<String, u32>,
    pub meta: BTreeMap<String, PersonMeta>,
    pub attendance_columns: Vec<String>,
}

impl Snapshot {
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys_in_order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys_in_order.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Extractor {
    identity_column: String,
    id_column: String,
    confirmed_values: BTreeSet<String>,
    placeholder_rows: BTreeSet<String>,
}

impl Default for Extractor {
    fn default() -> Self {
        Self {
            identity_column: DEFAULT_IDENTITY_COLUMN.to_string(),
            id_column: DEFAULT_ID_COLUMN.to_string(),
            confirmed_values: DEFAULT_CONFIRMED_VALUES.iter().map(ToString::to_string).collect(),
            placeholder_rows: DEFAULT_PLACEHOLDER_ROWS.iter().map(ToString::to_string).collect(),
        }
    }
}

impl Extractor {
    #[must_use]
    pub fn from_config(config: &SnapshotConfig) -> Self {
        Self {
            identity_column: config.identity_column.clone(),
            id_column: config.id_column.clone(),
            confirmed_values: config.confirmed_values.iter().cloned().collect(),
            placeholder_rows: config
                .placeholder_rows
                .iter()
                .map(|row| row.trim().to_lowercase())
                .collect(),
        }
    }

    /// Replace the confirmed-value set. Matching stays exact and case-sensitive.
    #[must_use]
    pub fn with_confirmed_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.confirmed_values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn extract_path(&self, path: &Path) -> Result<Snapshot> {
        let file = std::fs::File::open(path)?;
        let source_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let snapshot = self.extract_reader(file, &source_name)?;
        info!(
            path = %path.display(),
            people = snapshot.len(),
            columns = snapshot.attendance_columns.len(),
            "extracted snapshot"
        );
        Ok(snapshot)
    }

    pub fn extract_reader<R: Read>(&self, reader: R, source_name: &str) -> Result<Snapshot> {
        let mut csv = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = csv
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();

        let identity_idx = headers
            .iter()
            .position(|h| *h == self.identity_column)
            .ok_or_else(|| {
                SlipError::MissingIdentityColumn(format!(
                    "{source_name} has no '{}' column; is this a gradebook export?",
                    self.identity_column
                ))
            })?;
        let id_idx = headers.iter().position(|h| *h == self.id_column);

        let attendance: Vec<usize> = headers
            .iter()
            .enumerate()
            .filter(|(_, h)| ATTENDANCE_COLUMN.is_match(h))
            .map(|(idx, _)| idx)
            .collect();
        if attendance.is_empty() {
            return Err(SlipError::NoAttendanceColumns(format!(
                "{source_name} has no headers like 'MM-DD (#####)'"
            )));
        }

        let mut assigner = KeyAssigner::new();
        let mut snapshot = Snapshot {
            source_name: source_name.to_string(),
            attendance_columns: attendance.iter().map(|&idx| headers[idx].clone()).collect(),
            ..Snapshot::default()
        };

        for row in csv.records() {
            let row = row?;
            let raw_name = row.get(identity_idx).unwrap_or_default();
            if !self.is_person_row(raw_name) {
                continue;
            }
            let name = normalize_name(raw_name);
            let external_id = id_idx
                .and_then(|idx| row.get(idx))
                .map(normalize_external_id)
                .unwrap_or_default();

            let key = assigner.assign(&name, &external_id);
            if snapshot.meta.contains_key(&key) {
                warn!(%key, %name, "duplicate identity in snapshot; keeping first row");
                continue;
            }

            let count = attendance
                .iter()
                .filter_map(|&idx| row.get(idx))
                .filter(|cell| self.confirmed_values.contains(cell.trim()))
                .count();
            let count = u32::try_from(count).unwrap_or(u32::MAX);
            debug!(%key, count, "counted attendance");

            snapshot.keys_in_order.push(key.clone());
            snapshot.confirmed.insert(key.clone(), count);
            snapshot.meta.insert(key, PersonMeta { name, external_id });
        }

        let meta = &snapshot.meta;
        snapshot.keys_in_order.sort_by(|a, b| {
            compare_roster_entries(
                (a.as_str(), meta[a].name.as_str(), meta[a].external_id.as_str()),
                (b.as_str(), meta[b].name.as_str(), meta[b].external_id.as_str()),
            )
        });

        Ok(snapshot)
    }

    fn is_person_row(&self, raw_name: &str) -> bool {
        let trimmed = raw_name.trim();
        if trimmed.is_empty() {
            return false;
        }
        let lowered = trimmed.to_lowercase();
        lowered != "nan" && !self.placeholder_rows.contains(&lowered)
    }
}
