//! JSON save file holding the roster state between runs.
//!
//! ```json
//! {
//!   "roster_keys_in_order": ["id:4421", "name:Jane Doe#1"],
//!   "last_csv_name": "2024-02-01_gradebook.csv",
//!   "students": { "id:4421": { "key": "id:4421", "name": "...", ... } }
//! }
//! ```
//!
//! Older files keyed `students` by display name and stored no `key` field;
//! those keys are recovered on load.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::error::{Result, SlipError};
use crate::roster::identity::{id_key, name_key, normalize_external_id};
use crate::roster::{PersonRecord, RosterState};

#[derive(Debug, Serialize, Deserialize)]
struct SaveFile {
    #[serde(default)]
    roster_keys_in_order: Vec<String>,
    #[serde(default)]
    last_csv_name: String,
    #[serde(default)]
    students: BTreeMap<String, StoredRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredRecord {
    #[serde(default)]
    key: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, alias = "student_id")]
    external_id: String,
    #[serde(default = "default_tracked")]
    tracked: bool,
    #[serde(default)]
    used: u32,
    #[serde(default)]
    notes: String,
    #[serde(default)]
    dropped: bool,
    #[serde(default)]
    attendance_confirmed: u32,
    #[serde(default)]
    earned: u32,
}

// Files written before the selection step tracked everyone.
const fn default_tracked() -> bool {
    true
}

impl From<&PersonRecord> for StoredRecord {
    fn from(record: &PersonRecord) -> Self {
        Self {
            key: record.key.clone(),
            name: Some(record.name.clone()),
            external_id: record.external_id.clone(),
            tracked: record.tracked,
            used: record.used,
            notes: record.notes.clone(),
            dropped: record.dropped,
            attendance_confirmed: record.attendance_confirmed,
            earned: record.earned,
        }
    }
}

impl StoredRecord {
    fn into_record(self, map_key: &str) -> PersonRecord {
        let external_id = normalize_external_id(&self.external_id);
        let key = if !self.key.trim().is_empty() {
            self.key
        } else if !external_id.is_empty() {
            id_key(&external_id)
        } else {
            name_key(map_key, 1)
        };
        PersonRecord {
            name: self.name.unwrap_or_else(|| map_key.to_string()),
            external_id,
            tracked: self.tracked,
            used: self.used,
            notes: self.notes,
            dropped: self.dropped,
            attendance_confirmed: self.attendance_confirmed,
            earned: self.earned,
            key,
        }
    }
}

/// Load the saved state. A missing file is `Ok(None)`; an unreadable one is
/// [`SlipError::CorruptSaveFile`].
pub fn load(path: &Path) -> Result<Option<RosterState>> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(SlipError::Io(err)),
    };
    let file: SaveFile = serde_json::from_slice(&bytes).map_err(|err| SlipError::CorruptSaveFile {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;

    let mut records = BTreeMap::new();
    for (map_key, stored) in file.students {
        let record = stored.into_record(&map_key);
        if records.contains_key(&record.key) {
            warn!(key = %record.key, entry = %map_key, "duplicate key in save file; keeping first");
            continue;
        }
        records.insert(record.key.clone(), record);
    }

    info!(path = %path.display(), records = records.len(), "loaded save file");
    Ok(Some(RosterState {
        roster_keys_in_order: file.roster_keys_in_order,
        records,
        last_csv_name: file.last_csv_name,
    }))
}

/// Write `state` atomically: serialize fully, write a sibling temp file, sync,
/// then rename over `path`.
pub fn save(path: &Path, state: &RosterState) -> Result<()> {
    let file = SaveFile {
        roster_keys_in_order: state.roster_keys_in_order.clone(),
        last_csv_name: state.last_csv_name.clone(),
        students: state
            .records
            .iter()
            .map(|(key, record)| (key.clone(), StoredRecord::from(record)))
            .collect(),
    };
    let mut json = serde_json::to_vec_pretty(&file)?;
    json.push(b'\n');

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(&json)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|err| SlipError::Io(err.error))?;

    info!(path = %path.display(), records = state.records.len(), "saved state");
    Ok(())
}
