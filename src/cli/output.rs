use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use console::style;
use serde::Serialize;

use crate::error::Result;
use crate::roster::identity::last_name_sort_key;
use crate::roster::{PersonRecord, RosterState};

#[derive(Serialize)]
pub struct RobotResponse<T> {
    pub status: RobotStatus,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub data: T,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RobotStatus {
    Ok,
    Error { code: String, message: String },
}

impl<T> RobotResponse<T> {
    #[must_use]
    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }
}

pub fn robot_ok<T: Serialize>(data: T) -> RobotResponse<T> {
    RobotResponse {
        status: RobotStatus::Ok,
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        data,
        warnings: Vec::new(),
    }
}

pub fn robot_error(
    code: impl Into<String>,
    message: impl Into<String>,
) -> RobotResponse<serde_json::Value> {
    RobotResponse {
        status: RobotStatus::Error {
            code: code.into(),
            message: message.into(),
        },
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        data: serde_json::Value::Null,
        warnings: Vec::new(),
    }
}

pub fn emit_robot<T: Serialize>(response: &RobotResponse<T>) -> Result<()> {
    emit_json(response)
}

pub fn emit_json<T: Serialize>(value: &T) -> Result<()> {
    let payload = serde_json::to_string_pretty(value)?;
    println!("{payload}");
    Ok(())
}

/// Record as shown to users and robots, with the computed `available`.
#[derive(Debug, Serialize)]
pub struct RecordView<'a> {
    pub position: Option<usize>,
    #[serde(flatten)]
    pub record: &'a PersonRecord,
    pub available: u32,
}

impl<'a> RecordView<'a> {
    #[must_use]
    pub fn new(state: &RosterState, record: &'a PersonRecord) -> Self {
        Self {
            position: state.roster_position(&record.key),
            available: record.available(),
            record,
        }
    }
}

pub struct HumanLayout {
    lines: Vec<String>,
    key_width: usize,
}

impl Default for HumanLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl HumanLayout {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            lines: Vec::new(),
            key_width: 18,
        }
    }

    pub fn title(&mut self, text: &str) -> &mut Self {
        self.lines.push(style(text).bold().to_string());
        self.lines.push(String::new());
        self
    }

    pub fn kv(&mut self, key: &str, value: &str) -> &mut Self {
        let key_style = style(key).dim().to_string();
        self.lines.push(format!(
            "{key_style:width$} {value}",
            width = self.key_width
        ));
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.lines.push(String::new());
        self
    }

    pub fn push_line(&mut self, line: impl Into<String>) -> &mut Self {
        self.lines.push(line.into());
        self
    }

    #[must_use]
    pub fn build(self) -> String {
        self.lines.join("\n")
    }
}

pub fn emit_human(layout: HumanLayout) {
    println!("{}", layout.build());
}

const NOTE_WIDTH: usize = 40;

/// Notes longer than the column are cut and marked with an ellipsis.
#[must_use]
pub fn truncate_note(notes: &str) -> String {
    if notes.chars().count() > NOTE_WIDTH + 1 {
        let head: String = notes.chars().take(NOTE_WIDTH).collect();
        format!("{head}…")
    } else {
        notes.to_string()
    }
}

/// Column the tracked table is ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SortColumn {
    /// Roster position
    #[default]
    Position,
    /// Last name, then the remaining names
    Name,
    /// External id
    Id,
    Attended,
    Earned,
    Used,
    Available,
    Notes,
}

impl SortColumn {
    fn compare(self, state: &RosterState, a: &PersonRecord, b: &PersonRecord) -> Ordering {
        match self {
            Self::Position => state
                .roster_position(&a.key)
                .cmp(&state.roster_position(&b.key)),
            Self::Name => last_name_sort_key(&a.name).cmp(&last_name_sort_key(&b.name)),
            Self::Id => a.external_id.to_lowercase().cmp(&b.external_id.to_lowercase()),
            Self::Attended => a.attendance_confirmed.cmp(&b.attendance_confirmed),
            Self::Earned => a.earned.cmp(&b.earned),
            Self::Used => a.used.cmp(&b.used),
            Self::Available => a.available().cmp(&b.available()),
            Self::Notes => a.notes.to_lowercase().cmp(&b.notes.to_lowercase()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableOrder {
    pub column: SortColumn,
    pub descending: bool,
}

impl TableOrder {
    #[must_use]
    pub const fn new(column: SortColumn, descending: bool) -> Self {
        Self { column, descending }
    }
}

/// Tracked records ordered by `order`. Active and dropped records are sorted
/// separately and dropped ones always come last; ties keep roster order.
#[must_use]
pub fn sorted_tracked(state: &RosterState, order: TableOrder) -> Vec<&PersonRecord> {
    let (mut active, mut dropped): (Vec<_>, Vec<_>) = state
        .tracked_in_display_order()
        .into_iter()
        .partition(|record| !record.dropped);
    for group in [&mut active, &mut dropped] {
        group.sort_by(|a, b| {
            let ordering = order.column.compare(state, a, b);
            if order.descending {
                ordering.reverse()
            } else {
                ordering
            }
        });
    }
    active.extend(dropped);
    active
}

/// Tracked table: active records, then a divider and the dropped ones.
#[must_use]
pub fn slip_table(state: &RosterState, order: TableOrder) -> String {
    let rows = sorted_tracked(state, order);
    let name_width = rows
        .iter()
        .map(|r| r.name.chars().count())
        .max()
        .unwrap_or(0)
        .max(4);
    let id_width = rows
        .iter()
        .map(|r| r.external_id.len())
        .max()
        .unwrap_or(0)
        .max(2);

    let mut lines = vec![style(format!(
        "{:>3}  {:name_width$}  {:id_width$}  {:>8}  {:>6}  {:>4}  {:>9}  Notes",
        "#", "Name", "ID", "Attended", "Earned", "Used", "Available"
    ))
    .bold()
    .to_string()];

    let mut divider_done = false;
    for record in rows {
        if record.dropped && !divider_done {
            lines.push(style("──────── Dropped ────────").dim().to_string());
            divider_done = true;
        }
        let position = state
            .roster_position(&record.key)
            .map(|p| p.to_string())
            .unwrap_or_default();
        let line = format!(
            "{position:>3}  {:name_width$}  {:id_width$}  {:>8}  {:>6}  {:>4}  {:>9}  {}",
            record.name,
            record.external_id,
            record.attendance_confirmed,
            record.earned,
            record.used,
            record.available(),
            truncate_note(&record.notes),
        );
        lines.push(if record.dropped {
            style(line).dim().to_string()
        } else {
            line
        });
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_notes_are_truncated() {
        let long = "x".repeat(60);
        let shown = truncate_note(&long);
        assert_eq!(shown.chars().count(), NOTE_WIDTH + 1);
        assert!(shown.ends_with('…'));
        assert_eq!(truncate_note("short"), "short");
        // exactly one over the width still fits
        assert_eq!(truncate_note(&"y".repeat(41)), "y".repeat(41));
    }

    #[test]
    fn table_places_dropped_after_divider() {
        let mut state = RosterState::default();
        for (key, name, dropped) in [("id:1", "Ann Able", true), ("id:2", "Ben Baker", false)] {
            let mut record = PersonRecord::new(key, name, key.trim_start_matches("id:"));
            record.tracked = true;
            record.dropped = dropped;
            state.roster_keys_in_order.push(key.to_string());
            state.records.insert(key.to_string(), record);
        }
        let table = slip_table(&state, TableOrder::default());
        let ben = table.find("Ben Baker").unwrap();
        let divider = table.find("Dropped").unwrap();
        let ann = table.find("Ann Able").unwrap();
        assert!(ben < divider && divider < ann);
    }

    fn sortable_state() -> RosterState {
        let mut state = RosterState::default();
        let people = [
            ("id:1", "Ann Zed", 2, 0, false),
            ("id:2", "Bea Young", 0, 0, false),
            ("id:3", "Cal Able", 3, 1, false),
            ("id:4", "Dee Baker", 5, 0, true),
            ("id:5", "Eli Cole", 1, 0, true),
        ];
        for (key, name, earned, used, dropped) in people {
            let record = PersonRecord {
                tracked: true,
                earned,
                used,
                dropped,
                ..PersonRecord::new(key, name, key.trim_start_matches("id:"))
            };
            state.roster_keys_in_order.push(key.to_string());
            state.records.insert(key.to_string(), record);
        }
        state
    }

    fn order_of(state: &RosterState, column: SortColumn, descending: bool) -> Vec<&str> {
        sorted_tracked(state, TableOrder::new(column, descending))
            .iter()
            .map(|r| r.key.as_str())
            .collect()
    }

    #[test]
    fn default_order_is_roster_with_dropped_last() {
        let state = sortable_state();
        assert_eq!(
            order_of(&state, SortColumn::Position, false),
            vec!["id:1", "id:2", "id:3", "id:4", "id:5"]
        );
        assert_eq!(
            order_of(&state, SortColumn::Position, true),
            vec!["id:3", "id:2", "id:1", "id:5", "id:4"]
        );
    }

    #[test]
    fn numeric_sort_keeps_dropped_group_last() {
        let state = sortable_state();
        // available: id:1=2, id:2=0, id:3=2, id:4=5, id:5=1; ties keep roster order
        assert_eq!(
            order_of(&state, SortColumn::Available, false),
            vec!["id:2", "id:1", "id:3", "id:5", "id:4"]
        );
        assert_eq!(
            order_of(&state, SortColumn::Available, true),
            vec!["id:1", "id:3", "id:2", "id:4", "id:5"]
        );
    }

    #[test]
    fn name_sort_uses_last_name() {
        let state = sortable_state();
        assert_eq!(
            order_of(&state, SortColumn::Name, false),
            vec!["id:3", "id:2", "id:1", "id:4", "id:5"]
        );
        assert_eq!(
            order_of(&state, SortColumn::Name, true),
            vec!["id:1", "id:2", "id:3", "id:5", "id:4"]
        );
    }

    #[test]
    fn table_follows_requested_order() {
        let state = sortable_state();
        let table = slip_table(&state, TableOrder::new(SortColumn::Name, false));
        let cal = table.find("Cal Able").unwrap();
        let ann = table.find("Ann Zed").unwrap();
        let divider = table.find("Dropped").unwrap();
        assert!(cal < ann && ann < divider);
    }

    #[test]
    fn record_view_flattens_record() {
        let mut state = RosterState::default();
        let mut record = PersonRecord::new("id:1", "Ann Able", "1");
        record.earned = 3;
        record.used = 1;
        state.roster_keys_in_order.push("id:1".to_string());
        state.records.insert("id:1".to_string(), record);
        let view = RecordView::new(&state, &state.records["id:1"]);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["key"], "id:1");
        assert_eq!(json["available"], 2);
        assert_eq!(json["position"], 1);
    }
}
