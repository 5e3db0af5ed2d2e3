//! slipday status - Show tracked slip-day balances
//!
//! Read-only: the save file is only written on a first run.

use clap::Args;
use colored::Colorize;
use serde::Serialize;

use crate::app::{AppContext, Session};
use crate::cli::output::{
    HumanLayout, RecordView, SortColumn, TableOrder, emit_human, emit_robot, robot_ok, slip_table,
    sorted_tracked,
};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Hide dropped records
    #[arg(long)]
    pub active_only: bool,

    /// Column to order the table by
    #[arg(long, value_enum, default_value_t = SortColumn::Position)]
    pub sort: SortColumn,

    /// Sort in descending order
    #[arg(long)]
    pub desc: bool,
}

#[derive(Serialize)]
struct StatusReport<'a> {
    snapshot: &'a str,
    save_file: String,
    attendance_columns: usize,
    roster_size: usize,
    first_run: bool,
    roster_changed: bool,
    tracked: Vec<RecordView<'a>>,
}

pub fn run(ctx: &AppContext, args: &StatusArgs) -> Result<()> {
    let session = ctx.open_session(None)?;
    report(
        ctx,
        &session,
        args.active_only,
        TableOrder::new(args.sort, args.desc),
    )
}

/// Print the session's tracked table (shared with `import` and `track`).
pub(crate) fn report(
    ctx: &AppContext,
    session: &Session,
    active_only: bool,
    order: TableOrder,
) -> Result<()> {
    let state = if active_only {
        let mut filtered = session.state.clone();
        filtered.records.retain(|_, record| !record.dropped);
        filtered
    } else {
        session.state.clone()
    };

    if ctx.robot_mode {
        let tracked = sorted_tracked(&state, order)
            .into_iter()
            .map(|record| RecordView::new(&state, record))
            .collect();
        let data = StatusReport {
            snapshot: &state.last_csv_name,
            save_file: ctx.save_path.display().to_string(),
            attendance_columns: session.snapshot.attendance_columns.len(),
            roster_size: state.roster_keys_in_order.len(),
            first_run: session.first_run,
            roster_changed: session.roster_changed,
            tracked,
        };
        return emit_robot(&robot_ok(data).with_warnings(session_warnings(session)));
    }

    let tracked_count = state.tracked_keys().len();
    let mut layout = HumanLayout::new();
    layout
        .title("Slip days")
        .kv("Snapshot", &session.snapshot_path.display().to_string())
        .kv("Save file", &ctx.save_path.display().to_string())
        .kv(
            "Tracked",
            &format!("{tracked_count} of {}", state.roster_keys_in_order.len()),
        )
        .kv(
            "Attendance days",
            &session.snapshot.attendance_columns.len().to_string(),
        )
        .blank();

    for warning in session_warnings(session) {
        layout.push_line(format!("{} {warning}", "!".yellow()));
    }
    if tracked_count == 0 {
        layout.push_line("Nobody is tracked. Run `slipday track --all` or `slipday track <name>...`.");
    } else {
        layout.push_line(slip_table(&state, order));
    }
    emit_human(layout);
    Ok(())
}

pub(crate) fn session_warnings(session: &Session) -> Vec<String> {
    let mut warnings = Vec::new();
    if session.first_run {
        warnings.push("No save file yet; started a fresh one with nobody tracked.".to_string());
    }
    if session.roster_changed {
        warnings.push(
            "Roster changed since the last save. Run `slipday track` to review who is tracked."
                .to_string(),
        );
    }
    warnings
}
