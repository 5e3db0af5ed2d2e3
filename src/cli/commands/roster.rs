//! slipday roster - List everyone in the current export
//!
//! Shows the identity key each person resolves to, which is what `track`,
//! `use` and the other commands accept as a selector.

use clap::Args;
use colored::Colorize;
use serde::Serialize;

use super::status::session_warnings;
use crate::app::AppContext;
use crate::cli::output::{emit_robot, robot_ok};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct RosterArgs {
    /// Only list tracked people
    #[arg(long)]
    pub tracked: bool,
}

#[derive(Serialize)]
struct RosterEntry<'a> {
    position: usize,
    key: &'a str,
    name: &'a str,
    external_id: &'a str,
    attendance_confirmed: u32,
    tracked: bool,
    dropped: bool,
}

pub fn run(ctx: &AppContext, args: &RosterArgs) -> Result<()> {
    let session = ctx.open_session(None)?;
    let state = &session.state;

    let entries: Vec<RosterEntry<'_>> = state
        .roster_keys_in_order
        .iter()
        .enumerate()
        .filter_map(|(idx, key)| {
            state.get(key).map(|record| RosterEntry {
                position: idx + 1,
                key,
                name: &record.name,
                external_id: &record.external_id,
                attendance_confirmed: record.attendance_confirmed,
                tracked: record.tracked,
                dropped: record.dropped,
            })
        })
        .filter(|entry| !args.tracked || entry.tracked)
        .collect();

    if ctx.robot_mode {
        return emit_robot(&robot_ok(entries).with_warnings(session_warnings(&session)));
    }

    for warning in session_warnings(&session) {
        println!("{} {warning}", "!".yellow());
    }
    if entries.is_empty() {
        println!("No matching people in {}", state.last_csv_name);
        return Ok(());
    }

    let key_width = entries.iter().map(|e| e.key.chars().count()).max().unwrap_or(0).max(3);
    let name_width = entries.iter().map(|e| e.name.chars().count()).max().unwrap_or(0).max(4);
    println!(
        "{}",
        format!(
            "{:>3}  {:key_width$}  {:name_width$}  {:>8}  Tracked",
            "#", "Key", "Name", "Attended"
        )
        .bold()
    );
    for entry in &entries {
        let flag = match (entry.tracked, entry.dropped) {
            (true, true) => "dropped".dimmed().to_string(),
            (true, false) => "yes".green().to_string(),
            (false, _) => "-".dimmed().to_string(),
        };
        println!(
            "{:>3}  {:key_width$}  {:name_width$}  {:>8}  {flag}",
            entry.position, entry.key, entry.name, entry.attendance_confirmed
        );
    }
    println!();
    println!(
        "{} people, {} tracked",
        state.roster_keys_in_order.len(),
        state.tracked_keys().len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{Parser, Subcommand};

    #[derive(Parser)]
    struct TestCli {
        #[command(subcommand)]
        cmd: TestCommand,
    }

    #[derive(Subcommand)]
    enum TestCommand {
        Roster(RosterArgs),
    }

    #[test]
    fn parse_roster() {
        let parsed = TestCli::parse_from(["test", "roster"]);
        let TestCommand::Roster(args) = parsed.cmd;
        assert!(!args.tracked);

        let parsed = TestCli::parse_from(["test", "roster", "--tracked"]);
        let TestCommand::Roster(args) = parsed.cmd;
        assert!(args.tracked);
    }
}
