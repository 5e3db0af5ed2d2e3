//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - run() function to execute the command

use clap::Subcommand;
use colored::Colorize;

pub mod consume;
pub mod drop;
pub mod import;
pub mod note;
pub mod refund;
pub mod roster;
pub mod status;
pub mod track;

use crate::app::{AppContext, Session};
use crate::cli::output::{RecordView, emit_robot, robot_ok};
use crate::error::{Result, SlipError};
use crate::roster::PersonRecord;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show tracked slip-day balances
    Status(status::StatusArgs),

    /// List everyone in the current export with their identity keys
    Roster(roster::RosterArgs),

    /// Choose which people are tracked
    Track(track::TrackArgs),

    /// Spend slip days
    #[command(name = "use")]
    Use(consume::UseArgs),

    /// Give slip days back
    Refund(refund::RefundArgs),

    /// Toggle the dropped flag
    Drop(drop::DropArgs),

    /// Set or clear a note
    Note(note::NoteArgs),

    /// Cache a gradebook export in the import directory and load it
    Import(import::ImportArgs),
}

/// Dispatch a command to its handler
pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Status(args) => status::run(ctx, args),
        Commands::Roster(args) => roster::run(ctx, args),
        Commands::Track(args) => track::run(ctx, args),
        Commands::Use(args) => consume::run(ctx, args),
        Commands::Refund(args) => refund::run(ctx, args),
        Commands::Drop(args) => drop::run(ctx, args),
        Commands::Note(args) => note::run(ctx, args),
        Commands::Import(args) => import::run(ctx, args),
    }
}

/// Apply `action` to the tracked record `selector` names, then save before
/// returning. A failed action leaves the save file untouched.
pub(crate) fn mutate_tracked<T>(
    ctx: &AppContext,
    selector: &str,
    action: impl FnOnce(&mut PersonRecord) -> Result<T>,
) -> Result<(Session, String, T)> {
    let mut session = ctx.open_session(None)?;
    let key = session.state.resolve_key(selector, true)?;
    let record = session
        .state
        .get_mut(&key)
        .ok_or_else(|| SlipError::RecordNotFound(key.clone()))?;
    let outcome = action(record)?;
    ctx.save_and_wait(&session.state)?;
    Ok((session, key, outcome))
}

/// Report the record `key` after a change: a one-line summary for humans, the
/// record view for robots.
pub(crate) fn report_record(ctx: &AppContext, session: &Session, key: &str, summary: &str) -> Result<()> {
    let record = session
        .state
        .get(key)
        .ok_or_else(|| SlipError::RecordNotFound(key.to_string()))?;

    if ctx.robot_mode {
        let view = RecordView::new(&session.state, record);
        return emit_robot(&robot_ok(view));
    }

    println!("{} {summary}", "✓".green().bold());
    println!(
        "  {} earned {}, used {}, available {}",
        record.name.bold(),
        record.earned,
        record.used,
        record.available()
    );
    Ok(())
}
