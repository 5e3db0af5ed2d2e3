//! slipday track - Choose which people are tracked
//!
//! Positional selectors, `--all` or `--none` replace the tracked set;
//! `--add`/`--remove` adjust it. Everyone stays in the save file either way,
//! so untracking never loses used days or notes.

use std::collections::BTreeSet;

use clap::{ArgGroup, Args};
use colored::Colorize;
use tracing::info;

use super::status;
use crate::app::AppContext;
use crate::cli::output::TableOrder;
use crate::error::Result;
use crate::roster::RosterState;

#[derive(Args, Debug)]
#[command(group(
    ArgGroup::new("selection")
        .required(true)
        .multiple(true)
        .args(["selectors", "all", "none", "add", "remove"])
))]
pub struct TrackArgs {
    /// People to track (key, external id, or full name); replaces the tracked set
    pub selectors: Vec<String>,

    /// Track everyone in the current export
    #[arg(long, conflicts_with_all = ["none", "selectors"])]
    pub all: bool,

    /// Track nobody
    #[arg(long, conflicts_with = "selectors")]
    pub none: bool,

    /// Add people to the current tracked set
    #[arg(long, value_name = "SELECTOR", num_args = 1..)]
    pub add: Vec<String>,

    /// Remove people from the current tracked set
    #[arg(long, value_name = "SELECTOR", num_args = 1..)]
    pub remove: Vec<String>,
}

pub fn run(ctx: &AppContext, args: &TrackArgs) -> Result<()> {
    let mut session = ctx.open_session(None)?;
    let selection = build_selection(&session.state, args)?;
    info!(tracked = selection.len(), "applying tracked selection");
    ctx.apply_selection(&mut session, &selection)?;

    if !ctx.robot_mode {
        println!(
            "{} Tracking {} of {}",
            "✓".green().bold(),
            selection.len(),
            session.state.roster_keys_in_order.len()
        );
        println!();
    }
    status::report(ctx, &session, false, TableOrder::default())
}

/// Resolve the flags into the full set of tracked keys.
pub(crate) fn build_selection(state: &RosterState, args: &TrackArgs) -> Result<BTreeSet<String>> {
    let mut selection = if args.all {
        state.roster_keys_in_order.iter().cloned().collect()
    } else if args.none {
        BTreeSet::new()
    } else if !args.selectors.is_empty() {
        resolve_all(state, &args.selectors)?
    } else {
        state.tracked_keys()
    };

    selection.extend(resolve_all(state, &args.add)?);
    for key in resolve_all(state, &args.remove)? {
        selection.remove(&key);
    }
    Ok(selection)
}

fn resolve_all(state: &RosterState, selectors: &[String]) -> Result<BTreeSet<String>> {
    selectors
        .iter()
        .map(|selector| state.resolve_key(selector, false))
        .collect()
}
