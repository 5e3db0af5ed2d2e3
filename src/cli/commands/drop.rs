//! slipday drop - Toggle the dropped flag
//!
//! Dropped records stay tracked but are listed after everyone else and
//! cannot spend slip days.

use clap::Args;

use super::{mutate_tracked, report_record};
use crate::app::AppContext;
use crate::error::Result;

#[derive(Args, Debug)]
pub struct DropArgs {
    /// Tracked person: key, external id, or full name
    pub selector: String,

    /// Set the flag instead of toggling it
    #[arg(long, conflicts_with = "undo")]
    pub set: bool,

    /// Clear the flag instead of toggling it
    #[arg(long)]
    pub undo: bool,
}

impl DropArgs {
    /// Explicit target value, or `None` to toggle.
    const fn target(&self) -> Option<bool> {
        match (self.set, self.undo) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

pub fn run(ctx: &AppContext, args: &DropArgs) -> Result<()> {
    let (session, key, dropped) = mutate_tracked(ctx, &args.selector, |record| {
        match args.target() {
            Some(value) => record.set_dropped(value),
            None => {
                record.toggle_dropped();
            }
        }
        Ok(record.dropped)
    })?;
    let summary = if dropped { "Marked dropped" } else { "Marked active" };
    report_record(ctx, &session, &key, summary)
}
