//! slipday import - Cache a gradebook export and load it
//!
//! The file replaces whatever export was cached in the import directory, so
//! later runs pick it up without `--csv`.

use std::path::PathBuf;

use clap::Args;
use colored::Colorize;

use super::status;
use crate::app::AppContext;
use crate::cli::output::TableOrder;
use crate::error::Result;

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Gradebook export (CSV)
    pub path: PathBuf,
}

pub fn run(ctx: &AppContext, args: &ImportArgs) -> Result<()> {
    let ctx = ctx.with_snapshot(&args.path);
    let session = ctx.open_session(None)?;

    if !ctx.robot_mode {
        println!(
            "{} Imported {} ({} people, {} attendance days)",
            "✓".green().bold(),
            session.snapshot.source_name.bold(),
            session.snapshot.len(),
            session.snapshot.attendance_columns.len()
        );
        println!();
    }
    status::report(&ctx, &session, false, TableOrder::default())
}
