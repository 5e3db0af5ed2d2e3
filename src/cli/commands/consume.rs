//! slipday use - Spend slip days
//!
//! Refused when the record is dropped or has fewer days available than
//! requested; the save file is left untouched in that case.

use clap::Args;

use super::{mutate_tracked, report_record};
use crate::app::AppContext;
use crate::error::Result;

#[derive(Args, Debug)]
pub struct UseArgs {
    /// Tracked person: key, external id, or full name
    pub selector: String,

    /// Number of slip days to spend
    #[arg(long, short = 'n', default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub count: u32,
}

pub fn run(ctx: &AppContext, args: &UseArgs) -> Result<()> {
    let (session, key, ()) = mutate_tracked(ctx, &args.selector, |record| record.consume(args.count))?;
    let summary = format!("Used {} slip day{}", args.count, plural(args.count));
    report_record(ctx, &session, &key, &summary)
}

pub(crate) const fn plural(n: u32) -> &'static str {
    if n == 1 { "" } else { "s" }
}
