//! slipday refund - Give slip days back
//!
//! Usage never goes below zero.

use clap::Args;

use super::consume::plural;
use super::{mutate_tracked, report_record};
use crate::app::AppContext;
use crate::error::Result;

#[derive(Args, Debug)]
pub struct RefundArgs {
    /// Tracked person: key, external id, or full name
    pub selector: String,

    /// Number of slip days to give back
    #[arg(long, short = 'n', default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub count: u32,
}

pub fn run(ctx: &AppContext, args: &RefundArgs) -> Result<()> {
    let (session, key, refunded) = mutate_tracked(ctx, &args.selector, |record| {
        let before = record.used;
        record.refund(args.count);
        Ok(before - record.used)
    })?;
    let summary = format!("Refunded {refunded} slip day{}", plural(refunded));
    report_record(ctx, &session, &key, &summary)
}
