//! slipday note - Set or clear a note

use clap::Args;

use super::{mutate_tracked, report_record};
use crate::app::AppContext;
use crate::error::Result;

#[derive(Args, Debug)]
pub struct NoteArgs {
    /// Tracked person: key, external id, or full name
    pub selector: String,

    /// Note text; omit to clear the note
    #[arg(trailing_var_arg = true)]
    pub text: Vec<String>,
}

pub fn run(ctx: &AppContext, args: &NoteArgs) -> Result<()> {
    let text = args.text.join(" ");
    let (session, key, cleared) = mutate_tracked(ctx, &args.selector, |record| {
        record.set_notes(&text);
        Ok(record.notes.is_empty())
    })?;
    let summary = if cleared { "Cleared note" } else { "Saved note" };
    report_record(ctx, &session, &key, summary)
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
        Note(NoteArgs),
    }

    #[test]
    fn parse_note_joins_words() {
        let parsed = TestCli::parse_from(["test", "note", "id:4421", "medical", "leave"]);
        let TestCommand::Note(args) = parsed.cmd;
        assert_eq!(args.selector, "id:4421");
        assert_eq!(args.text.join(" "), "medical leave");
    }

    #[test]
    fn parse_note_without_text_clears() {
        let parsed = TestCli::parse_from(["test", "note", "id:4421"]);
        let TestCommand::Note(args) = parsed.cmd;
        assert!(args.text.is_empty());
    }
}
