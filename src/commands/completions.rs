//! Completions command: emit a completion script for the selected shell.
//!
//! The shell is a `value_enum` argument, so an unsupported shell is rejected
//! at parse time and never reaches this module.

use clap::CommandFactory;

use crate::cli::{Cli, CompletionsArgs};
use crate::error::Result;

pub fn run(args: &CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(args.shell, &mut cmd, "gateprep", &mut std::io::stdout().lock());
    Ok(())
}
