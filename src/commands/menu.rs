//! Menu command: the interactive reconciliation loop on stdin.

use std::io::BufReader;

use crate::cli::Cli;
use crate::error::Result;
use crate::menu;

pub fn run(cli: &Cli) -> Result<()> {
    let (view, profile) = super::host_context(cli);
    let stdin = std::io::stdin();
    let mut input = BufReader::new(stdin.lock());
    menu::run_loop(&view, &profile, &mut input, cli.yes)
}
