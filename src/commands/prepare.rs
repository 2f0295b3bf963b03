//! Prepare command: the host-preparation remediation action.

use crate::cli::Cli;
use crate::error::Result;
use crate::remediate;

pub fn run(cli: &Cli) -> Result<()> {
    let (view, profile) = super::host_context(cli);
    remediate::prepare::run(&view, &profile)
}
