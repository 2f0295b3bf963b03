//! Status command: probe the host, print the report, mutate nothing.

use crate::cli::Cli;
use crate::error::Result;
use crate::menu::render_report;
use crate::probe::ProbeCtx;
use crate::probe::checks::default_registry;

pub fn run(cli: &Cli) -> Result<()> {
    let (view, profile) = super::host_context(cli);
    let registry = default_registry();
    let results = registry.run_all(&ProbeCtx {
        view: &view,
        profile: &profile,
    });
    render_report(&results);
    Ok(())
}
