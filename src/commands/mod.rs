//! Command implementations for the gateprep CLI

pub mod completions;
pub mod configure;
pub mod install;
pub mod menu;
pub mod prepare;
pub mod status;

use crate::cli::Cli;
use crate::host::{HostProfile, HostView};

/// Build the host view and profile for one invocation.
pub fn host_context(cli: &Cli) -> (HostView, HostProfile) {
    let view = HostView::real(&cli.root);
    let profile = HostProfile::detect(&view);
    if cli.verbose {
        println!(
            "host root: {} | os: {} | model: {}",
            cli.root.display(),
            profile.os_version_display(),
            profile.model_display()
        );
    }
    (view, profile)
}
