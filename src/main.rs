//! gateprep - radio-gateway host preparation
//!
//! Probes a Raspberry Pi host's configuration state, runs idempotent
//! remediation actions and generates site configuration files from remote
//! YAML templates.

use clap::Parser;
use std::path::Path;

mod bootcfg;
mod cli;
mod commands;
mod error;
mod host;
mod menu;
mod net;
mod probe;
mod remediate;
mod system;
mod template;

use cli::{Cli, Commands};
use error::{GateprepError, Result};

/// Mutating commands against the real host root require elevated privilege.
/// A sandboxed `--root` is a staging/test run and is exempt.
fn check_privilege(cli: &Cli) -> Result<()> {
    let mutates = matches!(
        cli.command,
        Commands::Menu | Commands::Prepare | Commands::Install | Commands::Configure(_)
    );
    if mutates && cli.root == Path::new("/") && !host::is_root() {
        return Err(GateprepError::RootRequired);
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = check_privilege(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let result = match &cli.command {
        Commands::Status => commands::status::run(&cli),
        Commands::Menu => commands::menu::run(&cli),
        Commands::Prepare => commands::prepare::run(&cli),
        Commands::Install => commands::install::run(&cli),
        Commands::Configure(args) => commands::configure::run(&cli, args),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
