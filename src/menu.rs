//! The reconciliation menu: probe report plus remediation actions.
//!
//! The loop re-runs every probe after each action (status is never cached),
//! treats unrecognized input as a no-op redisplay, and only ends on quit.
//! Input comes from any `BufRead`, so the loop is scriptable.

use std::io::{BufRead, Write};

use console::style;

use crate::error::Result;
use crate::host::{HostProfile, HostView};
use crate::probe::checks;
use crate::probe::{ProbeCtx, ProbeResult, ProbeStatus};
use crate::remediate;

/// One selectable remediation action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    PrepareHost,
    InstallApplication,
    PrepareAndInstall,
    Quit,
}

/// Parse one input line. `None` means unrecognized input (a no-op).
pub fn parse_choice(line: &str) -> Option<MenuChoice> {
    match line.trim().to_lowercase().as_str() {
        "1" => Some(MenuChoice::PrepareHost),
        "2" => Some(MenuChoice::InstallApplication),
        "3" => Some(MenuChoice::PrepareAndInstall),
        "q" | "quit" => Some(MenuChoice::Quit),
        _ => None,
    }
}

/// Print the probe report, one line per probe.
pub fn render_report(results: &[ProbeResult]) {
    println!("\n{}", style("Host status").bold().underlined());
    for result in results {
        let marker = match result.status {
            ProbeStatus::Satisfied => style("✓").green().bold(),
            ProbeStatus::Unsatisfied => style("✗").red().bold(),
            ProbeStatus::Indeterminate => style("?").yellow().bold(),
            ProbeStatus::NotApplicable => style("-").dim(),
        };
        println!(
            "  {marker} {:<22} {}",
            result.id,
            style(&result.evidence).dim()
        );
    }
}

fn render_actions() {
    println!("\n{}", style("Actions").bold().underlined());
    println!("  1) Prepare host");
    println!("  2) Install application");
    println!("  3) Prepare host, then install application");
    println!("  q) Quit");
}

/// Run the menu loop until quit. Action errors are reported and the loop
/// continues, except precondition failures which abort the process.
pub fn run_loop(
    view: &HostView,
    profile: &HostProfile,
    input: &mut dyn BufRead,
    assume_yes: bool,
) -> Result<()> {
    let registry = checks::default_registry();
    loop {
        let results = registry.run_all(&ProbeCtx { view, profile });
        render_report(&results);
        render_actions();
        print!("Select an option [1-3, q]: ");
        let _ = std::io::stdout().flush();

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            // End of scripted input behaves like quit.
            println!();
            return Ok(());
        }
        let Some(choice) = parse_choice(&line) else {
            println!("Unrecognized option: {}", line.trim());
            continue;
        };

        let outcome = match choice {
            MenuChoice::Quit => return Ok(()),
            MenuChoice::PrepareHost => remediate::prepare::run(view, profile),
            MenuChoice::InstallApplication => remediate::install::run(view, profile, assume_yes),
            MenuChoice::PrepareAndInstall => remediate::prepare::run(view, profile)
                .and_then(|()| remediate::install::run(view, profile, assume_yes)),
        };
        if let Err(e) = outcome {
            if e.is_fatal_precondition() {
                return Err(e);
            }
            eprintln!("{} {e}", style("Action failed:").red().bold());
        }
    }
}
