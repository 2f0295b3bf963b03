//! Remediation actions: named, idempotent operations that mutate host state.
//!
//! Each action is a linear chain of phases. A phase returns an explicit
//! [`PhaseOutcome`] rather than relying on implicit propagation; the runner
//! prints every outcome and short-circuits on the first error.

pub mod install;
pub mod prepare;

use console::style;

use crate::error::{GateprepError, Result};
use crate::host::HostProfile;

/// What a phase did. All three variants are success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhaseOutcome {
    /// Host state was mutated.
    Changed(String),
    /// The desired state already held.
    Unchanged(String),
    /// The phase did not apply (missing file, wrong hardware, declined
    /// overwrite) and deliberately did nothing.
    Skipped(String),
}

impl PhaseOutcome {
    pub fn detail(&self) -> &str {
        match self {
            PhaseOutcome::Changed(d) | PhaseOutcome::Unchanged(d) | PhaseOutcome::Skipped(d) => d,
        }
    }
}

/// Print one phase result line.
pub fn report_phase(name: &str, outcome: &PhaseOutcome) {
    let tag = match outcome {
        PhaseOutcome::Changed(_) => style("changed").green().bold(),
        PhaseOutcome::Unchanged(_) => style("ok").dim(),
        PhaseOutcome::Skipped(_) => style("skipped").yellow(),
    };
    println!("  [{tag}] {name}: {}", outcome.detail());
}

/// Hard host preconditions shared by every remediation action. Failure here
/// is fatal for the whole process, not just the current action.
pub fn validate_host(profile: &HostProfile) -> Result<PhaseOutcome> {
    if profile.os_supported() != Some(true) {
        return Err(GateprepError::UnsupportedOsVersion {
            found: profile.os_version_display().to_string(),
        });
    }
    if profile.hardware_supported() != Some(true) {
        return Err(GateprepError::UnsupportedHardware {
            found: profile.model_display().to_string(),
        });
    }
    Ok(PhaseOutcome::Unchanged(format!(
        "Debian {} on {}",
        profile.os_version_display(),
        profile.model_display()
    )))
}
