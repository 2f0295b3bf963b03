//! Read-only probes classifying host configuration state.
//!
//! Probes never mutate anything and never fail: a question a probe cannot
//! answer (missing file, unreachable service manager) yields
//! [`ProbeStatus::Indeterminate`], which the display and the remediation
//! layer treat as distinct from both Satisfied and Unsatisfied.

pub mod checks;

use crate::host::{HostProfile, HostView};

/// Outcome classification of a single probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStatus {
    /// The checked condition holds.
    Satisfied,
    /// The checked condition definitely does not hold.
    Unsatisfied,
    /// The probe could not observe the state it checks.
    Indeterminate,
    /// The probe's subject does not exist on this hardware.
    NotApplicable,
}

/// Result of one probe run: what was checked, how it classified, and the
/// observed evidence.
#[derive(Debug, Clone)]
pub struct ProbeResult {
    pub id: &'static str,
    pub status: ProbeStatus,
    pub evidence: String,
}

/// Context handed to every probe function.
pub struct ProbeCtx<'a> {
    pub view: &'a HostView,
    pub profile: &'a HostProfile,
}

type ProbeFn = Box<dyn Fn(&ProbeCtx) -> (ProbeStatus, String)>;

/// Ordered registry of probes. `run_all` evaluates in registration order.
#[derive(Default)]
pub struct ProbeRegistry {
    probes: Vec<(&'static str, ProbeFn)>,
}

impl ProbeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        id: &'static str,
        probe: impl Fn(&ProbeCtx) -> (ProbeStatus, String) + 'static,
    ) {
        self.probes.push((id, Box::new(probe)));
    }

    pub fn run_all(&self, ctx: &ProbeCtx) -> Vec<ProbeResult> {
        self.probes
            .iter()
            .map(|(id, probe)| {
                let (status, evidence) = probe(ctx);
                ProbeResult {
                    id,
                    status,
                    evidence,
                }
            })
            .collect()
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.probes.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }
}
