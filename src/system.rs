//! Seams to the service manager, the package database and PATH lookup.
//!
//! Probes and remediation actions only ever see these traits; the real
//! implementations shell out to `systemctl`, `dpkg-query` and `apt-get`.
//! Tests substitute the in-memory fakes from [`fake`].

use std::env;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use crate::error::{GateprepError, Result};

/// Unit registry operations against the host's service manager.
pub trait ServiceManager {
    /// Whether the unit is known to the service manager at all.
    fn is_known(&self, unit: &str) -> Result<bool>;
    /// Whether the unit is enabled (will start at boot).
    fn is_enabled(&self, unit: &str) -> Result<bool>;
    /// Disable the unit, then mask it.
    fn disable_and_mask(&self, unit: &str) -> Result<()>;
}

/// Package database operations.
pub trait PackageManager {
    fn is_installed(&self, package: &str) -> Result<bool>;
    fn refresh_index(&self) -> Result<()>;
    fn upgrade_all(&self) -> Result<()>;
    fn install(&self, packages: &[&str]) -> Result<()>;
}

/// Executable lookup on PATH.
pub trait CommandLookup {
    fn exists(&self, name: &str) -> bool;
}

fn run_command(program: &str, args: &[&str]) -> Result<Output> {
    Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| GateprepError::CommandFailed {
            program: program.to_string(),
            reason: e.to_string(),
        })
}

fn stdout_string(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn stderr_string(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_string()
}

/// Real service manager backed by `systemctl`.
pub struct SystemdManager;

impl ServiceManager for SystemdManager {
    fn is_known(&self, unit: &str) -> Result<bool> {
        let service = format!("{unit}.service");
        // A host without systemctl has no known units.
        let Ok(output) = run_command("systemctl", &["list-unit-files", "--no-legend", &service])
        else {
            return Ok(false);
        };
        Ok(output.status.success() && !stdout_string(&output).is_empty())
    }

    fn is_enabled(&self, unit: &str) -> Result<bool> {
        // `is-enabled` exits non-zero for disabled/masked units, so the exit
        // status alone cannot distinguish "disabled" from "systemctl broke".
        let output = run_command("systemctl", &["is-enabled", unit])?;
        let state = stdout_string(&output);
        match state.as_str() {
            "enabled" | "enabled-runtime" | "alias" => Ok(true),
            "" => Err(GateprepError::ServiceOpFailed {
                unit: unit.to_string(),
                reason: stderr_string(&output),
            }),
            _ => Ok(false),
        }
    }

    fn disable_and_mask(&self, unit: &str) -> Result<()> {
        for action in ["disable", "mask"] {
            let output = run_command("systemctl", &[action, unit])?;
            if !output.status.success() {
                return Err(GateprepError::ServiceOpFailed {
                    unit: unit.to_string(),
                    reason: format!("systemctl {action}: {}", stderr_string(&output)),
                });
            }
        }
        Ok(())
    }
}

/// Real package manager backed by `dpkg-query` / `apt-get`.
pub struct AptManager;

impl AptManager {
    fn apt_get(&self, operation: &str, args: &[&str]) -> Result<()> {
        let output = Command::new("apt-get")
            .env("DEBIAN_FRONTEND", "noninteractive")
            .arg(operation)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| GateprepError::PackageOpFailed {
                operation: operation.to_string(),
                reason: e.to_string(),
            })?;
        if !output.status.success() {
            return Err(GateprepError::PackageOpFailed {
                operation: operation.to_string(),
                reason: stderr_string(&output),
            });
        }
        Ok(())
    }
}

impl PackageManager for AptManager {
    fn is_installed(&self, package: &str) -> Result<bool> {
        let output = run_command("dpkg-query", &["-W", "-f", "${Status}", package])?;
        // dpkg-query exits non-zero for unknown packages; that is a definite
        // "not installed", not a query failure.
        Ok(output.status.success() && stdout_string(&output).contains("install ok installed"))
    }

    fn refresh_index(&self) -> Result<()> {
        self.apt_get("update", &[])
    }

    fn upgrade_all(&self) -> Result<()> {
        self.apt_get("upgrade", &["-y"])
    }

    fn install(&self, packages: &[&str]) -> Result<()> {
        let mut args = vec!["-y"];
        args.extend_from_slice(packages);
        self.apt_get("install", &args)
    }
}

/// PATH-scanning command lookup.
pub struct PathLookup;

impl CommandLookup for PathLookup {
    fn exists(&self, name: &str) -> bool {
        let Some(path) = env::var_os("PATH") else {
            return false;
        };
        env::split_paths(&path).any(|dir| {
            let candidate = dir.join(name);
            candidate.is_file() && is_executable(&candidate)
        })
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(_path: &Path) -> bool {
    true
}


#[cfg(test)]
mod tests {
    use super::fake::*;
    use super::*;

    #[test]
    fn test_fake_services_disable_and_mask() {
        let services = FakeServices::with_enabled(&["bluetooth"]);
        assert!(services.is_enabled("bluetooth").unwrap());
        services.disable_and_mask("bluetooth").unwrap();
        assert!(!services.is_enabled("bluetooth").unwrap());
        assert!(services.masked.borrow().contains("bluetooth"));
    }

    #[test]
    fn test_fake_packages_install() {
        let packages = FakePackages::default();
        assert!(!packages.is_installed("curl").unwrap());
        packages.install(&["curl", "unzip"]).unwrap();
        assert!(packages.is_installed("curl").unwrap());
        assert!(packages.is_installed("unzip").unwrap());
    }

    #[test]
    fn test_path_lookup_finds_sh() {
        // Any Unix test environment has `sh` somewhere on PATH.
        #[cfg(unix)]
        assert!(PathLookup.exists("sh"));
    }

    #[test]
    fn test_path_lookup_misses_nonsense() {
        assert!(!PathLookup.exists("definitely-not-a-real-command-xyz"));
    }
}
