//! Application-installation action: packages, mesh client, directory tree
//! and the application archive.
//!
//! Any package-manager or network failure aborts the whole action. The
//! archive download lands in a `NamedTempFile`, so every failure path cleans
//! up the temporary archive automatically.

use std::io::Write;
use std::process::{Command, Stdio};

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use inquire::Confirm;
use tempfile::NamedTempFile;

use super::{PhaseOutcome, report_phase, validate_host};
use crate::error::{GateprepError, Result};
use crate::host::{
    APP_ARCHIVE_URL, APP_BIN_DIR, HostProfile, HostView, MESH_CLIENT_COMMAND, MESH_INSTALLER_URL,
    REQUIRED_DIRS, REQUIRED_PACKAGES,
};
use crate::net;

/// Run the full application-installation chain.
pub fn run(view: &HostView, profile: &HostProfile, assume_yes: bool) -> Result<()> {
    println!("{}", style("Installing application").bold());
    report_phase("validate host", &validate_host(profile)?);
    report_phase("refresh package index", &refresh_package_index(view)?);
    report_phase("upgrade installed packages", &upgrade_packages(view)?);
    report_phase("install dependencies", &install_dependencies(view)?);
    report_phase("install mesh client", &install_mesh_client(view)?);
    report_phase("ensure directory tree", &ensure_directory_tree(view)?);
    report_phase(
        "fetch application archive",
        &fetch_and_extract_archive(view, assume_yes)?,
    );
    Ok(())
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner} {msg}") {
        pb.set_style(spinner_style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(120));
    pb
}

fn refresh_package_index(view: &HostView) -> Result<PhaseOutcome> {
    let pb = spinner("refreshing package index");
    let result = view.packages.refresh_index();
    pb.finish_and_clear();
    result?;
    Ok(PhaseOutcome::Changed("package index refreshed".to_string()))
}

fn upgrade_packages(view: &HostView) -> Result<PhaseOutcome> {
    let pb = spinner("upgrading installed packages");
    let result = view.packages.upgrade_all();
    pb.finish_and_clear();
    result?;
    Ok(PhaseOutcome::Changed("packages upgraded".to_string()))
}

fn install_dependencies(view: &HostView) -> Result<PhaseOutcome> {
    let missing: Vec<&str> = REQUIRED_PACKAGES
        .iter()
        .copied()
        .filter(|p| !view.packages.is_installed(p).unwrap_or(false))
        .collect();
    if missing.is_empty() {
        return Ok(PhaseOutcome::Unchanged(
            "all dependencies already installed".to_string(),
        ));
    }
    view.packages.install(&missing)?;
    Ok(PhaseOutcome::Changed(format!(
        "installed: {}",
        missing.join(", ")
    )))
}

/// Fetch-then-run installer for the mesh client, skipped when the client
/// command already exists.
fn install_mesh_client(view: &HostView) -> Result<PhaseOutcome> {
    if view.commands.exists(MESH_CLIENT_COMMAND) {
        return Ok(PhaseOutcome::Skipped(format!(
            "{MESH_CLIENT_COMMAND} already installed"
        )));
    }
    let script = net::get_text(MESH_INSTALLER_URL)?;
    let mut script_file = NamedTempFile::new()?;
    script_file.write_all(script.as_bytes())?;

    let status = Command::new("sh")
        .arg(script_file.path())
        .stdin(Stdio::null())
        .status()
        .map_err(|e| GateprepError::CommandFailed {
            program: "sh".to_string(),
            reason: e.to_string(),
        })?;
    if !status.success() {
        return Err(GateprepError::CommandFailed {
            program: "sh".to_string(),
            reason: format!("mesh installer exited with {status}"),
        });
    }
    Ok(PhaseOutcome::Changed("mesh client installed".to_string()))
}

fn ensure_directory_tree(view: &HostView) -> Result<PhaseOutcome> {
    let mut created = Vec::new();
    for dir in REQUIRED_DIRS {
        let path = view.path(dir);
        if !path.is_dir() {
            std::fs::create_dir_all(&path).map_err(|e| GateprepError::FileWriteFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
            created.push(dir);
        }
    }
    if created.is_empty() {
        Ok(PhaseOutcome::Unchanged(
            "directory tree already present".to_string(),
        ))
    } else {
        Ok(PhaseOutcome::Changed(format!(
            "created: /{}",
            created.join(", /")
        )))
    }
}

/// Download and extract the application archive into the binary directory.
///
/// Installation is "ensure present": an existing non-empty installation is
/// only replaced after explicit confirmation, and declining is a successful
/// skip.
fn fetch_and_extract_archive(view: &HostView, assume_yes: bool) -> Result<PhaseOutcome> {
    let bin_dir = view.path(APP_BIN_DIR);
    if view.dir_non_empty(APP_BIN_DIR).unwrap_or(false) {
        if !confirm_replace(assume_yes)? {
            return Ok(PhaseOutcome::Skipped(
                "existing installation kept".to_string(),
            ));
        }
        std::fs::remove_dir_all(&bin_dir).map_err(|e| GateprepError::FileWriteFailed {
            path: bin_dir.display().to_string(),
            reason: e.to_string(),
        })?;
    }
    std::fs::create_dir_all(&bin_dir)?;

    let pb = spinner("downloading application archive");
    let bytes = net::get_bytes(APP_ARCHIVE_URL);
    pb.finish_and_clear();
    let bytes = bytes?;

    // NamedTempFile cleans the archive up on every path out of this scope.
    let mut archive = NamedTempFile::new()?;
    archive.write_all(&bytes)?;

    let output = Command::new("unzip")
        .args(["-o", "-q"])
        .arg(archive.path())
        .arg("-d")
        .arg(&bin_dir)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| GateprepError::CommandFailed {
            program: "unzip".to_string(),
            reason: e.to_string(),
        })?;
    if !output.status.success() {
        return Err(GateprepError::CommandFailed {
            program: "unzip".to_string(),
            reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(PhaseOutcome::Changed(format!(
        "extracted archive into {}",
        bin_dir.display()
    )))
}

fn confirm_replace(assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    Confirm::new("An application installation already exists. Remove and replace it?")
        .with_default(false)
        .with_help_message("Declining keeps the existing installation and continues")
        .prompt()
        .map_err(|e| GateprepError::PromptFailed {
            message: e.to_string(),
        })
}
