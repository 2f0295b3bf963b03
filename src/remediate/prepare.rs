//! Host-preparation action: boot-file edits and conflicting-service cleanup.
//!
//! Every phase is guarded so the action can re-run safely from any starting
//! state. Boot files get a timestamped backup before the first edit; there
//! is no automatic rollback afterwards, the backup is the recovery path.

use chrono::Local;
use console::style;

use super::{PhaseOutcome, report_phase, validate_host};
use crate::bootcfg;
use crate::error::{GateprepError, Result};
use crate::host::{
    BOOT_CMDLINE, BOOT_CONFIG, BT_OVERLAY_LINE, CONFLICTING_SERVICES, HostProfile, HostView,
    SERIAL_CONSOLE_TOKEN,
};

/// Run the full host-preparation chain.
pub fn run(view: &HostView, profile: &HostProfile) -> Result<()> {
    println!("{}", style("Preparing host").bold());
    report_phase("validate host", &validate_host(profile)?);
    report_phase("backup boot files", &backup_boot_files(view)?);
    report_phase("edit cmdline", &edit_cmdline(view)?);
    report_phase("edit config overlay", &edit_config_overlay(view)?);
    report_phase("edit uart block", &edit_uart_block(view, profile)?);
    report_phase(
        "disable conflicting services",
        &disable_and_mask_services(view)?,
    );
    println!(
        "\n{} Reboot the host before installing the application.",
        style("Reboot required:").yellow().bold()
    );
    Ok(())
}

/// Copy each existing boot file to a timestamp-suffixed sibling.
pub fn backup_boot_files(view: &HostView) -> Result<PhaseOutcome> {
    let stamp = Local::now().format("%Y%m%d-%H%M%S");
    let mut backed_up = Vec::new();
    for relative in [BOOT_CMDLINE, BOOT_CONFIG] {
        let path = view.path(relative);
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().to_string()) else {
            continue;
        };
        let backup = path.with_file_name(format!("{name}.{stamp}.bak"));
        std::fs::copy(&path, &backup).map_err(|e| GateprepError::FileWriteFailed {
            path: backup.display().to_string(),
            reason: e.to_string(),
        })?;
        backed_up.push(backup.display().to_string());
    }
    if backed_up.is_empty() {
        Ok(PhaseOutcome::Skipped("no boot files present".to_string()))
    } else {
        Ok(PhaseOutcome::Changed(backed_up.join(", ")))
    }
}

fn read_boot_file(view: &HostView, relative: &str) -> Result<Option<String>> {
    if !view.exists(relative) {
        return Ok(None);
    }
    view.read_to_string(relative)
        .map(Some)
        .map_err(|e| GateprepError::FileReadFailed {
            path: view.path(relative).display().to_string(),
            reason: e.to_string(),
        })
}

fn write_boot_file(view: &HostView, relative: &str, text: &str) -> Result<()> {
    std::fs::write(view.path(relative), text).map_err(|e| GateprepError::FileWriteFailed {
        path: view.path(relative).display().to_string(),
        reason: e.to_string(),
    })
}

/// Remove the serial-console parameter from the boot cmdline.
pub fn edit_cmdline(view: &HostView) -> Result<PhaseOutcome> {
    let Some(text) = read_boot_file(view, BOOT_CMDLINE)? else {
        return Ok(PhaseOutcome::Skipped(format!("{BOOT_CMDLINE} not present")));
    };
    if !text.split_whitespace().any(|t| t == SERIAL_CONSOLE_TOKEN) {
        return Ok(PhaseOutcome::Unchanged(format!(
            "{SERIAL_CONSOLE_TOKEN} already absent"
        )));
    }
    let edited = bootcfg::remove_cmdline_token(&text, SERIAL_CONSOLE_TOKEN);
    write_boot_file(view, BOOT_CMDLINE, &edited)?;
    Ok(PhaseOutcome::Changed(format!(
        "removed {SERIAL_CONSOLE_TOKEN}"
    )))
}

/// Append the Bluetooth-disable overlay if missing.
pub fn edit_config_overlay(view: &HostView) -> Result<PhaseOutcome> {
    let Some(text) = read_boot_file(view, BOOT_CONFIG)? else {
        return Ok(PhaseOutcome::Skipped(format!("{BOOT_CONFIG} not present")));
    };
    let (edited, changed) = bootcfg::ensure_line(&text, BT_OVERLAY_LINE);
    if !changed {
        return Ok(PhaseOutcome::Unchanged(format!(
            "{BT_OVERLAY_LINE} already present"
        )));
    }
    write_boot_file(view, BOOT_CONFIG, &edited)?;
    Ok(PhaseOutcome::Changed(format!("appended {BT_OVERLAY_LINE}")))
}

/// Ensure the Pi 5 UART block. Skipped on any other hardware.
pub fn edit_uart_block(view: &HostView, profile: &HostProfile) -> Result<PhaseOutcome> {
    if !profile.is_pi5() {
        return Ok(PhaseOutcome::Skipped(
            "not a Raspberry Pi 5".to_string(),
        ));
    }
    let Some(text) = read_boot_file(view, BOOT_CONFIG)? else {
        return Ok(PhaseOutcome::Skipped(format!("{BOOT_CONFIG} not present")));
    };
    let (edited, inserted) = bootcfg::ensure_uart_block(&text);
    if inserted == 0 {
        return Ok(PhaseOutcome::Unchanged(
            "UART block already complete".to_string(),
        ));
    }
    write_boot_file(view, BOOT_CONFIG, &edited)?;
    Ok(PhaseOutcome::Changed(format!("inserted {inserted} line(s)")))
}

/// Disable then mask every conflicting service the service manager knows.
/// Unknown units are skipped with a warning; images vary.
pub fn disable_and_mask_services(view: &HostView) -> Result<PhaseOutcome> {
    let mut handled = Vec::new();
    let mut skipped = Vec::new();
    for unit in CONFLICTING_SERVICES {
        if view.services.is_known(unit)? {
            view.services.disable_and_mask(unit)?;
            handled.push(unit);
        } else {
            eprintln!(
                "{} service '{unit}' not known to the service manager, skipping",
                style("warning:").yellow().bold()
            );
            skipped.push(unit);
        }
    }
    if handled.is_empty() {
        Ok(PhaseOutcome::Skipped(format!(
            "no known units among: {}",
            skipped.join(", ")
        )))
    } else {
        Ok(PhaseOutcome::Changed(format!(
            "disabled and masked: {}",
            handled.join(", ")
        )))
    }
}
