//! The standard probe set for a radio-gateway host.

use super::{ProbeCtx, ProbeRegistry, ProbeStatus};
use crate::bootcfg::contains_line;
use crate::host::{
    APP_BIN_DIR, BOOT_CMDLINE, BOOT_CONFIG, BT_OVERLAY_LINE, CONFLICTING_SERVICES,
    MESH_CLIENT_COMMAND, REQUIRED_DIRS, REQUIRED_PACKAGES, SERIAL_CONSOLE_TOKEN, UART_LINES,
};

/// Build the registry holding every standard probe, in report order.
pub fn default_registry() -> ProbeRegistry {
    let mut registry = ProbeRegistry::new();
    registry.register("os-version", os_version);
    registry.register("hardware-model", hardware_model);
    registry.register("serial-console", serial_console_disabled);
    registry.register("bluetooth-overlay", bluetooth_disabled);
    registry.register("uart-config", uart_configured);
    registry.register("conflicting-services", conflicting_services_disabled);
    registry.register("required-packages", required_packages_present);
    registry.register("mesh-client", mesh_client_installed);
    registry.register("directory-tree", directory_tree_present);
    registry.register("app-binaries", app_binaries_present);
    registry
}

fn os_version(ctx: &ProbeCtx) -> (ProbeStatus, String) {
    match ctx.profile.os_supported() {
        Some(true) => (
            ProbeStatus::Satisfied,
            format!("VERSION_ID={}", ctx.profile.os_version_display()),
        ),
        Some(false) => (
            ProbeStatus::Unsatisfied,
            format!("VERSION_ID={}", ctx.profile.os_version_display()),
        ),
        None => (
            ProbeStatus::Indeterminate,
            "could not read VERSION_ID from /etc/os-release".to_string(),
        ),
    }
}

fn hardware_model(ctx: &ProbeCtx) -> (ProbeStatus, String) {
    match ctx.profile.hardware_supported() {
        Some(true) => (
            ProbeStatus::Satisfied,
            ctx.profile.model_display().to_string(),
        ),
        Some(false) => (
            ProbeStatus::Unsatisfied,
            ctx.profile.model_display().to_string(),
        ),
        None => (
            ProbeStatus::Indeterminate,
            "could not read device model".to_string(),
        ),
    }
}

fn serial_console_disabled(ctx: &ProbeCtx) -> (ProbeStatus, String) {
    match ctx.view.read_to_string(BOOT_CMDLINE) {
        Ok(text) => {
            if text.split_whitespace().any(|t| t == SERIAL_CONSOLE_TOKEN) {
                (
                    ProbeStatus::Unsatisfied,
                    format!("cmdline.txt still contains {SERIAL_CONSOLE_TOKEN}"),
                )
            } else {
                (
                    ProbeStatus::Satisfied,
                    format!("{SERIAL_CONSOLE_TOKEN} absent from cmdline.txt"),
                )
            }
        }
        Err(_) => (
            ProbeStatus::Indeterminate,
            format!("{BOOT_CMDLINE} not readable"),
        ),
    }
}

fn bluetooth_disabled(ctx: &ProbeCtx) -> (ProbeStatus, String) {
    match ctx.view.read_to_string(BOOT_CONFIG) {
        Ok(text) => {
            if contains_line(&text, BT_OVERLAY_LINE) {
                (
                    ProbeStatus::Satisfied,
                    format!("{BT_OVERLAY_LINE} present in config.txt"),
                )
            } else {
                (
                    ProbeStatus::Unsatisfied,
                    format!("{BT_OVERLAY_LINE} missing from config.txt"),
                )
            }
        }
        Err(_) => (
            ProbeStatus::Indeterminate,
            format!("{BOOT_CONFIG} not readable"),
        ),
    }
}

/// UART parameters only mean anything on a Pi 5. Both lines are required;
/// one out of two is Unsatisfied, not Indeterminate.
fn uart_configured(ctx: &ProbeCtx) -> (ProbeStatus, String) {
    if !ctx.profile.is_pi5() {
        return (
            ProbeStatus::NotApplicable,
            "UART block only applies to Raspberry Pi 5".to_string(),
        );
    }
    match ctx.view.read_to_string(BOOT_CONFIG) {
        Ok(text) => {
            let missing: Vec<&str> = UART_LINES
                .iter()
                .copied()
                .filter(|line| !contains_line(&text, line))
                .collect();
            if missing.is_empty() {
                (
                    ProbeStatus::Satisfied,
                    "both UART parameters present".to_string(),
                )
            } else {
                (
                    ProbeStatus::Unsatisfied,
                    format!("missing: {}", missing.join(", ")),
                )
            }
        }
        Err(_) => (
            ProbeStatus::Indeterminate,
            format!("{BOOT_CONFIG} not readable"),
        ),
    }
}

fn conflicting_services_disabled(ctx: &ProbeCtx) -> (ProbeStatus, String) {
    let mut enabled = Vec::new();
    for unit in CONFLICTING_SERVICES {
        match ctx.view.services.is_enabled(unit) {
            Ok(true) => enabled.push(unit),
            Ok(false) => {}
            Err(e) => {
                return (
                    ProbeStatus::Indeterminate,
                    format!("could not query '{unit}': {e}"),
                );
            }
        }
    }
    if enabled.is_empty() {
        (
            ProbeStatus::Satisfied,
            "all conflicting services non-enabled".to_string(),
        )
    } else {
        (
            ProbeStatus::Unsatisfied,
            format!("enabled: {}", enabled.join(", ")),
        )
    }
}

fn required_packages_present(ctx: &ProbeCtx) -> (ProbeStatus, String) {
    let mut missing = Vec::new();
    for package in REQUIRED_PACKAGES {
        match ctx.view.packages.is_installed(package) {
            Ok(true) => {}
            Ok(false) => missing.push(package),
            Err(e) => {
                return (
                    ProbeStatus::Indeterminate,
                    format!("could not query '{package}': {e}"),
                );
            }
        }
    }
    if missing.is_empty() {
        (
            ProbeStatus::Satisfied,
            "all required packages installed".to_string(),
        )
    } else {
        (
            ProbeStatus::Unsatisfied,
            format!("missing: {}", missing.join(", ")),
        )
    }
}

fn mesh_client_installed(ctx: &ProbeCtx) -> (ProbeStatus, String) {
    if ctx.view.commands.exists(MESH_CLIENT_COMMAND) {
        (
            ProbeStatus::Satisfied,
            format!("{MESH_CLIENT_COMMAND} found on PATH"),
        )
    } else {
        (
            ProbeStatus::Unsatisfied,
            format!("{MESH_CLIENT_COMMAND} not found on PATH"),
        )
    }
}

fn directory_tree_present(ctx: &ProbeCtx) -> (ProbeStatus, String) {
    let missing: Vec<&str> = REQUIRED_DIRS
        .iter()
        .copied()
        .filter(|dir| !ctx.view.path(dir).is_dir())
        .collect();
    if missing.is_empty() {
        (
            ProbeStatus::Satisfied,
            "application directory tree present".to_string(),
        )
    } else {
        (
            ProbeStatus::Unsatisfied,
            format!("missing: /{}", missing.join(", /")),
        )
    }
}

fn app_binaries_present(ctx: &ProbeCtx) -> (ProbeStatus, String) {
    if !ctx.view.path(APP_BIN_DIR).is_dir() {
        return (
            ProbeStatus::Unsatisfied,
            format!("/{APP_BIN_DIR} does not exist"),
        );
    }
    match ctx.view.dir_non_empty(APP_BIN_DIR) {
        Ok(true) => (
            ProbeStatus::Satisfied,
            format!("/{APP_BIN_DIR} is non-empty"),
        ),
        Ok(false) => (ProbeStatus::Unsatisfied, format!("/{APP_BIN_DIR} is empty")),
        Err(_) => (
            ProbeStatus::Indeterminate,
            format!("/{APP_BIN_DIR} not readable"),
        ),
    }
}
