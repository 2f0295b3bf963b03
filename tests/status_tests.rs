//! Status report integration tests against sandboxed host roots

mod common;

use assert_cmd::Command;
use common::Sandbox;
use predicates::prelude::*;

fn gateprep_cmd() -> Command {
    let mut cmd = Command::cargo_bin("gateprep").expect("binary builds");
    cmd.env_remove("GATEPREP_TEST_MODE")
        .env_remove("GATEPREP_OS_VERSION_ID")
        .env_remove("GATEPREP_HW_MODEL");
    cmd
}

#[test]
fn test_status_lists_every_probe() {
    let sandbox = Sandbox::pi4_bookworm();
    let mut assert = gateprep_cmd()
        .args(["--root", &sandbox.root_arg(), "status"])
        .assert()
        .success();
    for id in [
        "os-version",
        "hardware-model",
        "serial-console",
        "bluetooth-overlay",
        "uart-config",
        "conflicting-services",
        "required-packages",
        "mesh-client",
        "directory-tree",
        "app-binaries",
    ] {
        assert = assert.stdout(predicate::str::contains(id));
    }
}

#[test]
fn test_status_reports_supported_host() {
    let sandbox = Sandbox::pi4_bookworm();
    gateprep_cmd()
        .args(["--root", &sandbox.root_arg(), "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("VERSION_ID=12"))
        .stdout(predicate::str::contains("Raspberry Pi 4"));
}

#[test]
fn test_status_missing_boot_files_is_indeterminate() {
    let sandbox = Sandbox::pi4_bookworm();
    gateprep_cmd()
        .args(["--root", &sandbox.root_arg(), "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cmdline.txt not readable"))
        .stdout(predicate::str::contains("config.txt not readable"));
}

#[test]
fn test_status_uart_not_applicable_on_pi4() {
    let sandbox = Sandbox::pi4_bookworm();
    gateprep_cmd()
        .args(["--root", &sandbox.root_arg(), "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "UART block only applies to Raspberry Pi 5",
        ));
}

#[test]
fn test_status_detects_serial_console_token() {
    let sandbox = Sandbox::pi4_bookworm();
    sandbox.write_host_file(
        "boot/firmware/cmdline.txt",
        "console=serial0,115200 console=tty1 quiet\n",
    );
    gateprep_cmd()
        .args(["--root", &sandbox.root_arg(), "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "cmdline.txt still contains console=serial0,115200",
        ));
}

#[test]
fn test_status_never_requires_root() {
    let sandbox = Sandbox::new();
    // Empty sandbox: everything unreadable, still exit 0.
    gateprep_cmd()
        .args(["--root", &sandbox.root_arg(), "status"])
        .assert()
        .success();
}

#[test]
fn test_status_honors_test_mode_overrides() {
    let sandbox = Sandbox::new();
    gateprep_cmd()
        .args(["--root", &sandbox.root_arg(), "status"])
        .env("GATEPREP_TEST_MODE", "1")
        .env("GATEPREP_OS_VERSION_ID", "13")
        .env("GATEPREP_HW_MODEL", "Raspberry Pi 5 Model B")
        .assert()
        .success()
        .stdout(predicate::str::contains("VERSION_ID=13"))
        .stdout(predicate::str::contains("Raspberry Pi 5 Model B"));
}

#[test]
fn test_status_partial_override_falls_back_to_inspection() {
    // Only the OS version is overridden; the model still comes from the
    // sandbox's device-tree file.
    let sandbox = Sandbox::pi4_bookworm();
    gateprep_cmd()
        .args(["--root", &sandbox.root_arg(), "status"])
        .env("GATEPREP_TEST_MODE", "1")
        .env("GATEPREP_OS_VERSION_ID", "13")
        .assert()
        .success()
        .stdout(predicate::str::contains("VERSION_ID=13"))
        .stdout(predicate::str::contains("Raspberry Pi 4"));
}
