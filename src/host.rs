//! Host model: fixed host paths and constants, the injected [`HostView`]
//! through which all host state is observed, and the once-per-run
//! [`HostProfile`].

use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;

use crate::system::{
    AptManager, CommandLookup, PackageManager, PathLookup, ServiceManager, SystemdManager,
};

pub const OS_RELEASE: &str = "etc/os-release";
pub const DEVICE_MODEL: &str = "proc/device-tree/model";
pub const BOOT_CMDLINE: &str = "boot/firmware/cmdline.txt";
pub const BOOT_CONFIG: &str = "boot/firmware/config.txt";

pub const APP_ROOT: &str = "opt/rgw";
pub const APP_BIN_DIR: &str = "opt/rgw/bin";
pub const CONFIG_DIR: &str = "opt/rgw/configs";
pub const LOG_DIR: &str = "opt/rgw/logs";
pub const REQUIRED_DIRS: [&str; 4] = [APP_ROOT, APP_BIN_DIR, CONFIG_DIR, LOG_DIR];

pub const SERIAL_CONSOLE_TOKEN: &str = "console=serial0,115200";
pub const BT_OVERLAY_LINE: &str = "dtoverlay=disable-bt";
pub const UART_SECTION_HEADER: &str = "[all]";
pub const UART_LINES: [&str; 2] = ["dtparam=uart0=on", "dtparam=uart0_console=on"];

pub const CONFLICTING_SERVICES: [&str; 4] =
    ["hciuart", "bluetooth", "serial-getty@ttyAMA0", "ModemManager"];
pub const REQUIRED_PACKAGES: [&str; 4] = ["curl", "unzip", "jq", "logrotate"];

pub const MESH_CLIENT_COMMAND: &str = "zerotier-cli";
pub const MESH_INSTALLER_URL: &str = "https://install.zerotier.com";
pub const APP_ARCHIVE_URL: &str =
    "https://github.com/rgw-project/rgw/releases/latest/download/rgw-latest.zip";
pub const DEFAULT_TEMPLATE_BASE: &str =
    "https://raw.githubusercontent.com/rgw-project/site-templates/main";

const SUPPORTED_OS_VERSIONS: [&str; 2] = ["12", "13"];
const SUPPORTED_MODELS: [&str; 2] = ["Raspberry Pi 4", "Raspberry Pi 5"];

pub const TEST_MODE_VAR: &str = "GATEPREP_TEST_MODE";
pub const OS_OVERRIDE_VAR: &str = "GATEPREP_OS_VERSION_ID";
pub const MODEL_OVERRIDE_VAR: &str = "GATEPREP_HW_MODEL";

/// Whether the current process runs with root privileges.
pub fn is_root() -> bool {
    #[cfg(unix)]
    {
        unsafe { libc::geteuid() == 0 }
    }
    #[cfg(not(unix))]
    {
        false
    }
}

/// The injected view of host state. All host paths resolve through `root`,
/// and the service/package/command seams are trait objects so tests can
/// substitute fakes.
pub struct HostView {
    root: PathBuf,
    pub services: Box<dyn ServiceManager>,
    pub packages: Box<dyn PackageManager>,
    pub commands: Box<dyn CommandLookup>,
}

impl HostView {
    /// Real host view rooted at `root` (normally `/`).
    pub fn real(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            services: Box::new(SystemdManager),
            packages: Box::new(AptManager),
            commands: Box::new(PathLookup),
        }
    }

    /// View with substituted seams, for tests.
    pub fn with_parts(
        root: impl Into<PathBuf>,
        services: Box<dyn ServiceManager>,
        packages: Box<dyn PackageManager>,
        commands: Box<dyn CommandLookup>,
    ) -> Self {
        Self {
            root: root.into(),
            services,
            packages,
            commands,
        }
    }

    /// Absolute path of a host-relative location.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    pub fn exists(&self, relative: &str) -> bool {
        self.path(relative).exists()
    }

    pub fn read_to_string(&self, relative: &str) -> io::Result<String> {
        // `read` + lossy conversion instead of `read_to_string`: the device
        // tree model file is NUL-terminated.
        let bytes = fs::read(self.path(relative))?;
        Ok(String::from_utf8_lossy(&bytes)
            .trim_matches('\0')
            .to_string())
    }

    /// Whether a directory exists and contains at least one entry.
    pub fn dir_non_empty(&self, relative: &str) -> io::Result<bool> {
        let mut entries = fs::read_dir(self.path(relative))?;
        Ok(entries.next().is_some())
    }
}

/// OS and hardware identity, derived once per run and immutable thereafter.
/// `None` fields mean the inspection source was unreadable.
#[derive(Debug, Clone, Default)]
pub struct HostProfile {
    pub os_version_id: Option<String>,
    pub hardware_model: Option<String>,
}

impl HostProfile {
    /// Inspect the host. When `GATEPREP_TEST_MODE=1`, each override variable
    /// takes priority over its inspected value; an unset override falls back
    /// to file inspection. Outside test mode the overrides are never
    /// consulted.
    pub fn detect(view: &HostView) -> Self {
        let mut profile = Self {
            os_version_id: view
                .read_to_string(OS_RELEASE)
                .ok()
                .and_then(|text| parse_os_version_id(&text)),
            hardware_model: view
                .read_to_string(DEVICE_MODEL)
                .ok()
                .map(|m| m.trim().to_string()),
        };
        if env::var(TEST_MODE_VAR).as_deref() == Ok("1") {
            if let Ok(version) = env::var(OS_OVERRIDE_VAR) {
                profile.os_version_id = Some(version);
            }
            if let Ok(model) = env::var(MODEL_OVERRIDE_VAR) {
                profile.hardware_model = Some(model);
            }
        }
        profile
    }

    /// `None` means the OS version could not be observed.
    pub fn os_supported(&self) -> Option<bool> {
        self.os_version_id
            .as_deref()
            .map(|v| SUPPORTED_OS_VERSIONS.contains(&v))
    }

    /// `None` means the hardware model could not be observed.
    pub fn hardware_supported(&self) -> Option<bool> {
        self.hardware_model
            .as_deref()
            .map(|m| SUPPORTED_MODELS.iter().any(|s| m.contains(s)))
    }

    pub fn is_pi5(&self) -> bool {
        self.hardware_model
            .as_deref()
            .is_some_and(|m| m.contains("Raspberry Pi 5"))
    }

    pub fn os_version_display(&self) -> &str {
        self.os_version_id.as_deref().unwrap_or("unknown")
    }

    pub fn model_display(&self) -> &str {
        self.hardware_model.as_deref().unwrap_or("unknown")
    }
}

/// Pull `VERSION_ID` out of os-release text, stripping surrounding quotes.
fn parse_os_version_id(text: &str) -> Option<String> {
    text.lines()
        .find_map(|line| line.strip_prefix("VERSION_ID="))
        .map(|value| value.trim().trim_matches('"').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::fake::{FakeCommands, FakePackages, FakeServices};
    use tempfile::TempDir;

    fn sandbox_view(temp: &TempDir) -> HostView {
        HostView::with_parts(
            temp.path(),
            Box::new(FakeServices::default()),
            Box::new(FakePackages::default()),
            Box::new(FakeCommands::default()),
        )
    }

    fn write_host_file(temp: &TempDir, relative: &str, content: &str) {
        let path = temp.path().join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn test_parse_os_version_id_quoted() {
        let text = "PRETTY_NAME=\"Debian GNU/Linux 12 (bookworm)\"\nVERSION_ID=\"12\"\nID=debian\n";
        assert_eq!(parse_os_version_id(text), Some("12".to_string()));
    }

    #[test]
    fn test_parse_os_version_id_missing() {
        assert_eq!(parse_os_version_id("ID=debian\n"), None);
    }

    #[test]
    fn test_detect_from_files() {
        let temp = TempDir::new().unwrap();
        write_host_file(&temp, OS_RELEASE, "VERSION_ID=\"12\"\n");
        write_host_file(&temp, DEVICE_MODEL, "Raspberry Pi 5 Model B Rev 1.0\0");
        let view = sandbox_view(&temp);

        let profile = HostProfile::detect(&view);
        assert_eq!(profile.os_version_id.as_deref(), Some("12"));
        assert!(profile.is_pi5());
        assert_eq!(profile.os_supported(), Some(true));
        assert_eq!(profile.hardware_supported(), Some(true));
    }

    #[test]
    fn test_detect_missing_sources() {
        let temp = TempDir::new().unwrap();
        let view = sandbox_view(&temp);

        let profile = HostProfile::detect(&view);
        assert_eq!(profile.os_supported(), None);
        assert_eq!(profile.hardware_supported(), None);
        assert!(!profile.is_pi5());
        assert_eq!(profile.os_version_display(), "unknown");
    }

    #[test]
    fn test_unsupported_values() {
        let profile = HostProfile {
            os_version_id: Some("11".to_string()),
            hardware_model: Some("Raspberry Pi 3 Model B".to_string()),
        };
        assert_eq!(profile.os_supported(), Some(false));
        assert_eq!(profile.hardware_supported(), Some(false));
    }

    #[test]
    fn test_dir_non_empty() {
        let temp = TempDir::new().unwrap();
        write_host_file(&temp, "opt/rgw/bin/rgwd", "");
        let view = sandbox_view(&temp);

        assert!(view.dir_non_empty(APP_BIN_DIR).unwrap());
        assert!(view.dir_non_empty("opt/missing").is_err());
    }
}
