//! Common test utilities for gateprep integration tests

use std::path::PathBuf;
use tempfile::TempDir;

/// A sandboxed host root plus a local template directory.
#[allow(dead_code)]
pub struct Sandbox {
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Path passed as --root
    pub root: PathBuf,
    /// Path passed as --templates
    pub templates: PathBuf,
}

#[allow(dead_code)]
impl Sandbox {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().join("root");
        let templates = temp.path().join("templates");
        std::fs::create_dir_all(&root).expect("Failed to create sandbox root");
        std::fs::create_dir_all(&templates).expect("Failed to create template dir");
        Self {
            temp,
            root,
            templates,
        }
    }

    /// Sandbox impersonating a supported Debian 12 / Pi 4 host.
    pub fn pi4_bookworm() -> Self {
        let sandbox = Self::new();
        sandbox.write_host_file("etc/os-release", "VERSION_ID=\"12\"\nID=debian\n");
        sandbox.write_host_file("proc/device-tree/model", "Raspberry Pi 4 Model B Rev 1.5");
        sandbox
    }

    /// Sandbox impersonating a supported Debian 12 / Pi 5 host.
    pub fn pi5_bookworm() -> Self {
        let sandbox = Self::new();
        sandbox.write_host_file("etc/os-release", "VERSION_ID=\"12\"\nID=debian\n");
        sandbox.write_host_file("proc/device-tree/model", "Raspberry Pi 5 Model B");
        sandbox
    }

    /// Write a file under the sandboxed host root.
    pub fn write_host_file(&self, relative: &str, content: &str) {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&path, content).expect("Failed to write host file");
    }

    /// Write a template into the local template directory.
    pub fn write_template(&self, id: &str, content: &str) {
        std::fs::write(self.templates.join(id), content).expect("Failed to write template");
    }

    pub fn read_host_file(&self, relative: &str) -> String {
        std::fs::read_to_string(self.root.join(relative)).expect("Failed to read host file")
    }

    pub fn host_file_exists(&self, relative: &str) -> bool {
        self.root.join(relative).exists()
    }

    pub fn root_arg(&self) -> String {
        self.root.display().to_string()
    }

    pub fn templates_arg(&self) -> String {
        self.templates.display().to_string()
    }
}
