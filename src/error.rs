//! Error types and handling for gateprep
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for gateprep operations
#[derive(Error, Diagnostic, Debug)]
pub enum GateprepError {
    // Host precondition errors (fatal, never retried)
    #[error("This command must be run as root")]
    #[diagnostic(
        code(gateprep::host::root_required),
        help("Re-run with sudo, or point --root at a sandbox directory")
    )]
    RootRequired,

    #[error("Unsupported OS version: {found}")]
    #[diagnostic(
        code(gateprep::host::unsupported_os),
        help("Supported Debian VERSION_ID values: 12, 13")
    )]
    UnsupportedOsVersion { found: String },

    #[error("Unsupported hardware model: {found}")]
    #[diagnostic(
        code(gateprep::host::unsupported_hardware),
        help("Supported boards: Raspberry Pi 4, Raspberry Pi 5")
    )]
    UnsupportedHardware { found: String },

    // Transfer errors
    #[error("Failed to fetch template '{id}': {reason}")]
    #[diagnostic(
        code(gateprep::template::fetch_failed),
        help("Check the --templates source and that the template id exists there")
    )]
    TemplateFetchFailed { id: String, reason: String },

    #[error("Download failed: {url}")]
    #[diagnostic(code(gateprep::net::download_failed))]
    DownloadFailed { url: String, reason: String },

    // Input collection errors
    #[error("Input ended while a value for '{placeholder}' was still required")]
    #[diagnostic(
        code(gateprep::collect::input_closed),
        help("Scripted input must supply one non-empty line per placeholder")
    )]
    InputClosed { placeholder: String },

    #[error("No value supplied for placeholder '{placeholder}'")]
    #[diagnostic(
        code(gateprep::collect::missing_value),
        help("Add --set {placeholder}=<value>")
    )]
    MissingPresetValue { placeholder: String },

    #[error("Empty value supplied for placeholder '{placeholder}'")]
    #[diagnostic(code(gateprep::collect::empty_value))]
    EmptyPresetValue { placeholder: String },

    #[error("Invalid --set argument: {arg}")]
    #[diagnostic(
        code(gateprep::collect::invalid_set_pair),
        help("Expected KEY=VALUE")
    )]
    InvalidSetPair { arg: String },

    #[error("Prompt failed: {message}")]
    #[diagnostic(code(gateprep::collect::prompt_failed))]
    PromptFailed { message: String },

    // Host mutation errors
    #[error("Service operation failed for '{unit}': {reason}")]
    #[diagnostic(code(gateprep::service::operation_failed))]
    ServiceOpFailed { unit: String, reason: String },

    #[error("Package manager {operation} failed: {reason}")]
    #[diagnostic(code(gateprep::package::operation_failed))]
    PackageOpFailed { operation: String, reason: String },

    #[error("Command '{program}' failed: {reason}")]
    #[diagnostic(code(gateprep::command::failed))]
    CommandFailed { program: String, reason: String },

    // File system errors
    #[error("Failed to read file: {path}")]
    #[diagnostic(code(gateprep::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}")]
    #[diagnostic(code(gateprep::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(gateprep::fs::io_error))]
    IoError { message: String },
}

impl GateprepError {
    /// Precondition failures abort the whole process, even from inside the
    /// reconciliation menu loop.
    pub fn is_fatal_precondition(&self) -> bool {
        matches!(
            self,
            GateprepError::RootRequired
                | GateprepError::UnsupportedOsVersion { .. }
                | GateprepError::UnsupportedHardware { .. }
        )
    }
}

impl From<std::io::Error> for GateprepError {
    fn from(err: std::io::Error) -> Self {
        GateprepError::IoError {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, GateprepError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GateprepError::UnsupportedOsVersion {
            found: "11".to_string(),
        };
        assert_eq!(err.to_string(), "Unsupported OS version: 11");
    }

    #[test]
    fn test_error_code() {
        let err = GateprepError::TemplateFetchFailed {
            id: "configCC.yml".to_string(),
            reason: "404".to_string(),
        };
        assert_eq!(
            err.code().map(|c| c.to_string()),
            Some("gateprep::template::fetch_failed".to_string())
        );
    }

    #[test]
    fn test_precondition_classification() {
        assert!(GateprepError::RootRequired.is_fatal_precondition());
        assert!(
            GateprepError::UnsupportedHardware {
                found: "Banana Pi".to_string()
            }
            .is_fatal_precondition()
        );
        assert!(
            !GateprepError::DownloadFailed {
                url: "https://example.invalid/a.zip".to_string(),
                reason: "timeout".to_string()
            }
            .is_fatal_precondition()
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: GateprepError = io_err.into();
        assert!(matches!(err, GateprepError::IoError { .. }));
    }

    #[test]
    fn test_fatal_paths_name_the_condition() {
        let err = GateprepError::UnsupportedHardware {
            found: "Raspberry Pi 3 Model B".to_string(),
        };
        assert!(err.to_string().contains("Raspberry Pi 3 Model B"));
    }
}
