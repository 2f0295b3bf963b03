//! CLI definitions using clap derive API

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::host::DEFAULT_TEMPLATE_BASE;
use crate::template::session::SiteType;

/// gateprep - radio-gateway host preparation
///
/// Prepares a Raspberry Pi for the radio-gateway application and generates
/// its site configuration from remote YAML templates.
#[derive(Parser, Debug)]
#[command(
    name = "gateprep",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Radio-gateway host preparation and site configuration",
    long_about = "gateprep probes a Raspberry Pi host's configuration state, runs idempotent \
                  remediation actions (boot-file edits, service masking, package and application \
                  installation) and generates site configuration files from remote YAML templates.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  gateprep status\n    \
                  gateprep menu\n    \
                  gateprep prepare\n    \
                  gateprep install --yes\n    \
                  gateprep configure --site-type cc\n    \
                  gateprep configure --site-type full --set SITE_NAME=North --set SITE_ID=12345"
)]
pub struct Cli {
    /// Host filesystem root (sandbox for staging and tests)
    #[arg(long, global = true, default_value = "/")]
    pub root: PathBuf,

    /// Template repository: an https:// base URL or a local directory
    #[arg(long, global = true, default_value = DEFAULT_TEMPLATE_BASE)]
    pub templates: String,

    /// Assume yes on destructive-overwrite confirmations
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Probe the host and print the status report
    Status,

    /// Interactive reconciliation menu
    Menu,

    /// Prepare the host (boot-file edits, service masking)
    Prepare,

    /// Install the application (packages, mesh client, archive)
    Install,

    /// Generate site configuration from templates
    Configure(ConfigureArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the configure command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Control-channel site, interactive prompts:\n    gateprep configure --site-type cc\n\n\
                  Non-interactive values:\n    gateprep configure --site-type cc --set SITE_NAME=North --set SITE_ID=12345\n\n\
                  Local template directory:\n    gateprep --templates ./templates configure --site-type voice")]
pub struct ConfigureArgs {
    /// Which template set to process
    #[arg(long, value_enum)]
    pub site_type: SiteType,

    /// Preset placeholder value (KEY=VALUE, repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,
}

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    gateprep completions --shell bash > /etc/bash_completion.d/gateprep\n\n\
                  Generate zsh completions:\n    gateprep completions --shell zsh > ~/.zfunc/_gateprep")]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(long, value_enum)]
    pub shell: clap_complete::Shell,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing_status() {
        let cli = Cli::try_parse_from(["gateprep", "status"]).unwrap();
        assert!(matches!(cli.command, Commands::Status));
        assert_eq!(cli.root, PathBuf::from("/"));
        assert_eq!(cli.templates, DEFAULT_TEMPLATE_BASE);
    }

    #[test]
    fn test_cli_parsing_configure() {
        let cli = Cli::try_parse_from([
            "gateprep",
            "configure",
            "--site-type",
            "cc",
            "--set",
            "SITE_NAME=North",
            "--set",
            "SITE_ID=12345",
        ])
        .unwrap();
        match cli.command {
            Commands::Configure(args) => {
                assert_eq!(args.site_type, SiteType::Cc);
                assert_eq!(args.set, vec!["SITE_NAME=North", "SITE_ID=12345"]);
            }
            _ => panic!("Expected Configure command"),
        }
    }

    #[test]
    fn test_cli_parsing_configure_requires_site_type() {
        assert!(Cli::try_parse_from(["gateprep", "configure"]).is_err());
    }

    #[test]
    fn test_cli_global_options() {
        let cli = Cli::try_parse_from([
            "gateprep",
            "--root",
            "/tmp/sandbox",
            "--templates",
            "./templates",
            "-y",
            "menu",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Menu));
        assert_eq!(cli.root, PathBuf::from("/tmp/sandbox"));
        assert_eq!(cli.templates, "./templates");
        assert!(cli.yes);
    }

    #[test]
    fn test_cli_parsing_site_types() {
        for (arg, expected) in [
            ("cc", SiteType::Cc),
            ("voice", SiteType::Voice),
            ("full", SiteType::Full),
        ] {
            let cli =
                Cli::try_parse_from(["gateprep", "configure", "--site-type", arg]).unwrap();
            match cli.command {
                Commands::Configure(args) => assert_eq!(args.site_type, expected),
                _ => panic!("Expected Configure command"),
            }
        }
    }

    #[test]
    fn test_cli_parsing_completions() {
        let cli = Cli::try_parse_from(["gateprep", "completions", "--shell", "bash"]).unwrap();
        match cli.command {
            Commands::Completions(args) => assert_eq!(args.shell, clap_complete::Shell::Bash),
            _ => panic!("Expected Completions command"),
        }
    }

    #[test]
    fn test_cli_parsing_completions_rejects_unknown_shell() {
        assert!(Cli::try_parse_from(["gateprep", "completions", "--shell", "tcsh"]).is_err());
    }
}
