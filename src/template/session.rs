//! One configuration session: site type -> template list -> fetched,
//! collected, substituted, atomically persisted.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use console::style;
use tempfile::NamedTempFile;

use super::collect::{self, ValueSource};
use super::fetch::TemplateFetcher;
use super::{extract_placeholders, substitute};
use crate::error::{GateprepError, Result};

/// Which template set a session processes.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteType {
    /// Control-channel site
    Cc,
    /// Voice-channel site
    Voice,
    /// Control channel plus voice channel
    Full,
}

impl SiteType {
    pub fn template_ids(self) -> &'static [&'static str] {
        match self {
            SiteType::Cc => &["configCC.yml"],
            SiteType::Voice => &["configVC.yml"],
            SiteType::Full => &["configCC.yml", "configVC.yml"],
        }
    }
}

/// Orchestrates fetch -> extract -> collect -> substitute -> persist for
/// each template of a site type. A failure aborts the session; files already
/// persisted by earlier templates of the same session stay on disk.
pub struct ConfigSession<'a> {
    fetcher: &'a TemplateFetcher,
    config_dir: PathBuf,
    source: &'a mut dyn ValueSource,
}

impl<'a> ConfigSession<'a> {
    pub fn new(
        fetcher: &'a TemplateFetcher,
        config_dir: impl Into<PathBuf>,
        source: &'a mut dyn ValueSource,
    ) -> Self {
        Self {
            fetcher,
            config_dir: config_dir.into(),
            source,
        }
    }

    /// Process every template of `site_type`, returning the persisted paths.
    pub fn run(&mut self, site_type: SiteType) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        for id in site_type.template_ids() {
            let path = self.process_template(id)?;
            println!("{} {}", style("Wrote").green().bold(), path.display());
            written.push(path);
        }
        Ok(written)
    }

    fn process_template(&mut self, id: &str) -> Result<PathBuf> {
        let template = self.fetcher.fetch(id)?;
        let placeholders = extract_placeholders(&template.raw_text);

        // Zero placeholders short-circuits straight to persisting raw text.
        let final_text = if placeholders.is_empty() {
            template.raw_text.clone()
        } else {
            let bindings: BTreeMap<String, String> =
                collect::collect_all(&placeholders, self.source)?;
            substitute(&template.raw_text, &bindings)
        };

        if serde_yaml::from_str::<serde_yaml::Value>(&final_text).is_err() {
            eprintln!(
                "{} generated {id} is not well-formed YAML",
                style("warning:").yellow().bold()
            );
        }

        self.persist(id, &final_text)
    }

    /// Write to a staging file in the config directory, then rename into
    /// place. The final path either does not exist or holds the fully
    /// substituted text; no intermediate state is ever visible.
    fn persist(&self, id: &str, text: &str) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.config_dir).map_err(|e| {
            GateprepError::FileWriteFailed {
                path: self.config_dir.display().to_string(),
                reason: e.to_string(),
            }
        })?;
        let final_path = self.config_dir.join(id);

        let mut staging = NamedTempFile::new_in(&self.config_dir).map_err(|e| {
            GateprepError::FileWriteFailed {
                path: self.config_dir.display().to_string(),
                reason: e.to_string(),
            }
        })?;
        staging
            .write_all(text.as_bytes())
            .map_err(|e| write_failed(&final_path, e.to_string()))?;
        staging
            .persist(&final_path)
            .map_err(|e| write_failed(&final_path, e.to_string()))?;
        Ok(final_path)
    }
}

fn write_failed(path: &Path, reason: String) -> GateprepError {
    GateprepError::FileWriteFailed {
        path: path.display().to_string(),
        reason,
    }
}
