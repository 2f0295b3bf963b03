//! Template retrieval by identifier.
//!
//! The template source is either an `https://` base URL (the normal case) or
//! a local directory (staging and tests). Fetches are never cached: a session
//! always sees the current upstream text.

use std::fs;
use std::path::PathBuf;

use super::Template;
use crate::error::{GateprepError, Result};
use crate::net;

/// Where templates come from.
#[derive(Debug, Clone)]
pub enum TemplateSource {
    Url(String),
    Dir(PathBuf),
}

impl TemplateSource {
    /// `http(s)://...` is a URL base; anything else is a directory.
    pub fn parse(spec: &str) -> Self {
        if spec.starts_with("http://") || spec.starts_with("https://") {
            TemplateSource::Url(spec.trim_end_matches('/').to_string())
        } else {
            TemplateSource::Dir(PathBuf::from(spec))
        }
    }
}

pub struct TemplateFetcher {
    source: TemplateSource,
}

impl TemplateFetcher {
    pub fn new(source: TemplateSource) -> Self {
        Self { source }
    }

    /// Retrieve the named template. Any transport or read failure maps to
    /// [`GateprepError::TemplateFetchFailed`]; the caller decides whether to
    /// abort or retry.
    pub fn fetch(&self, id: &str) -> Result<Template> {
        match &self.source {
            TemplateSource::Url(base) => {
                let url = format!("{base}/{id}");
                let raw_text =
                    net::get_text(&url).map_err(|e| GateprepError::TemplateFetchFailed {
                        id: id.to_string(),
                        reason: e.to_string(),
                    })?;
                Ok(Template {
                    id: id.to_string(),
                    source: url,
                    raw_text,
                })
            }
            TemplateSource::Dir(dir) => {
                let path = dir.join(id);
                let raw_text =
                    fs::read_to_string(&path).map_err(|e| GateprepError::TemplateFetchFailed {
                        id: id.to_string(),
                        reason: format!("{}: {e}", path.display()),
                    })?;
                Ok(Template {
                    id: id.to_string(),
                    source: path.display().to_string(),
                    raw_text,
                })
            }
        }
    }
}
