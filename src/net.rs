//! Blocking HTTP fetch helpers.
//!
//! All remote transfers go through here: templates, the mesh-client
//! installer script and the application archive. No internal timeout is set;
//! transfers block until the transport completes or fails.

use crate::error::{GateprepError, Result};

fn get(url: &str) -> Result<reqwest::blocking::Response> {
    let response =
        reqwest::blocking::get(url).map_err(|e| GateprepError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
    if !response.status().is_success() {
        return Err(GateprepError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }
    Ok(response)
}

pub fn get_text(url: &str) -> Result<String> {
    get(url)?.text().map_err(|e| GateprepError::DownloadFailed {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

pub fn get_bytes(url: &str) -> Result<Vec<u8>> {
    let bytes = get(url)?
        .bytes()
        .map_err(|e| GateprepError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
    Ok(bytes.to_vec())
}
