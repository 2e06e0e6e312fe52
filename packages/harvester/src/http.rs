//! HTTP client wrapper for downloading the index and archives.
//!
//! Requests are made once; there is no retry. Timeouts are the client
//! defaults.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use reqwest::blocking::Client;

use crate::config::USER_AGENT;
use crate::error::Result;

/// Create a configured HTTP client.
///
/// # Returns
/// A `reqwest::blocking::Client` identifying itself with the harvester user agent.
pub fn create_client() -> Result<Client> {
    let client = Client::builder().user_agent(USER_AGENT).build()?;
    Ok(client)
}

/// Download `url` and stream the body into `path`, overwriting it.
///
/// Parent directories are created if missing. Error statuses (4xx/5xx) are
/// returned as `HarvesterError::Http` before anything is written.
///
/// # Returns
/// Number of bytes written
pub fn download_to_file(client: &Client, url: &str, path: &Path) -> Result<u64> {
    tracing::debug!(url, path = %path.display(), "Downloading");

    let mut response = client.get(url).send()?.error_for_status()?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = BufWriter::new(File::create(path)?);
    let written = response.copy_to(&mut writer)?;
    writer.flush()?;

    Ok(written)
}
