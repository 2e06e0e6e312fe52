//! Instrument archive download and extraction.
//!
//! DLTINS archives hold a single XML file. The working file is taken from the
//! archive's own entry list, so stale files left in the extraction directory
//! by earlier runs never influence which file is parsed.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use reqwest::blocking::Client;
use zip::ZipArchive;

use crate::error::{HarvesterError, Result};
use crate::http::download_to_file;

/// Download the archive at `url` to `path`, overwriting any existing file.
///
/// # Returns
/// Number of bytes written
pub fn fetch_archive(client: &Client, url: &str, path: &Path) -> Result<u64> {
    let bytes = download_to_file(client, url, path).map_err(|e| {
        if let HarvesterError::Http(source) = e {
            HarvesterError::ArchiveDownload {
                url: url.to_string(),
                source,
            }
        } else {
            e
        }
    })?;

    tracing::info!(path = %path.display(), bytes, "Archive downloaded");
    Ok(bytes)
}

/// Extract `archive_path` into `output_dir` and return the working data file.
///
/// The directory is created if missing. Existing files with the same names
/// are overwritten.
///
/// # Errors
/// * `Zip` if the archive is corrupt
/// * `EmptyArchive` if it holds no files
/// * `AmbiguousArchive` if it holds more than one file
pub fn extract_archive(archive_path: &Path, output_dir: &Path) -> Result<PathBuf> {
    let mut archive = ZipArchive::new(File::open(archive_path)?)?;

    let entries = file_entries(&mut archive)?;
    let entry = match entries.as_slice() {
        [] => {
            return Err(HarvesterError::EmptyArchive {
                path: archive_path.to_path_buf(),
            })
        }
        [single] => single.clone(),
        _ => {
            return Err(HarvesterError::AmbiguousArchive {
                path: archive_path.to_path_buf(),
                entries: entries
                    .iter()
                    .map(|p| p.to_string_lossy().into_owned())
                    .collect(),
            })
        }
    };

    fs::create_dir_all(output_dir)?;
    archive.extract(output_dir)?;

    let data_file = output_dir.join(entry);
    tracing::info!(
        archive = %archive_path.display(),
        file = %data_file.display(),
        "Archive extracted"
    );
    Ok(data_file)
}

/// List the relative paths of all file (non-directory) entries.
fn file_entries<R: io::Read + io::Seek>(archive: &mut ZipArchive<R>) -> Result<Vec<PathBuf>> {
    let mut entries = Vec::new();

    for i in 0..archive.len() {
        let file = archive.by_index(i)?;
        if file.is_dir() {
            continue;
        }
        let path = file.enclosed_name().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("archive entry escapes extraction directory: {}", file.name()),
            )
        })?;
        entries.push(path);
    }

    Ok(entries)
}
