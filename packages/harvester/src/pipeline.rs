//! Main harvester pipeline that ties all components together.
//!
//! Steps run strictly in order; the first error aborts the run, except for
//! bucket creation which is allowed to fail.

use std::path::{Path, PathBuf};

use reqwest::blocking::Client;

use crate::archive::{extract_archive, fetch_archive};
use crate::config::HarvestConfig;
use crate::error::Result;
use crate::http::create_client;
use crate::index::{fetch_index, resolve_download_link};
use crate::instruments::extract_instruments_from_file;
use crate::publish::{ensure_bucket, publish, ObjectStore};
use crate::table::write_csv;

/// Pipeline step, reported before it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    FetchIndex,
    ResolveLink,
    FetchArchive,
    ExtractArchive,
    ExtractRecords,
    WriteTable,
    Publish,
}

impl Step {
    /// Short progress message for the step.
    #[must_use]
    pub fn describe(&self) -> &'static str {
        match self {
            Self::FetchIndex => "Downloading index...",
            Self::ResolveLink => "Resolving download link...",
            Self::FetchArchive => "Downloading archive...",
            Self::ExtractArchive => "Extracting archive...",
            Self::ExtractRecords => "Extracting instruments...",
            Self::WriteTable => "Writing CSV...",
            Self::Publish => "Publishing to object store...",
        }
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub download_link: String,
    pub data_file: PathBuf,
    pub row_count: usize,
    pub csv_path: PathBuf,
    /// `None` when publishing was skipped.
    pub bucket_created: Option<bool>,
    pub uploaded: bool,
}

/// Run the whole pipeline with a fresh HTTP client.
///
/// Pass `None` as `store` to stop after writing the CSV locally.
pub fn harvest(config: &HarvestConfig, store: Option<&dyn ObjectStore>) -> Result<RunSummary> {
    let client = create_client()?;
    run(config, &client, store, &mut |_| {})
}

/// Run the whole pipeline, calling `progress` before each step.
pub fn run(
    config: &HarvestConfig,
    client: &Client,
    store: Option<&dyn ObjectStore>,
    progress: &mut dyn FnMut(Step),
) -> Result<RunSummary> {
    config.validate()?;

    progress(Step::FetchIndex);
    let index_xml = fetch_index(client, &config.index_url, &config.index_path())?;

    progress(Step::ResolveLink);
    let download_link = resolve_download_link(&index_xml, &config.file_type)?;

    progress(Step::FetchArchive);
    let archive_path = config.archive_path();
    fetch_archive(client, &download_link, &archive_path)?;

    progress(Step::ExtractArchive);
    let data_file = extract_archive(&archive_path, &config.extract_dir())?;

    progress(Step::ExtractRecords);
    let records = extract_instruments_from_file(&data_file)?;

    progress(Step::WriteTable);
    let csv_path = config.csv_path();
    write_csv(&records, &csv_path)?;

    let (bucket_created, uploaded) = match store {
        Some(store) => {
            progress(Step::Publish);
            let created = ensure_bucket(store, &config.bucket, &config.region);
            publish(store, &csv_path, &config.bucket, &config.object_key)?;
            (Some(created), true)
        }
        None => {
            tracing::info!("Publishing skipped");
            (None, false)
        }
    };

    Ok(RunSummary {
        download_link,
        data_file,
        row_count: records.len(),
        csv_path,
        bucket_created,
        uploaded,
    })
}

/// Convert a local working document, or an archive holding one, to CSV.
///
/// Files ending in `.zip` are extracted into `extract_dir` first.
///
/// # Returns
/// Number of rows written
pub fn convert_local(input: &Path, output: &Path, extract_dir: &Path) -> Result<usize> {
    let data_file = working_file(input, extract_dir)?;
    let records = extract_instruments_from_file(&data_file)?;
    write_csv(&records, output)?;
    Ok(records.len())
}

/// Resolve a local input to the working XML file.
///
/// Files ending in `.zip` are extracted into `extract_dir`; anything else is
/// taken to be the XML itself.
pub fn working_file(input: &Path, extract_dir: &Path) -> Result<PathBuf> {
    let is_zip = input
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"));

    if is_zip {
        extract_archive(input, extract_dir)
    } else {
        Ok(input.to_path_buf())
    }
}
