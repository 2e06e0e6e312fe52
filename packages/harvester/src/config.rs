//! Configuration constants and validation functions for the harvester.

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{HarvesterError, Result};

/// Solr core serving the FIRDS file registry.
pub const FIRDS_SOLR_URL: &str = "https://registers.esma.europa.eu/solr/esma_registers_firds_files";

/// Default start of the publication window (inclusive).
pub const DEFAULT_FROM_DATE: &str = "2021-01-17";

/// Default end of the publication window (inclusive).
pub const DEFAULT_TO_DATE: &str = "2021-01-19";

/// Number of index records requested per query.
pub const INDEX_ROWS: u32 = 100;

/// Document type whose archive is harvested.
pub const TARGET_FILE_TYPE: &str = "DLTINS";

/// Local file the index response is persisted to.
pub const INDEX_FILE_NAME: &str = "source.xml";

/// Local file the downloaded archive is persisted to.
pub const ARCHIVE_FILE_NAME: &str = "zip_data.zip";

/// Directory the archive is extracted into.
pub const EXTRACT_DIR_NAME: &str = "data";

/// Local CSV output file. Also the default object key.
pub const CSV_FILE_NAME: &str = "data.csv";

/// Bucket the CSV is published to.
///
/// Bucket names are global across all AWS accounts, so this may already be
/// taken; override with `FIRDS_BUCKET` or `--bucket`.
pub const DEFAULT_BUCKET: &str = "steel-eye-task";

/// Region the bucket is created in.
pub const DEFAULT_REGION: &str = "us-east-2";

/// User agent string identifying this harvester.
pub const USER_AGENT: &str = concat!("firds-harvester/", env!("CARGO_PKG_VERSION"));

/// Date pattern: YYYY-MM-DD.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid regex"));

/// Validate date format (YYYY-MM-DD).
///
/// # Examples
/// ```
/// use firds_harvester::config::validate_date;
///
/// assert!(validate_date("2021-01-17").is_ok());
/// assert!(validate_date("invalid").is_err());
/// assert!(validate_date("2021-13-01").is_err()); // Invalid month
/// ```
pub fn validate_date(date_str: &str) -> Result<()> {
    if !DATE_PATTERN.is_match(date_str) {
        return Err(HarvesterError::InvalidDate(date_str.to_string()));
    }

    chrono::NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|_| HarvesterError::InvalidDate(date_str.to_string()))?;

    Ok(())
}

/// Build the index query URL for a publication window.
///
/// Both dates are inclusive and should be validated with `validate_date`
/// first. The response is requested as XML.
///
/// # Panics
/// Debug builds panic if the dates don't match the expected format.
pub fn index_url(from: &str, to: &str) -> String {
    debug_assert!(
        DATE_PATTERN.is_match(from) && DATE_PATTERN.is_match(to),
        "dates should be validated before calling index_url"
    );
    format!(
        "{FIRDS_SOLR_URL}/select?q=*&fq=publication_date:%5B{from}T00:00:00Z+TO+{to}T23:59:59Z%5D&wt=xml&indent=true&start=0&rows={INDEX_ROWS}"
    )
}

/// Settings for one harvester run.
#[derive(Debug, Clone, PartialEq)]
pub struct HarvestConfig {
    pub index_url: String,
    pub file_type: String,
    pub work_dir: PathBuf,
    pub bucket: String,
    pub region: String,
    pub object_key: String,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            index_url: index_url(DEFAULT_FROM_DATE, DEFAULT_TO_DATE),
            file_type: TARGET_FILE_TYPE.to_string(),
            work_dir: PathBuf::from("."),
            bucket: DEFAULT_BUCKET.to_string(),
            region: DEFAULT_REGION.to_string(),
            object_key: CSV_FILE_NAME.to_string(),
        }
    }
}

impl HarvestConfig {
    /// Load settings from `FIRDS_*` environment variables, falling back to
    /// the defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("FIRDS_INDEX_URL") {
            config.index_url = url;
        }
        if let Some(dir) = lookup("FIRDS_WORK_DIR") {
            config.work_dir = PathBuf::from(dir);
        }
        if let Some(bucket) = lookup("FIRDS_BUCKET") {
            config.bucket = bucket;
        }
        if let Some(region) = lookup("FIRDS_REGION") {
            config.region = region;
        }
        if let Some(key) = lookup("FIRDS_OBJECT_KEY") {
            config.object_key = key;
        }

        config.validate()?;
        Ok(config)
    }

    /// Query a different publication window.
    pub fn with_window(mut self, from: &str, to: &str) -> Result<Self> {
        validate_date(from)?;
        validate_date(to)?;
        if from > to {
            return Err(HarvesterError::Config(format!(
                "publication window starts after it ends ({from} > {to})"
            )));
        }
        self.index_url = index_url(from, to);
        Ok(self)
    }

    pub fn with_index_url(mut self, url: impl Into<String>) -> Self {
        self.index_url = url.into();
        self
    }

    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = dir.into();
        self
    }

    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Reject settings that would only fail later against the remote store.
    pub fn validate(&self) -> Result<()> {
        if self.index_url.trim().is_empty() {
            return Err(HarvesterError::Config("index URL is empty".into()));
        }
        if self.bucket.trim().is_empty() {
            return Err(HarvesterError::Config("bucket name is empty".into()));
        }
        if self.region.trim().is_empty() {
            return Err(HarvesterError::Config("region is empty".into()));
        }
        if self.object_key.trim().is_empty() {
            return Err(HarvesterError::Config("object key is empty".into()));
        }
        Ok(())
    }

    pub fn index_path(&self) -> PathBuf {
        self.work_dir.join(INDEX_FILE_NAME)
    }

    pub fn archive_path(&self) -> PathBuf {
        self.work_dir.join(ARCHIVE_FILE_NAME)
    }

    pub fn extract_dir(&self) -> PathBuf {
        self.work_dir.join(EXTRACT_DIR_NAME)
    }

    pub fn csv_path(&self) -> PathBuf {
        self.work_dir.join(CSV_FILE_NAME)
    }
}
