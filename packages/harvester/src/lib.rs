//! FIRDS Harvester - Download ESMA DLTINS instrument files and publish them as CSV.
//!
//! This crate queries the ESMA FIRDS file registry for a publication window,
//! downloads the first `DLTINS` archive listed, extracts six attributes per
//! financial instrument into a CSV file and uploads that file to S3.
//!
//! # Example
//!
//! ```
//! use firds_harvester::index::resolve_download_link;
//!
//! let index = r#"<response><lst/><result><doc>
//!   <str name="download_link">http://example.com/DLTINS_1.zip</str>
//!   <str name="file_type">DLTINS</str>
//! </doc></result></response>"#;
//! assert_eq!(
//!     resolve_download_link(index, "DLTINS").unwrap(),
//!     "http://example.com/DLTINS_1.zip"
//! );
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Constants, date validation and run settings
//! - [`types`]: The instrument row type and CSV columns
//! - [`error`]: Error types and Result alias
//! - [`http`]: HTTP client and file downloads
//! - [`index`]: Registry index download and link resolution
//! - [`archive`]: Archive download and extraction
//! - [`xml`]: Positional XML navigation and tree display
//! - [`instruments`]: Instrument record extraction
//! - [`table`]: CSV writing and reading
//! - [`publish`]: Object store publishing
//! - [`pipeline`]: The end-to-end run
//! - [`cli`]: Command-line interface

pub mod archive;
pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod index;
pub mod instruments;
pub mod pipeline;
pub mod publish;
pub mod table;
pub mod types;
pub mod xml;

// Re-export main functions
pub use pipeline::{harvest, run, RunSummary};

// Re-export commonly used items
pub use config::{validate_date, HarvestConfig};
pub use error::{HarvesterError, Result};
pub use publish::{ObjectStore, S3Store};
pub use types::InstrumentRecord;
