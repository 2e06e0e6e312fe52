//! FIRDS registry index: download and download-link resolution.
//!
//! The index is a Solr XML response:
//!
//! ```text
//! <response>
//!   <lst name="responseHeader">...</lst>
//!   <result name="response" numFound="..." start="0">
//!     <doc>
//!       <str name="checksum">...</str>
//!       <str name="download_link">http://.../DLTINS_20210117_01of01.zip</str>
//!       <str name="file_type">DLTINS</str>
//!       ...
//!     </doc>
//!     ...
//!   </result>
//! </response>
//! ```
//!
//! Only the first `doc` of the result is inspected.

use std::fs;
use std::path::Path;

use reqwest::blocking::Client;
use roxmltree::Document;

use crate::error::{HarvesterError, Result};
use crate::http::download_to_file;
use crate::xml::{element_children, get_attribute, get_text, nth_element_child};

/// Field holding the archive URL.
const DOWNLOAD_LINK_FIELD: &str = "download_link";

/// Field holding the document type.
const FILE_TYPE_FIELD: &str = "file_type";

/// Download the index and persist it verbatim to `path`.
///
/// Only successful responses are persisted. A 4xx/5xx status fails with
/// `IndexDownload` and leaves `path` unwritten, rather than saving the error
/// body as `source.xml`.
///
/// # Returns
/// The index document text
pub fn fetch_index(client: &Client, url: &str, path: &Path) -> Result<String> {
    let bytes = download_to_file(client, url, path).map_err(|e| {
        if let HarvesterError::Http(source) = e {
            HarvesterError::IndexDownload {
                url: url.to_string(),
                source,
            }
        } else {
            e
        }
    })?;

    tracing::info!(path = %path.display(), bytes, "Index downloaded");
    Ok(fs::read_to_string(path)?)
}

/// Resolve the archive link for `file_type` from index XML text.
///
/// Walks the fields of the first result record in document order, keeping
/// the most recent `download_link`. The first `file_type` field equal to
/// `file_type` selects that link.
///
/// # Errors
/// * `XmlParse` if the document is not well-formed
/// * `MissingElement` if the result container or first record is absent
/// * `LinkNotFound` if no matching `file_type` is preceded by a `download_link`
///
/// # Examples
/// ```
/// use firds_harvester::index::resolve_download_link;
///
/// let xml = r#"<response><lst/><result><doc>
///   <str name="download_link">http://a/1.zip</str>
///   <str name="file_type">DLTINS</str>
/// </doc></result></response>"#;
/// assert_eq!(resolve_download_link(xml, "DLTINS").unwrap(), "http://a/1.zip");
/// ```
pub fn resolve_download_link(xml: &str, file_type: &str) -> Result<String> {
    let doc = Document::parse(xml)?;
    let root = doc.root_element();

    let result = nth_element_child(root, 1).ok_or_else(|| HarvesterError::MissingElement {
        element: "result".to_string(),
        context: "index root (second child)".to_string(),
    })?;
    let record = nth_element_child(result, 0).ok_or_else(|| HarvesterError::MissingElement {
        element: "doc".to_string(),
        context: "index result (first child)".to_string(),
    })?;

    let mut last_link: Option<String> = None;
    let mut matched: Option<String> = None;

    for field in element_children(record) {
        match get_attribute(field, "name") {
            Some(DOWNLOAD_LINK_FIELD) => last_link = Some(get_text(field)),
            Some(FILE_TYPE_FIELD) if get_text(field) == file_type => {
                matched = last_link.take();
                break;
            }
            _ => {}
        }
    }

    match matched {
        Some(link) => {
            tracing::info!(file_type, link = %link, "Download link resolved");
            Ok(link)
        }
        None => Err(HarvesterError::LinkNotFound {
            file_type: file_type.to_string(),
        }),
    }
}

/// Resolve the archive link from an index file on disk.
pub fn resolve_download_link_from_file(path: &Path, file_type: &str) -> Result<String> {
    let xml = fs::read_to_string(path)?;
    resolve_download_link(&xml, file_type)
}
