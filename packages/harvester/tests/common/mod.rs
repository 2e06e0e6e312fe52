#![allow(dead_code)]

use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use firds_harvester::{HarvesterError, ObjectStore, Result};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

pub const DATA_FILE_NAME: &str = "DLTINS_20210117_01of01.xml";

/// Load fixture file content.
pub fn load_fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to load {}: {}", path.display(), e))
}

/// Index fixture with its first download link pointing at `archive_url`.
pub fn index_xml(archive_url: &str) -> String {
    load_fixture("source.xml").replace("{{ARCHIVE_URL}}", archive_url)
}

/// Zip archive bytes holding the given files.
pub fn zip_bytes(files: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in files {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// DLTINS archive built from the working document fixture.
pub fn dltins_archive() -> Vec<u8> {
    let xml = load_fixture(DATA_FILE_NAME);
    zip_bytes(&[(DATA_FILE_NAME, xml.as_str())])
}

/// Recorded object store call.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    CreateBucket { name: String, region: String },
    Upload { path: PathBuf, bucket: String, key: String },
}

/// In-memory object store that records calls and keeps uploaded bodies.
#[derive(Default)]
pub struct RecordingStore {
    pub fail_create: bool,
    pub fail_upload: bool,
    pub calls: Mutex<Vec<StoreCall>>,
    pub uploads: Mutex<Vec<Vec<u8>>>,
}

impl RecordingStore {
    pub fn failing_create() -> Self {
        Self {
            fail_create: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl ObjectStore for RecordingStore {
    fn create_bucket(&self, name: &str, region: &str) -> Result<()> {
        self.calls.lock().unwrap().push(StoreCall::CreateBucket {
            name: name.to_string(),
            region: region.to_string(),
        });
        if self.fail_create {
            return Err(HarvesterError::ObjectStore {
                operation: "create_bucket".to_string(),
                message: "BucketAlreadyOwnedByYou".to_string(),
            });
        }
        Ok(())
    }

    fn upload_file(&self, path: &Path, bucket: &str, key: &str) -> Result<()> {
        self.calls.lock().unwrap().push(StoreCall::Upload {
            path: path.to_path_buf(),
            bucket: bucket.to_string(),
            key: key.to_string(),
        });
        if self.fail_upload {
            return Err(HarvesterError::ObjectStore {
                operation: "upload".to_string(),
                message: "AccessDenied".to_string(),
            });
        }
        self.uploads.lock().unwrap().push(fs::read(path)?);
        Ok(())
    }
}
