//! Publishing the CSV to a remote object store.
//!
//! The store is passed in explicitly as an [`ObjectStore`]; [`S3Store`] is the
//! AWS implementation. Credentials come from the ambient AWS configuration
//! (environment, profile, instance metadata).

use std::path::Path;

use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
use aws_sdk_s3::Client;
use tokio::runtime::Runtime;

use crate::error::{HarvesterError, Result};

/// Region in which S3 rejects an explicit location constraint.
const US_EAST_1: &str = "us-east-1";

/// Minimal object store interface used by the pipeline.
pub trait ObjectStore {
    /// Create a bucket named `name` in `region`.
    fn create_bucket(&self, name: &str, region: &str) -> Result<()>;

    /// Upload the file at `path` to `bucket` under `key`.
    fn upload_file(&self, path: &Path, bucket: &str, key: &str) -> Result<()>;
}

/// Try to create the bucket, logging and swallowing any failure.
///
/// Failure is expected when the bucket already exists, or when the name is
/// taken by another account. The upload is attempted either way.
///
/// # Returns
/// `true` if the bucket was created by this call
pub fn ensure_bucket(store: &dyn ObjectStore, name: &str, region: &str) -> bool {
    match store.create_bucket(name, region) {
        Ok(()) => {
            tracing::info!(bucket = name, region, "Bucket created");
            true
        }
        Err(e) => {
            tracing::warn!(
                bucket = name,
                region,
                error = %e,
                "Could not create bucket, continuing with upload. \
                 If the bucket does not exist, choose a more unique name"
            );
            false
        }
    }
}

/// Upload the CSV at `path` to `bucket` under `key`.
pub fn publish(store: &dyn ObjectStore, path: &Path, bucket: &str, key: &str) -> Result<()> {
    store.upload_file(path, bucket, key)?;
    tracing::info!(bucket, key, path = %path.display(), "File uploaded");
    Ok(())
}

/// S3-backed object store.
///
/// The SDK is async; calls are driven on a private current-thread runtime so
/// the pipeline stays blocking.
pub struct S3Store {
    runtime: Runtime,
    client: Client,
}

impl S3Store {
    /// Load the ambient AWS configuration and build a client for `region`.
    pub fn connect(region: &str) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let config = runtime.block_on(
            aws_config::defaults(aws_config::BehaviorVersion::latest())
                .region(Region::new(region.to_string()))
                .load(),
        );

        Ok(Self {
            runtime,
            client: Client::new(&config),
        })
    }
}

impl ObjectStore for S3Store {
    fn create_bucket(&self, name: &str, region: &str) -> Result<()> {
        let mut request = self.client.create_bucket().bucket(name);
        if region != US_EAST_1 {
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(region))
                    .build(),
            );
        }

        self.runtime
            .block_on(request.send())
            .map(|_| ())
            .map_err(|e| store_error("create_bucket", &e))
    }

    fn upload_file(&self, path: &Path, bucket: &str, key: &str) -> Result<()> {
        self.runtime.block_on(async {
            let body = ByteStream::from_path(path)
                .await
                .map_err(|e| store_error("upload", &e))?;

            self.client
                .put_object()
                .bucket(bucket)
                .key(key)
                .body(body)
                .send()
                .await
                .map_err(|e| store_error("upload", &e))?;

            Ok(())
        })
    }
}

fn store_error<E: std::error::Error>(operation: &str, err: &E) -> HarvesterError {
    HarvesterError::ObjectStore {
        operation: operation.to_string(),
        message: DisplayErrorContext(err).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingStore {
        fail_create: bool,
        fail_upload: bool,
        calls: RefCell<Vec<String>>,
    }

    impl ObjectStore for RecordingStore {
        fn create_bucket(&self, name: &str, region: &str) -> Result<()> {
            self.calls
                .borrow_mut()
                .push(format!("create_bucket {name} {region}"));
            if self.fail_create {
                return Err(HarvesterError::ObjectStore {
                    operation: "create_bucket".to_string(),
                    message: "BucketAlreadyExists".to_string(),
                });
            }
            Ok(())
        }

        fn upload_file(&self, path: &Path, bucket: &str, key: &str) -> Result<()> {
            self.calls
                .borrow_mut()
                .push(format!("upload {} {bucket} {key}", path.display()));
            if self.fail_upload {
                return Err(HarvesterError::ObjectStore {
                    operation: "upload".to_string(),
                    message: "AccessDenied".to_string(),
                });
            }
            Ok(())
        }
    }

    #[test]
    fn test_ensure_bucket_success() {
        let store = RecordingStore::default();
        assert!(ensure_bucket(&store, "steel-eye-task", "us-east-2"));
        assert_eq!(
            *store.calls.borrow(),
            vec!["create_bucket steel-eye-task us-east-2".to_string()]
        );
    }

    #[test]
    fn test_ensure_bucket_swallows_failure() {
        let store = RecordingStore {
            fail_create: true,
            ..Default::default()
        };
        assert!(!ensure_bucket(&store, "steel-eye-task", "us-east-2"));
    }

    #[test]
    fn test_upload_attempted_after_create_failure() {
        let store = RecordingStore {
            fail_create: true,
            ..Default::default()
        };

        ensure_bucket(&store, "b", "us-east-2");
        publish(&store, Path::new("data.csv"), "b", "data.csv").unwrap();

        assert_eq!(
            *store.calls.borrow(),
            vec![
                "create_bucket b us-east-2".to_string(),
                "upload data.csv b data.csv".to_string()
            ]
        );
    }

    #[test]
    fn test_upload_failure_propagates() {
        let store = RecordingStore {
            fail_upload: true,
            ..Default::default()
        };
        let err = publish(&store, Path::new("data.csv"), "b", "data.csv").unwrap_err();
        assert!(matches!(err, HarvesterError::ObjectStore { ref operation, .. } if operation == "upload"));
    }
}
