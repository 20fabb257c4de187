use async_trait::async_trait;
use config::{Config, Environment};
use s3::creds::Credentials;
use s3::error::S3Error;
use s3::{Bucket, Region};
use serde::Deserialize;

use super::error::StorageError;
use super::traits::ObjectStore;

/// Connection settings for an S3-compatible object store.
///
/// Read from `S3_ENDPOINT_URL`, `S3_ACCESS_KEY_ID` and `S3_SECRET_ACCESS_KEY`.
/// `S3_BUCKET` and `S3_REGION` are optional.
#[derive(Debug, Deserialize, Clone)]
pub struct S3Config {
    pub endpoint_url: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    #[serde(default = "default_bucket")]
    pub bucket: String,
    #[serde(default = "default_region")]
    pub region: String,
}

fn default_bucket() -> String {
    "photos".into()
}
fn default_region() -> String {
    "us-east-1".into()
}

impl S3Config {
    /// Load the configuration from the process environment.
    pub fn from_env() -> Result<Self, StorageError> {
        Self::from_environment(Environment::with_prefix("S3"))
    }

    fn from_environment(env: Environment) -> Result<Self, StorageError> {
        let cfg: Self = Config::builder()
            .add_source(env)
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| {
                StorageError::Config(format!(
                    "Missing S3 configuration in environment variables: {e}"
                ))
            })?;

        for (name, value) in [
            ("S3_ENDPOINT_URL", &cfg.endpoint_url),
            ("S3_ACCESS_KEY_ID", &cfg.access_key_id),
            ("S3_SECRET_ACCESS_KEY", &cfg.secret_access_key),
        ] {
            if value.trim().is_empty() {
                return Err(StorageError::Config(format!(
                    "Missing S3 configuration in environment variables: {name} is empty"
                )));
            }
        }

        Ok(cfg)
    }
}

/// Object store backed by an S3-compatible service, using path-style addressing.
pub struct S3ObjectStore {
    bucket: Box<Bucket>,
}

impl S3ObjectStore {
    pub fn new(cfg: &S3Config) -> Result<Self, StorageError> {
        let region = Region::Custom {
            region: cfg.region.clone(),
            endpoint: cfg.endpoint_url.clone(),
        };
        let credentials = Credentials::new(
            Some(&cfg.access_key_id),
            Some(&cfg.secret_access_key),
            None,
            None,
            None,
        )
        .map_err(|e| StorageError::Config(format!("Invalid S3 credentials: {e}")))?;

        let bucket = Bucket::new(&cfg.bucket, region, credentials)
            .map_err(|e| StorageError::Config(format!("Invalid S3 bucket settings: {e}")))?
            .with_path_style();

        tracing::info!(
            endpoint = %cfg.endpoint_url,
            bucket = %cfg.bucket,
            "Object store configured"
        );

        Ok(Self { bucket })
    }
}

fn check_status(status: u16, key: &str) -> Result<(), StorageError> {
    match status {
        200..=299 => Ok(()),
        404 => Err(StorageError::NotFound(key.to_string())),
        status => Err(StorageError::Backend {
            status,
            key: key.to_string(),
        }),
    }
}

fn map_s3_error(err: S3Error, key: &str) -> StorageError {
    match err {
        S3Error::HttpFailWithBody(status, _) => match check_status(status, key) {
            Err(e) => e,
            Ok(()) => StorageError::Request(format!("unexpected failure with status {status}")),
        },
        other => StorageError::Request(other.to_string()),
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(&self, key: &str, data: &[u8], content_type: &str) -> Result<(), StorageError> {
        let response = self
            .bucket
            .put_object_with_content_type(key, data, content_type)
            .await
            .map_err(|e| map_s3_error(e, key))?;
        check_status(response.status_code(), key)
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let response = self
            .bucket
            .get_object(key)
            .await
            .map_err(|e| map_s3_error(e, key))?;
        check_status(response.status_code(), key)?;
        Ok(response.bytes().to_vec())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let response = self
            .bucket
            .delete_object(key)
            .await
            .map_err(|e| map_s3_error(e, key));

        match response {
            Ok(r) => match check_status(r.status_code(), key) {
                Err(StorageError::NotFound(_)) => Ok(()),
                other => other,
            },
            Err(StorageError::NotFound(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }

    async fn presign_get(&self, key: &str, expiry_secs: u32) -> Result<String, StorageError> {
        self.bucket
            .presign_get(key, expiry_secs, None)
            .await
            .map_err(|e| map_s3_error(e, key))
    }
}
