use async_trait::async_trait;

use super::error::StorageError;

/// Key-addressed object storage.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload `data` under `key` with the declared content type.
    async fn put(&self, key: &str, data: &[u8], content_type: &str) -> Result<(), StorageError>;

    /// Retrieve all bytes stored under `key`.
    async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError>;

    /// Delete the object stored under `key`.
    ///
    /// Deleting a missing object is not an error.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// Issue a time-limited read URL for `key`.
    async fn presign_get(&self, key: &str, expiry_secs: u32) -> Result<String, StorageError>;
}
