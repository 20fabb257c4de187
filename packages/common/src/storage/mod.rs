mod error;
mod traits;

#[cfg(feature = "object-storage")]
pub mod s3;

pub use error::StorageError;
pub use traits::ObjectStore;

use uuid::Uuid;

/// Lifetime of the read URLs handed out for stored photos.
pub const SIGNED_URL_TTL_SECS: u32 = 3600;

/// Object key of a terrain photo: `{terrainId}/{photoId}`.
pub fn photo_key(terrain_id: Uuid, photo_id: Uuid) -> String {
    format!("{terrain_id}/{photo_id}")
}
