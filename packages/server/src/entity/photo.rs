use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Relational half of a terrain photo. The bytes live in the object store
/// under `{terrain_id}/{id}`.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "photo")]
pub struct Model {
    /// UUIDv7 primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub terrain_id: Uuid,
    #[sea_orm(belongs_to, from = "terrain_id", to = "id")]
    pub terrain: HasOne<super::terrain::Entity>,

    /// MIME type declared at upload.
    pub content_type: String,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
