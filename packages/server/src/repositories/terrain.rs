use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use common::storage::{ObjectStore, SIGNED_URL_TTL_SECS, StorageError, photo_key};
use futures::future::try_join_all;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::LikeExpr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::*;
use thiserror::Error;
use tracing::instrument;
use uuid::Uuid;

use crate::entity::terrain::Orientation;
use crate::entity::{photo, terrain};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Db(#[from] DbErr),

    #[error("object store error: {0}")]
    Storage(#[from] StorageError),
}

pub type RepoResult<T> = Result<T, RepositoryError>;

/// Comparison applied to the price column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PriceOp {
    Lte,
    Gte,
}

/// Price filter written as `op.value`, e.g. `lte.150000` or `gte.99.5`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PriceFilter {
    pub op: PriceOp,
    pub value: f64,
}

impl FromStr for PriceFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (op, value) = s
            .split_once('.')
            .ok_or_else(|| format!("Price filter must look like 'lte.<n>' or 'gte.<n>', got '{s}'"))?;

        let op = match op {
            "lte" => PriceOp::Lte,
            "gte" => PriceOp::Gte,
            other => return Err(format!("Unknown price operator '{other}', expected lte or gte")),
        };

        let value: f64 = value
            .parse()
            .map_err(|_| format!("Invalid price value '{value}'"))?;
        if !value.is_finite() {
            return Err(format!("Invalid price value '{value}'"));
        }

        Ok(Self { op, value })
    }
}

/// Listing filters. Every supplied filter must match.
#[derive(Clone, Debug, Default)]
pub struct TerrainFilter {
    /// Case-insensitive substring of the name.
    pub nom: Option<String>,
    pub prix: Option<PriceFilter>,
    pub user_id: Option<Uuid>,
}

/// 1-based page request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Page {
    pub number: u64,
    pub size: u64,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            number: 1,
            size: 10,
        }
    }
}

/// Postgres binds LIMIT and OFFSET as BIGINT.
const MAX_ROWS: u64 = i64::MAX as u64;

impl Page {
    /// Rows to skip, capped at `i64::MAX`.
    pub fn offset(&self) -> u64 {
        Ord::min(
            self.number.saturating_sub(1).saturating_mul(self.size),
            MAX_ROWS,
        )
    }

    /// Rows to return, capped at `i64::MAX`.
    pub fn limit(&self) -> u64 {
        Ord::min(self.size, MAX_ROWS)
    }
}

/// Writable terrain fields. Updates replace all of them.
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainData {
    pub nom: String,
    pub latitude: f64,
    pub longitude: f64,
    pub surface: f64,
    pub surface_constructible: f64,
    pub prix: f64,
    pub longueur_facade: f64,
    pub orientation_facade: Orientation,
}

/// A photo with a freshly issued read URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedPhoto {
    pub id: Uuid,
    pub url: String,
}

/// A terrain together with its signed photos.
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainDetails {
    pub terrain: terrain::Model,
    pub photos: Vec<SignedPhoto>,
}

/// Reads and writes terrains across the relational store and the object store.
#[derive(Clone)]
pub struct TerrainRepository {
    db: DatabaseConnection,
    store: Arc<dyn ObjectStore>,
}

impl TerrainRepository {
    pub fn new(db: DatabaseConnection, store: Arc<dyn ObjectStore>) -> Self {
        Self { db, store }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, filter: &TerrainFilter, page: Page) -> RepoResult<Vec<TerrainDetails>> {
        let terrains = list_query(filter, page).all(&self.db).await?;
        if terrains.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = terrains.iter().map(|t| t.id).collect();
        let mut photos_by_terrain: HashMap<Uuid, Vec<photo::Model>> = HashMap::new();
        for p in photo::Entity::find()
            .filter(photo::Column::TerrainId.is_in(ids))
            .order_by_asc(photo::Column::CreatedAt)
            .order_by_asc(photo::Column::Id)
            .all(&self.db)
            .await?
        {
            photos_by_terrain.entry(p.terrain_id).or_default().push(p);
        }

        let mut out = Vec::with_capacity(terrains.len());
        for terrain in terrains {
            let photos = photos_by_terrain.remove(&terrain.id).unwrap_or_default();
            let photos = self.sign_photos(&photos).await?;
            out.push(TerrainDetails { terrain, photos });
        }
        Ok(out)
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: Uuid) -> RepoResult<Option<TerrainDetails>> {
        let Some(terrain) = terrain::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let photos = photo::Entity::find()
            .filter(photo::Column::TerrainId.eq(id))
            .order_by_asc(photo::Column::CreatedAt)
            .order_by_asc(photo::Column::Id)
            .all(&self.db)
            .await?;
        let photos = self.sign_photos(&photos).await?;

        Ok(Some(TerrainDetails { terrain, photos }))
    }

    /// Owning user of a terrain, if it exists.
    pub async fn owner_of(&self, id: Uuid) -> RepoResult<Option<Uuid>> {
        Ok(terrain::Entity::find_by_id(id)
            .select_only()
            .column(terrain::Column::UserId)
            .into_tuple::<Uuid>()
            .one(&self.db)
            .await?)
    }

    #[instrument(skip(self, data), fields(nom = %data.nom))]
    pub async fn create(&self, user_id: Uuid, data: TerrainData) -> RepoResult<terrain::Model> {
        let now = Utc::now();
        let new_terrain = terrain::ActiveModel {
            id: Set(Uuid::now_v7()),
            nom: Set(data.nom),
            latitude: Set(data.latitude),
            longitude: Set(data.longitude),
            surface: Set(data.surface),
            surface_constructible: Set(data.surface_constructible),
            prix: Set(data.prix),
            longueur_facade: Set(data.longueur_facade),
            orientation_facade: Set(data.orientation_facade),
            user_id: Set(user_id),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(new_terrain.insert(&self.db).await?)
    }

    /// Replace every writable field. `None` when no terrain has this id.
    #[instrument(skip(self, data))]
    pub async fn update(&self, id: Uuid, data: TerrainData) -> RepoResult<Option<terrain::Model>> {
        let active = terrain::ActiveModel {
            id: Unchanged(id),
            nom: Set(data.nom),
            latitude: Set(data.latitude),
            longitude: Set(data.longitude),
            surface: Set(data.surface),
            surface_constructible: Set(data.surface_constructible),
            prix: Set(data.prix),
            longueur_facade: Set(data.longueur_facade),
            orientation_facade: Set(data.orientation_facade),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };

        match active.update(&self.db).await {
            Ok(model) => Ok(Some(model)),
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a terrain and its photos. `false` when no terrain has this id.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> RepoResult<bool> {
        let txn = self.db.begin().await?;

        let photos = photo::Entity::find()
            .filter(photo::Column::TerrainId.eq(id))
            .all(&txn)
            .await?;
        if !photos.is_empty() {
            photo::Entity::delete_many()
                .filter(photo::Column::TerrainId.eq(id))
                .exec(&txn)
                .await?;
        }

        let res = terrain::Entity::delete_by_id(id).exec(&txn).await?;
        if res.rows_affected == 0 {
            return Ok(false);
        }
        txn.commit().await?;

        // Rows are gone; a leftover object is only wasted space.
        for p in photos {
            let key = photo_key(id, p.id);
            if let Err(e) = self.store.delete(&key).await {
                tracing::warn!(key = %key, "Failed to delete photo object: {}", e);
            }
        }

        Ok(true)
    }

    /// Store a new photo for a terrain. `None` when the terrain does not exist.
    ///
    /// The photo row is removed again if the upload fails.
    #[instrument(skip(self, data), fields(size = data.len()))]
    pub async fn add_photo(
        &self,
        terrain_id: Uuid,
        data: &[u8],
        content_type: &str,
    ) -> RepoResult<Option<SignedPhoto>> {
        if terrain::Entity::find_by_id(terrain_id)
            .one(&self.db)
            .await?
            .is_none()
        {
            return Ok(None);
        }

        // The row is committed before the upload so no pooled connection is
        // held open while the bytes travel to the object store.
        let photo = photo::ActiveModel {
            id: Set(Uuid::now_v7()),
            terrain_id: Set(terrain_id),
            content_type: Set(content_type.to_string()),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await?;

        let key = photo_key(terrain_id, photo.id);
        if let Err(e) = self.store.put(&key, data, content_type).await {
            if let Err(cleanup) = photo::Entity::delete_by_id(photo.id).exec(&self.db).await {
                tracing::warn!(key = %key, "Failed to remove photo row after failed upload: {}", cleanup);
            }
            return Err(e.into());
        }

        let url = self.signed_url(terrain_id, photo.id).await?;
        Ok(Some(SignedPhoto { id: photo.id, url }))
    }

    /// Remove a photo row and its object. `false` when the terrain has no such photo.
    ///
    /// The row deletion is rolled back if the object cannot be deleted.
    #[instrument(skip(self))]
    pub async fn delete_photo(&self, terrain_id: Uuid, photo_id: Uuid) -> RepoResult<bool> {
        let txn = self.db.begin().await?;

        let res = photo::Entity::delete_many()
            .filter(photo::Column::Id.eq(photo_id))
            .filter(photo::Column::TerrainId.eq(terrain_id))
            .exec(&txn)
            .await?;
        if res.rows_affected == 0 {
            return Ok(false);
        }

        let key = photo_key(terrain_id, photo_id);
        self.store.delete(&key).await?;
        if let Err(e) = txn.commit().await {
            tracing::warn!(key = %key, "Photo object deleted but row removal failed to commit: {}", e);
            return Err(e.into());
        }

        Ok(true)
    }

    async fn sign_photos(&self, photos: &[photo::Model]) -> RepoResult<Vec<SignedPhoto>> {
        try_join_all(photos.iter().map(|p| async move {
            let url = self.signed_url(p.terrain_id, p.id).await?;
            Ok::<_, RepositoryError>(SignedPhoto { id: p.id, url })
        }))
        .await
    }

    async fn signed_url(&self, terrain_id: Uuid, photo_id: Uuid) -> RepoResult<String> {
        Ok(self
            .store
            .presign_get(&photo_key(terrain_id, photo_id), SIGNED_URL_TTL_SECS)
            .await?)
    }
}

fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Build the filtered, paginated terrain query.
fn list_query(filter: &TerrainFilter, page: Page) -> Select<terrain::Entity> {
    let mut select = terrain::Entity::find();

    if let Some(nom) = filter.nom.as_deref().filter(|n| !n.is_empty()) {
        select = select.filter(
            Expr::col(terrain::Column::Nom)
                .ilike(LikeExpr::new(format!("%{}%", escape_like(nom))).escape('\\')),
        );
    }

    match filter.prix {
        Some(PriceFilter {
            op: PriceOp::Lte,
            value,
        }) => select = select.filter(terrain::Column::Prix.lte(value)),
        Some(PriceFilter {
            op: PriceOp::Gte,
            value,
        }) => select = select.filter(terrain::Column::Prix.gte(value)),
        None => {}
    }

    if let Some(user_id) = filter.user_id {
        select = select.filter(terrain::Column::UserId.eq(user_id));
    }

    select
        .order_by_asc(terrain::Column::CreatedAt)
        .order_by_asc(terrain::Column::Id)
        .offset(Some(page.offset()))
        .limit(Some(page.limit()))
}
