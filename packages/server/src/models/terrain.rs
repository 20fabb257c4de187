use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::shared::{validate_non_negative, validate_range, validate_text};
use crate::entity::terrain::{self, Orientation};
use crate::error::AppError;
use crate::extractors::json::Validate;
use crate::repositories::terrain::{
    Page, PriceFilter, SignedPhoto, TerrainData, TerrainDetails, TerrainFilter,
};

/// Request body for creating or fully replacing a terrain.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TerrainRequest {
    /// Listing name (1-256 characters).
    #[schema(example = "Lot A")]
    pub nom: String,
    #[schema(example = 45.0)]
    pub latitude: f64,
    #[schema(example = 5.0)]
    pub longitude: f64,
    /// Total surface in square meters.
    #[schema(example = 500.0)]
    pub surface: f64,
    /// Buildable surface in square meters, at most `surface`.
    #[schema(example = 300.0)]
    pub surface_constructible: f64,
    #[schema(example = 100000.0)]
    pub prix: f64,
    /// Street frontage in meters.
    #[schema(example = 20.0)]
    pub longueur_facade: f64,
    pub orientation_facade: Orientation,
}

impl Validate for TerrainRequest {
    fn validate(&self) -> Result<(), AppError> {
        validate_text(&self.nom, "Name", 256)?;
        validate_range(self.latitude, -90.0, 90.0, "Latitude")?;
        validate_range(self.longitude, -180.0, 180.0, "Longitude")?;
        validate_non_negative(self.surface, "Surface")?;
        validate_non_negative(self.surface_constructible, "Buildable surface")?;
        validate_non_negative(self.prix, "Price")?;
        validate_non_negative(self.longueur_facade, "Facade length")?;
        if self.surface_constructible > self.surface {
            return Err(AppError::Validation(
                "Buildable surface cannot exceed surface".into(),
            ));
        }
        Ok(())
    }
}

impl From<TerrainRequest> for TerrainData {
    fn from(req: TerrainRequest) -> Self {
        Self {
            nom: req.nom.trim().to_string(),
            latitude: req.latitude,
            longitude: req.longitude,
            surface: req.surface,
            surface_constructible: req.surface_constructible,
            prix: req.prix,
            longueur_facade: req.longueur_facade,
            orientation_facade: req.orientation_facade,
        }
    }
}

/// Query parameters accepted by the terrain listing.
#[derive(Deserialize, Default, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct TerrainListQuery {
    /// 1-based page number. Default: 1.
    pub page: Option<u64>,
    /// Page size. Default: 10.
    pub items_per_page: Option<u64>,
    /// Case-insensitive substring of the name.
    pub nom: Option<String>,
    /// Price bound as `lte.<n>` or `gte.<n>`.
    #[param(example = "lte.150000")]
    pub prix: Option<String>,
    /// Only terrains owned by this user.
    pub user_id: Option<Uuid>,
}

impl TerrainListQuery {
    pub fn into_parts(self) -> Result<(TerrainFilter, Page), AppError> {
        let defaults = Page::default();
        let page = Page {
            number: self.page.unwrap_or(defaults.number),
            size: self.items_per_page.unwrap_or(defaults.size),
        };
        if page.number < 1 || page.size < 1 {
            return Err(AppError::Validation(
                "page and itemsPerPage must be >= 1".into(),
            ));
        }

        let prix = self
            .prix
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(str::parse::<PriceFilter>)
            .transpose()
            .map_err(AppError::Validation)?;

        let filter = TerrainFilter {
            nom: self.nom.filter(|n| !n.is_empty()),
            prix,
            user_id: self.user_id,
        };

        Ok((filter, page))
    }
}

/// A stored terrain record.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TerrainResponse {
    pub id: Uuid,
    #[schema(example = "Lot A")]
    pub nom: String,
    pub latitude: f64,
    pub longitude: f64,
    pub surface: f64,
    pub surface_constructible: f64,
    pub prix: f64,
    pub longueur_facade: f64,
    pub orientation_facade: Orientation,
    /// Owner of the listing.
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<terrain::Model> for TerrainResponse {
    fn from(model: terrain::Model) -> Self {
        Self {
            id: model.id,
            nom: model.nom,
            latitude: model.latitude,
            longitude: model.longitude,
            surface: model.surface,
            surface_constructible: model.surface_constructible,
            prix: model.prix,
            longueur_facade: model.longueur_facade,
            orientation_facade: model.orientation_facade,
            user_id: model.user_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// A photo with a read URL valid for one hour.
#[derive(Serialize, utoipa::ToSchema)]
pub struct PhotoResponse {
    pub id: Uuid,
    /// Signed object-store URL.
    pub url: String,
}

impl From<SignedPhoto> for PhotoResponse {
    fn from(photo: SignedPhoto) -> Self {
        Self {
            id: photo.id,
            url: photo.url,
        }
    }
}

/// A terrain with its photos.
#[derive(Serialize, utoipa::ToSchema)]
pub struct TerrainDetailsResponse {
    #[serde(flatten)]
    pub terrain: TerrainResponse,
    pub photos: Vec<PhotoResponse>,
}

impl From<TerrainDetails> for TerrainDetailsResponse {
    fn from(details: TerrainDetails) -> Self {
        Self {
            terrain: details.terrain.into(),
            photos: details.photos.into_iter().map(PhotoResponse::from).collect(),
        }
    }
}
