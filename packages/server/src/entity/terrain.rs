use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Which way the street-facing side of the plot looks.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    DeriveActiveEnum,
    EnumIter,
    utoipa::ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum Orientation {
    #[serde(rename = "NORD")]
    #[sea_orm(string_value = "NORD")]
    North,
    #[serde(rename = "SUD")]
    #[sea_orm(string_value = "SUD")]
    South,
    #[serde(rename = "EST")]
    #[sea_orm(string_value = "EST")]
    East,
    #[serde(rename = "OUEST")]
    #[sea_orm(string_value = "OUEST")]
    West,
}

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "terrain")]
pub struct Model {
    /// UUIDv7 primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub nom: String,
    pub latitude: f64,
    pub longitude: f64,
    pub surface: f64,               // in square meters
    pub surface_constructible: f64, // in square meters
    pub prix: f64,
    pub longueur_facade: f64, // in meters
    pub orientation_facade: Orientation,

    pub user_id: Uuid,
    #[sea_orm(belongs_to, from = "user_id", to = "id")]
    pub user: HasOne<super::user::Entity>,

    #[sea_orm(has_many)]
    pub photos: HasMany<super::photo::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
