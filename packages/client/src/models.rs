use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct RegisterParams {
    pub username: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginParams {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    #[serde(rename = "NORD")]
    North,
    #[serde(rename = "SUD")]
    South,
    #[serde(rename = "EST")]
    East,
    #[serde(rename = "OUEST")]
    West,
}

impl Orientation {
    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::North => "NORD",
            Orientation::South => "SUD",
            Orientation::East => "EST",
            Orientation::West => "OUEST",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Orientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "NORD" | "NORTH" | "N" => Ok(Orientation::North),
            "SUD" | "SOUTH" | "S" => Ok(Orientation::South),
            "EST" | "EAST" | "E" => Ok(Orientation::East),
            "OUEST" | "WEST" | "W" | "O" => Ok(Orientation::West),
            other => Err(format!(
                "unknown orientation '{other}', expected NORD, SUD, EST or OUEST"
            )),
        }
    }
}

/// Fields of a terrain as sent on create or update.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TerrainParams {
    pub nom: String,
    pub latitude: f64,
    pub longitude: f64,
    pub surface: f64,
    pub surface_constructible: f64,
    pub prix: f64,
    pub longueur_facade: f64,
    pub orientation_facade: Orientation,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Photo {
    pub id: Uuid,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Terrain {
    pub id: Uuid,
    pub nom: String,
    pub latitude: f64,
    pub longitude: f64,
    pub surface: f64,
    pub surface_constructible: f64,
    pub prix: f64,
    pub longueur_facade: f64,
    pub orientation_facade: Orientation,
    pub user_id: Uuid,
    /// Empty on the create response, which carries no photos.
    #[serde(default)]
    pub photos: Vec<Photo>,
}

/// Filters and paging for the terrain listing. Unset fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TerrainQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items_per_page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nom: Option<String>,
    /// `lte.<n>` or `gte.<n>`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
}
