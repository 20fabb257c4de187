use std::sync::Arc;

use common::storage::ObjectStore;
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::repositories::TerrainRepository;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
    pub terrains: TerrainRepository,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: AppConfig, store: Arc<dyn ObjectStore>) -> Self {
        Self {
            terrains: TerrainRepository::new(db.clone(), store),
            db,
            config,
        }
    }
}
