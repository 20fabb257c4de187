use std::time::Duration;

use sea_orm::sea_query::{Index, PostgresQueryBuilder};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};
use tracing::info;

use crate::entity::{photo, terrain};

pub async fn init_db(db_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(db_url.to_owned());

    // Set connection pool options
    opt.max_connections(50)
        .min_connections(2)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(8))
        .max_lifetime(Duration::from_secs(8))
        .sqlx_logging(true);

    let db = Database::connect(opt).await?;
    db.get_schema_registry("server::entity::*")
        .sync(&db)
        .await?;

    Ok(db)
}

/// Ensure the lookup indexes used by terrain listing exist.
///
/// Schema sync only creates the tables and foreign keys.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    let indexes = [
        Index::create()
            .if_not_exists()
            .name("idx_terrain_user_id")
            .table(terrain::Entity)
            .col(terrain::Column::UserId)
            .to_string(PostgresQueryBuilder),
        Index::create()
            .if_not_exists()
            .name("idx_terrain_prix")
            .table(terrain::Entity)
            .col(terrain::Column::Prix)
            .to_string(PostgresQueryBuilder),
        Index::create()
            .if_not_exists()
            .name("idx_photo_terrain_id")
            .table(photo::Entity)
            .col(photo::Column::TerrainId)
            .to_string(PostgresQueryBuilder),
    ];

    for stmt in indexes {
        match db.execute_unprepared(&stmt).await {
            Ok(_) => info!("Ensured index: {}", stmt),
            Err(e) => tracing::warn!("Failed to create index ({}): {}", stmt, e),
        }
    }

    Ok(())
}
