use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn api_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .merge(auth_routes())
        .merge(terrain_routes())
        .merge(photo_routes(config.storage.max_photo_size))
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::register))
        .routes(routes!(handlers::auth::login))
        .routes(routes!(handlers::auth::me))
}

fn terrain_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::terrain::list_terrains,
            handlers::terrain::create_terrain
        ))
        .routes(routes!(
            handlers::terrain::get_terrain,
            handlers::terrain::update_terrain,
            handlers::terrain::delete_terrain
        ))
}

fn photo_routes(max_photo_size: usize) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::photo::upload_photo))
        .routes(routes!(handlers::photo::delete_photo))
        .layer(handlers::photo::photo_body_limit(max_photo_size))
}
