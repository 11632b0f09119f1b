pub mod auth;
pub mod config;
pub mod handlers;
pub mod response;
pub mod store;
pub mod types;

use std::time::{SystemTime, UNIX_EPOCH};

use actix_web::{error::InternalError, http::StatusCode, web};

pub use config::{AppState, ServerConfig};
pub use store::{Store, StoreError};

use handlers::{
    create_asteroid, create_player, delete_asteroid, delete_player, health, list_asteroids,
    list_players, player_scores, rename_player, submit_score, top_players,
};
use response::json_error_with_code;

pub fn now_unix_s() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_secs())
        .unwrap_or(0)
}

/// JSON extractor settings: size limit plus errors in the API's error shape.
pub fn json_config(limit_bytes: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit_bytes)
        .error_handler(|err, _req| {
            let response = json_error_with_code(
                StatusCode::BAD_REQUEST,
                format!("invalid request body: {err}"),
                Some("invalid_json"),
            );
            InternalError::from_response(err, response).into()
        })
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(health))
        .route("/health", web::get().to(health))
        .route("/players", web::get().to(list_players))
        .route("/players", web::post().to(create_player))
        .route("/players/top", web::get().to(top_players))
        .route("/players/rename", web::put().to(rename_player))
        .route("/players/{name}/scores", web::get().to(player_scores))
        .route("/players/{name}/score", web::post().to(submit_score))
        .route("/players/{name}", web::delete().to(delete_player))
        .route("/asteroids", web::get().to(list_asteroids))
        .route("/asteroids", web::post().to(create_asteroid))
        .route("/asteroids/{id}", web::delete().to(delete_asteroid));
}
