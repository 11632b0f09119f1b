use actix_web::{
    http::StatusCode,
    web::{Data, Json, Path},
    HttpRequest, HttpResponse, Responder,
};
use asteroid_dodger_core::catalog::ArchetypeSpec;

use crate::auth::is_admin_request;
use crate::config::AppState;
use crate::response::{json_error_with_code, store_error_response, unauthorized};
use crate::types::{
    CreateAsteroidRequest, CreatePlayerRequest, DeletedResponse, HealthResponse,
    RenamePlayerRequest, SubmitScoreRequest,
};

pub(crate) const SERVICE_NAME: &str = "asteroid-dodger-api";

fn authorized(req: &HttpRequest, state: &AppState) -> bool {
    is_admin_request(req.headers(), state.api_key.as_deref())
}

pub(crate) async fn health(state: Data<AppState>) -> impl Responder {
    let counts = match state.store.counts() {
        Ok(counts) => counts,
        Err(e) => return store_error_response(e, "health check"),
    };

    HttpResponse::Ok().json(HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
        players: counts.players,
        scores: counts.scores,
        asteroids: counts.asteroids,
        top_scores_limit: state.top_scores_limit,
        auth_required: state.auth_required(),
    })
}

pub(crate) async fn list_players(state: Data<AppState>) -> impl Responder {
    match state.store.list_players() {
        Ok(players) => HttpResponse::Ok().json(players),
        Err(e) => store_error_response(e, "list_players"),
    }
}

pub(crate) async fn top_players(state: Data<AppState>) -> impl Responder {
    match state.store.top_scores(state.top_scores_limit) {
        Ok(top) => HttpResponse::Ok().json(top),
        Err(e) => store_error_response(e, "top_players"),
    }
}

pub(crate) async fn create_player(
    state: Data<AppState>,
    body: Json<CreatePlayerRequest>,
) -> impl Responder {
    match state.store.create_player(&body.name) {
        Ok(player) => HttpResponse::Created().json(player),
        Err(e) => store_error_response(e, "create_player"),
    }
}

pub(crate) async fn player_scores(state: Data<AppState>, path: Path<String>) -> impl Responder {
    let name = path.into_inner();
    match state.store.player_scores(&name) {
        Ok(scores) => HttpResponse::Ok().json(scores),
        Err(e) => store_error_response(e, "player_scores"),
    }
}

pub(crate) async fn submit_score(
    state: Data<AppState>,
    path: Path<String>,
    body: Json<SubmitScoreRequest>,
) -> impl Responder {
    let name = path.into_inner();
    match state.store.record_score(&name, body.score) {
        Ok(record) => HttpResponse::Created().json(record),
        Err(e) => store_error_response(e, "submit_score"),
    }
}

pub(crate) async fn rename_player(
    state: Data<AppState>,
    body: Json<RenamePlayerRequest>,
) -> impl Responder {
    match state.store.rename_player(&body.old_name, &body.new_name) {
        Ok(player) => HttpResponse::Ok().json(player),
        Err(e) => store_error_response(e, "rename_player"),
    }
}

pub(crate) async fn delete_player(
    req: HttpRequest,
    state: Data<AppState>,
    path: Path<String>,
) -> impl Responder {
    if !authorized(&req, &state) {
        return unauthorized();
    }
    let name = path.into_inner();
    match state.store.delete_player(&name) {
        Ok(player) => HttpResponse::Ok().json(DeletedResponse {
            success: true,
            deleted: player.name,
        }),
        Err(e) => store_error_response(e, "delete_player"),
    }
}

pub(crate) async fn list_asteroids(state: Data<AppState>) -> impl Responder {
    match state.store.list_asteroids() {
        Ok(asteroids) => HttpResponse::Ok().json(asteroids),
        Err(e) => store_error_response(e, "list_asteroids"),
    }
}

pub(crate) async fn create_asteroid(
    req: HttpRequest,
    state: Data<AppState>,
    body: Json<CreateAsteroidRequest>,
) -> impl Responder {
    if !authorized(&req, &state) {
        return unauthorized();
    }
    let spec = match ArchetypeSpec::parse(
        &body.size,
        body.speed,
        &body.material,
        &body.kind,
        body.spawn_rate,
    ) {
        Ok(spec) => spec,
        Err(e) => {
            return json_error_with_code(
                StatusCode::BAD_REQUEST,
                e.to_string(),
                Some("invalid_asteroid"),
            )
        }
    };

    match state.store.create_asteroid(&spec) {
        Ok(asteroid) => HttpResponse::Created().json(asteroid),
        Err(e) => store_error_response(e, "create_asteroid"),
    }
}

pub(crate) async fn delete_asteroid(
    req: HttpRequest,
    state: Data<AppState>,
    path: Path<i64>,
) -> impl Responder {
    if !authorized(&req, &state) {
        return unauthorized();
    }
    let id = path.into_inner();
    match state.store.delete_asteroid(id) {
        Ok(()) => HttpResponse::Ok().json(DeletedResponse {
            success: true,
            deleted: id.to_string(),
        }),
        Err(e) => store_error_response(e, "delete_asteroid"),
    }
}
