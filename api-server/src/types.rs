use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CreatePlayerRequest {
    pub(crate) name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SubmitScoreRequest {
    pub(crate) score: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RenamePlayerRequest {
    pub(crate) old_name: String,
    pub(crate) new_name: String,
}

/// Catalog fields arrive as text and are validated into an `ArchetypeSpec`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CreateAsteroidRequest {
    pub(crate) size: String,
    pub(crate) speed: i64,
    pub(crate) material: String,
    #[serde(alias = "type")]
    pub(crate) kind: String,
    pub(crate) spawn_rate: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct DeletedResponse {
    pub(crate) success: bool,
    pub(crate) deleted: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct HealthResponse {
    pub(crate) status: &'static str,
    pub(crate) service: &'static str,
    pub(crate) players: u64,
    pub(crate) scores: u64,
    pub(crate) asteroids: u64,
    pub(crate) top_scores_limit: usize,
    pub(crate) auth_required: bool,
}
