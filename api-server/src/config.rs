use std::{env, path::PathBuf, sync::Arc};

use asteroid_dodger_core::constants::TOP_SCORES_LIMIT;

use crate::store::Store;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_JSON_LIMIT_BYTES: usize = 16 * 1024;
pub const DEFAULT_CHECKPOINT_SECS: u64 = 5 * 60;
pub const DEFAULT_HTTP_KEEP_ALIVE_SECS: u64 = 75;

/// Process settings, read once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub data_dir: PathBuf,
    pub api_key: Option<String>,
    pub json_limit_bytes: usize,
    pub http_workers: Option<usize>,
    pub http_keep_alive_secs: u64,
    pub top_scores_limit: usize,
    pub checkpoint_secs: u64,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            bind_addr: env::var("API_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR)),
            api_key: read_env_optional_string("API_KEY"),
            json_limit_bytes: read_env_usize("JSON_LIMIT_BYTES", DEFAULT_JSON_LIMIT_BYTES),
            http_workers: read_env_optional_usize("HTTP_WORKERS"),
            http_keep_alive_secs: read_env_u64(
                "HTTP_KEEP_ALIVE_SECS",
                DEFAULT_HTTP_KEEP_ALIVE_SECS,
            ),
            top_scores_limit: read_env_usize("TOP_SCORES_LIMIT", TOP_SCORES_LIMIT),
            checkpoint_secs: read_env_u64_allow_zero("CHECKPOINT_SECS", DEFAULT_CHECKPOINT_SECS),
        }
    }
}

/// Shared per-worker handle passed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub api_key: Option<String>,
    pub top_scores_limit: usize,
}

impl AppState {
    pub fn new(store: Arc<Store>, config: &ServerConfig) -> Self {
        Self {
            store,
            api_key: config.api_key.clone(),
            top_scores_limit: config.top_scores_limit,
        }
    }

    pub fn auth_required(&self) -> bool {
        self.api_key.is_some()
    }
}

pub(crate) fn read_env_usize(name: &str, default: usize) -> usize {
    read_env_optional_usize(name).unwrap_or(default)
}

pub(crate) fn read_env_optional_usize(name: &str) -> Option<usize> {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|value| *value > 0)
}

pub(crate) fn read_env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}

pub(crate) fn read_env_u64_allow_zero(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(default)
}

/// Blank values count as unset.
pub(crate) fn read_env_optional_string(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
