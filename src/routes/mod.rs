// HTTP routes

mod http;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::models::SharedSnapshot;
use crate::name_store::NameStore;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) snapshot: SharedSnapshot,
    pub(crate) name_store: Arc<NameStore>,
}

pub fn app(snapshot: SharedSnapshot, name_store: Arc<NameStore>) -> Router {
    let state = AppState {
        snapshot,
        name_store,
    };
    Router::new()
        .route("/", get(http::index_handler)) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/stats", get(http::api_stats_handler)) // GET /api/stats
        .route("/api/rename-group", post(http::rename_group_handler)) // POST /api/rename-group
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
