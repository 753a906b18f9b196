// Handlers: JSON stats API, group rename, HTML dashboard

use axum::http::StatusCode;
use axum::{
    extract::State,
    response::{Html, IntoResponse},
};
use serde::Deserialize;

use super::AppState;
use crate::models::Snapshot;
use crate::version::{NAME, VERSION};

/// GET /version — returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// GET /api/stats — the last published snapshot. Never errors: before the
/// first successful cycle this is the empty default snapshot.
pub(super) async fn api_stats_handler(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.snapshot.read().await.clone();
    axum::Json(snapshot.as_ref().clone())
}

#[derive(Debug, Deserialize)]
pub(super) struct RenameRequest {
    pub old_name: String,
    pub new_name: String,
}

/// POST /api/rename-group — upsert a display name for a group key. No shape
/// validation; empty and duplicate names are accepted as-is. The new name
/// takes effect in the next published snapshot.
pub(super) async fn rename_group_handler(
    State(state): State<AppState>,
    axum::Json(req): axum::Json<RenameRequest>,
) -> impl IntoResponse {
    match state.name_store.rename(&req.old_name, &req.new_name).await {
        Ok(()) => (
            StatusCode::OK,
            axum::Json(serde_json::json!({ "success": true })),
        ),
        Err(e) => {
            tracing::warn!(
                error = %e,
                group = %req.old_name,
                operation = "rename_group",
                "rename failed"
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                axum::Json(serde_json::json!({ "success": false })),
            )
        }
    }
}

/// GET / — server-rendered view of the same snapshot.
pub(super) async fn index_handler(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.snapshot.read().await.clone();
    Html(render_index(&snapshot))
}

fn render_index(snapshot: &Snapshot) -> String {
    let mut page = String::with_capacity(4096);
    page.push_str(
        "<!DOCTYPE html><html><head><title>dockboard</title>\
         <style>body{font-family:sans-serif;margin:2em}table{border-collapse:collapse}\
         td,th{border:1px solid #ccc;padding:4px 10px;text-align:left}</style></head><body>",
    );

    let sys = &snapshot.system_stats;
    page.push_str(&format!(
        "<h1>dockboard</h1><p>Host CPU {:.2}% &middot; RAM {:.2}% of {:.2} GB \
         &middot; Docker CPU {:.2}% &middot; Docker RAM {:.2}%</p>",
        sys.cpu_percent, sys.ram_percent, sys.total_ram, sys.docker_cpu_percent, sys.docker_ram_percent
    ));

    page.push_str(
        "<h2>Groups</h2><table><tr><th>Group</th><th>Containers</th>\
         <th>CPU %</th><th>Memory MB</th></tr>",
    );
    for (display, group) in &snapshot.groups {
        page.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{:.2}</td><td>{:.2}</td></tr>",
            escape(display),
            group.containers.len(),
            group.total_cpu,
            group.total_memory_mb
        ));
    }
    page.push_str("</table>");

    page.push_str(
        "<h2>Containers</h2><table><tr><th>Name</th><th>CPU %</th><th>CPU limit</th>\
         <th>Mem %</th><th>Mem MB</th><th>Mem limit MB</th></tr>",
    );
    for (name, m) in &snapshot.stats {
        let cpu_limit = m
            .cpu_limit
            .map_or_else(|| "-".to_string(), |v| format!("{:.2}", v));
        let mem_limit = m
            .memory_limit_mb
            .map_or_else(|| "-".to_string(), |v| format!("{:.2}", v));
        page.push_str(&format!(
            "<tr><td>{}</td><td>{:.2}</td><td>{}</td><td>{:.2}</td><td>{:.2}</td><td>{}</td></tr>",
            escape(name),
            m.cpu_percent,
            cpu_limit,
            m.memory_percent,
            m.memory_usage_mb,
            mem_limit
        ));
    }
    page.push_str("</table></body></html>");
    page
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
