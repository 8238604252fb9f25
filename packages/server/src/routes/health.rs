use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::application::AppState;
use crate::db::Repository;

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub fn router<R: Repository>() -> Router<AppState<R>> {
    Router::new().route("/api/health", get(health))
}
