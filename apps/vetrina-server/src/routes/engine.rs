//! Rendering engine status

use axum::{extract::State, routing::get, Json, Router};

use crate::engine::EngineStatus;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(engine_status))
}

async fn engine_status(State(state): State<AppState>) -> Json<EngineStatus> {
    Json(state.registry().status())
}
