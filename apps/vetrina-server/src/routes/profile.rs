//! Profile endpoint
//!
//! Serves whatever the bio extractor wrote into the profile slots.

use axum::{extract::State, routing::get, Json, Router};

use crate::bio::ProfileView;
use crate::error::{AppError, Result};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_profile))
}

async fn get_profile(State(state): State<AppState>) -> Result<Json<ProfileView>> {
    state
        .profile()
        .snapshot()
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Profile not extracted".to_string()))
}
