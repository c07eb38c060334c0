use axum::{extract::State, routing::post, Json, Router};
use tracing::instrument;

use crate::{error::AppError, state::AppState};

use super::dto::RecipeResponse;
use super::services::request_recipe;

pub fn recipe_routes() -> Router<AppState> {
    Router::new().route("/recipe", post(suggest_recipe))
}

/// POST /recipe
/// Every call asks the generator again; nothing is cached or deduplicated.
#[instrument(skip(state))]
pub async fn suggest_recipe(State(state): State<AppState>) -> Result<Json<RecipeResponse>, AppError> {
    Ok(Json(request_recipe(&state).await?))
}
