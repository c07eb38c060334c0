use axum::{extract::State, routing::get, Json, Router};
use tracing::{debug, instrument};

use crate::{error::AppError, state::AppState};

use super::dto::{DashboardSummary, ShoppingList};
use super::services::{derive_shopping_list, summarize};

pub fn alert_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/shopping", get(shopping_list))
}

#[instrument(skip(state))]
pub async fn dashboard(State(state): State<AppState>) -> Result<Json<DashboardSummary>, AppError> {
    let snap = state.store.snapshot().await?;
    let summary = summarize(&snap.foods, &snap.supplies, state.today());
    debug!(
        expiring = summary.expiring_foods.len(),
        low = summary.low_supplies.len(),
        "dashboard computed"
    );
    Ok(Json(summary))
}

#[instrument(skip(state))]
pub async fn shopping_list(State(state): State<AppState>) -> Result<Json<ShoppingList>, AppError> {
    let snap = state.store.snapshot().await?;
    let items = derive_shopping_list(&snap.foods, &snap.supplies, state.today());
    debug!(items = items.len(), "shopping list derived");
    Ok(Json(ShoppingList { items }))
}
