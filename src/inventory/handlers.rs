use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{error::AppError, state::AppState};

use super::dto::{
    FoodCreate, FoodResponse, FoodUpdate, ItemId, SupplyCreate, SupplyResponse, SupplyUpdate,
};
use super::services::{
    validate_food_patch, validate_new_food, validate_new_supply, validate_supply_patch,
};

pub fn food_routes() -> Router<AppState> {
    Router::new()
        .route("/foods", get(list_foods).post(create_food))
        .route("/foods/:id", put(update_food).delete(delete_food))
}

pub fn supply_routes() -> Router<AppState> {
    Router::new()
        .route("/supplies", get(list_supplies).post(create_supply))
        .route("/supplies/:id", put(update_supply).delete(delete_supply))
}

// --- foods ---

#[instrument(skip(state))]
pub async fn list_foods(
    State(state): State<AppState>,
) -> Result<Json<Vec<FoodResponse>>, AppError> {
    let today = state.today();
    let foods = state.store.list_foods().await?;
    Ok(Json(
        foods.into_iter().map(|f| FoodResponse::at(f, today)).collect(),
    ))
}

#[instrument(skip(state, payload))]
pub async fn create_food(
    State(state): State<AppState>,
    payload: Result<Json<FoodCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<FoodResponse>), AppError> {
    let Json(input) = payload?;
    let new = validate_new_food(input)?;
    let food = state.store.create_food(new).await?;
    info!(food_id = food.id, name = %food.name, "food created");
    Ok((StatusCode::CREATED, Json(FoodResponse::at(food, state.today()))))
}

#[instrument(skip(state, path, payload))]
pub async fn update_food(
    State(state): State<AppState>,
    path: Result<Path<ItemId>, PathRejection>,
    payload: Result<Json<FoodUpdate>, JsonRejection>,
) -> Result<Json<FoodResponse>, AppError> {
    let Path(id) = path?;
    let Json(input) = payload?;
    let patch = validate_food_patch(input)?;
    let food = state.store.update_food(id, patch).await?;
    info!(food_id = food.id, "food updated");
    Ok(Json(FoodResponse::at(food, state.today())))
}

#[instrument(skip(state, path))]
pub async fn delete_food(
    State(state): State<AppState>,
    path: Result<Path<ItemId>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = path?;
    state.store.delete_food(id).await?;
    info!(food_id = id, "food deleted");
    Ok(StatusCode::NO_CONTENT)
}

// --- supplies ---

#[instrument(skip(state))]
pub async fn list_supplies(
    State(state): State<AppState>,
) -> Result<Json<Vec<SupplyResponse>>, AppError> {
    let supplies = state.store.list_supplies().await?;
    Ok(Json(supplies.into_iter().map(SupplyResponse::from).collect()))
}

#[instrument(skip(state, payload))]
pub async fn create_supply(
    State(state): State<AppState>,
    payload: Result<Json<SupplyCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<SupplyResponse>), AppError> {
    let Json(input) = payload?;
    let new = validate_new_supply(input)?;
    let supply = state.store.create_supply(new).await?;
    info!(supply_id = supply.id, name = %supply.name, "supply created");
    Ok((StatusCode::CREATED, Json(supply.into())))
}

#[instrument(skip(state, path, payload))]
pub async fn update_supply(
    State(state): State<AppState>,
    path: Result<Path<ItemId>, PathRejection>,
    payload: Result<Json<SupplyUpdate>, JsonRejection>,
) -> Result<Json<SupplyResponse>, AppError> {
    let Path(id) = path?;
    let Json(input) = payload?;
    let patch = validate_supply_patch(input)?;
    let supply = state.store.update_supply(id, patch).await?;
    info!(supply_id = supply.id, level = supply.stock_level.as_str(), "supply updated");
    Ok(Json(supply.into()))
}

#[instrument(skip(state, path))]
pub async fn delete_supply(
    State(state): State<AppState>,
    path: Result<Path<ItemId>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = path?;
    state.store.delete_supply(id).await?;
    info!(supply_id = id, "supply deleted");
    Ok(StatusCode::NO_CONTENT)
}
