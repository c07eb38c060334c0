pub mod classify;
mod dto;
pub mod handlers;
mod services;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::alert_routes()
}
