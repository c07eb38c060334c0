use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::inventory::repo::StoreError;
use crate::recipes::client::GenerationError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Upstream(String),

    #[error("{0}")]
    Transient(String),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Transient(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match &self {
            AppError::Internal(e) => {
                error!(error = ?e, "internal error");
                "サーバー内部でエラーが発生しました".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { kind, .. } => AppError::NotFound(kind.not_found_message().into()),
            other => AppError::Internal(other.into()),
        }
    }
}

impl From<GenerationError> for AppError {
    fn from(e: GenerationError) -> Self {
        match e {
            GenerationError::Network(msg) => {
                error!(error = %msg, "recipe service unreachable");
                AppError::Transient("レシピサービスに接続できませんでした".into())
            }
            GenerationError::Upstream(msg) => {
                error!(error = %msg, "recipe service failed");
                AppError::Upstream(format!("レシピの生成に失敗しました: {msg}"))
            }
        }
    }
}
