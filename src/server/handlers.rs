use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use thiserror::Error;

use super::KvState;
use crate::shared::errors::StorageError;
use crate::storage::Database;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Database not initialized")]
    Unavailable,
    #[error("Internal server error")]
    Internal(#[from] StorageError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

fn database(state: &KvState) -> Result<&Database, ApiError> {
    state.database().ok_or(ApiError::Unavailable)
}

/// `GET /api/data/{key}`: the stored value, or `null` when absent.
pub async fn get_value(
    State(state): State<KvState>,
    Path(key): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let db = database(&state)?;

    let value = db.get(&key).map_err(|e| {
        tracing::error!(target: "server", key = %key, "Database read error: {}", e);
        ApiError::from(e)
    })?;

    Ok(Json(value.unwrap_or(Value::Null)))
}

/// `POST /api/data/{key}`: upsert the JSON body.
pub async fn save_value(
    State(state): State<KvState>,
    Path(key): Path<String>,
    Json(value): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let db = database(&state)?;

    db.put(&key, &value).map_err(|e| {
        tracing::error!(target: "server", key = %key, "Database write error: {}", e);
        ApiError::from(e)
    })?;

    tracing::debug!(target: "server", key = %key, "Value saved");
    Ok(Json(json!({ "success": true })))
}

/// `DELETE /api/data/{key}`: hard-delete the row.
pub async fn delete_value(
    State(state): State<KvState>,
    Path(key): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let db = database(&state)?;

    let existed = db.delete(&key).map_err(|e| {
        tracing::error!(target: "server", key = %key, "Database delete error: {}", e);
        ApiError::from(e)
    })?;

    tracing::info!(target: "server", key = %key, existed, "Data dropped");
    Ok(Json(json!({
        "success": true,
        "message": format!("Data for {} dropped successfully.", key),
    })))
}

/// Health check endpoint.
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}
