use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::llm_client;
use crate::state::AppState;

/// GET /api/health
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "message": "Resume screening API is running",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// GET /api/check-api-key
/// Sends a trivial completion to confirm the provider accepts our key.
pub async fn check_api_key_handler(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    llm_client::ping(state.llm.as_ref(), &state.config.semantic_model)
        .await
        .map_err(|e| AppError::Llm(format!("API key error: {e}")))?;

    Ok(Json(json!({
        "success": true,
        "message": "API key is working"
    })))
}
