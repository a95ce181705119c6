//! API root handler

use axum::Json;
use cliento_core::ApiRoot;

/// GET / - List every routed resource
pub async fn get() -> Json<ApiRoot> {
    Json(super::api_root())
}
