//! Generic CRUD handlers, instantiated once per [`Entity`].

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use cliento_core::validate::{merge_objects, parse_payload};
use deadpool_postgres::Pool;
use serde_json::Value as JsonValue;

use super::extract::{ApiJson, RowId};
use crate::db::{Entity, Repository};
use crate::error::AppError;

/// `/<name>/` and `/<name>/{id}/` for one entity
pub fn routes<E: Entity>() -> Router<Pool> {
    Router::new()
        .route(
            &format!("/{}/", E::NAME),
            get(list::<E>).post(create::<E>),
        )
        .route(
            &format!("/{}/{{id}}/", E::NAME),
            get(retrieve::<E>)
                .put(update::<E>)
                .patch(partial_update::<E>)
                .delete(destroy::<E>),
        )
}

fn not_found<E: Entity>(id: i32) -> AppError {
    AppError::NotFound(format!("{} {} not found", E::LABEL, id))
}

/// Location header for a freshly created row
pub(crate) fn location(name: &str, id: i32) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Ok(value) = format!("/{}/{}/", name, id).parse() {
        headers.insert(header::LOCATION, value);
    }
    headers
}

/// GET /<name>/ - List all rows
pub async fn list<E: Entity>(State(pool): State<Pool>) -> Result<Json<Vec<E>>, AppError> {
    let items = Repository::<E>::new(pool).list().await?;
    Ok(Json(items))
}

/// GET /<name>/{id}/ - Read one row
pub async fn retrieve<E: Entity>(
    State(pool): State<Pool>,
    RowId(id): RowId,
) -> Result<Json<E>, AppError> {
    Repository::<E>::new(pool)
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found::<E>(id))
}

/// POST /<name>/ - Validate and insert
pub async fn create<E: Entity>(
    State(pool): State<Pool>,
    ApiJson(body): ApiJson<JsonValue>,
) -> Result<impl IntoResponse, AppError> {
    let payload: E::Payload = parse_payload(body)?;
    let item = Repository::<E>::new(pool).create(&payload).await?;

    tracing::info!(resource = E::NAME, id = item.id(), "Created");
    Ok((StatusCode::CREATED, location(E::NAME, item.id()), Json(item)))
}

/// PUT /<name>/{id}/ - Full replacement
pub async fn update<E: Entity>(
    State(pool): State<Pool>,
    RowId(id): RowId,
    ApiJson(body): ApiJson<JsonValue>,
) -> Result<Json<E>, AppError> {
    let payload: E::Payload = parse_payload(body)?;
    Repository::<E>::new(pool)
        .update(id, &payload)
        .await?
        .map(Json)
        .ok_or_else(|| not_found::<E>(id))
}

/// PATCH /<name>/{id}/ - Merge the given keys over the stored row, then
/// validate the result like a full update
pub async fn partial_update<E: Entity>(
    State(pool): State<Pool>,
    RowId(id): RowId,
    ApiJson(body): ApiJson<JsonValue>,
) -> Result<Json<E>, AppError> {
    let repo = Repository::<E>::new(pool);
    let current = repo.get(id).await?.ok_or_else(|| not_found::<E>(id))?;

    let stored = serde_json::to_value(&current)
        .map_err(|e| AppError::Internal(format!("Failed to serialize {}: {}", E::NAME, e)))?;
    let payload: E::Payload = parse_payload(merge_objects(stored, body)?)?;

    repo.update(id, &payload)
        .await?
        .map(Json)
        .ok_or_else(|| not_found::<E>(id))
}

/// DELETE /<name>/{id}/ - Delete, cascading to dependent rows
pub async fn destroy<E: Entity>(
    State(pool): State<Pool>,
    RowId(id): RowId,
) -> Result<StatusCode, AppError> {
    if Repository::<E>::new(pool).delete(id).await? {
        tracing::info!(resource = E::NAME, id, "Deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found::<E>(id))
    }
}
