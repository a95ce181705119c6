//! Professional resource HTTP handlers
//!
//! Professionals are written together with their login account, so they
//! get their own handlers instead of the generic resource ones.

use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use cliento_core::{
    Professional, ProfessionalPayload, Role,
    validate::{merge_objects, parse_payload},
};
use deadpool_postgres::Pool;
use serde_json::Value as JsonValue;

use super::extract::{ApiJson, RowId};
use super::resource::location;
use crate::auth::{self, AuthSettings};
use crate::db::ProfessionalRepository;
use crate::error::AppError;

const NAME: &str = "profesional";

pub fn routes() -> Router<Pool> {
    Router::new()
        .route("/profesional/", get(list).post(create))
        .route(
            "/profesional/{id}/",
            get(retrieve)
                .put(update)
                .patch(partial_update)
                .delete(destroy),
        )
}

fn not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Professional {} not found", id))
}

/// Hash the payload's password if one was supplied
async fn new_hash(
    payload: &ProfessionalPayload,
    settings: &AuthSettings,
) -> Result<Option<String>, AppError> {
    match payload.password.as_deref().filter(|p| !p.is_empty()) {
        Some(password) => {
            let hash =
                auth::hash_password(password.to_string(), settings.password_iterations).await?;
            Ok(Some(hash))
        }
        None => Ok(None),
    }
}

/// GET /profesional/
pub async fn list(State(pool): State<Pool>) -> Result<Json<Vec<Professional>>, AppError> {
    let items = ProfessionalRepository::new(pool).list().await?;
    Ok(Json(items))
}

/// GET /profesional/{id}/
pub async fn retrieve(
    State(pool): State<Pool>,
    RowId(id): RowId,
) -> Result<Json<Professional>, AppError> {
    ProfessionalRepository::new(pool)
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

/// POST /profesional/ - Create the profile and its login account
pub async fn create(
    State(pool): State<Pool>,
    Extension(settings): Extension<AuthSettings>,
    ApiJson(body): ApiJson<JsonValue>,
) -> Result<impl IntoResponse, AppError> {
    let payload: ProfessionalPayload = parse_payload(body)?;
    payload.validate_new()?;

    let hash = new_hash(&payload, &settings)
        .await?
        .ok_or_else(|| AppError::Internal("Validated payload lost its password".into()))?;
    let professional = ProfessionalRepository::new(pool)
        .create(&payload, &hash, Role::Professional)
        .await?;

    tracing::info!(resource = NAME, id = professional.id, "Created");
    Ok((
        StatusCode::CREATED,
        location(NAME, professional.id),
        Json(professional),
    ))
}

/// PUT /profesional/{id}/ - Full replacement; omitting `password` keeps it
pub async fn update(
    State(pool): State<Pool>,
    Extension(settings): Extension<AuthSettings>,
    RowId(id): RowId,
    ApiJson(body): ApiJson<JsonValue>,
) -> Result<Json<Professional>, AppError> {
    let payload: ProfessionalPayload = parse_payload(body)?;
    save(pool, &settings, id, payload).await
}

/// PATCH /profesional/{id}/
pub async fn partial_update(
    State(pool): State<Pool>,
    Extension(settings): Extension<AuthSettings>,
    RowId(id): RowId,
    ApiJson(body): ApiJson<JsonValue>,
) -> Result<Json<Professional>, AppError> {
    let current = ProfessionalRepository::new(pool.clone())
        .get(id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let stored = serde_json::to_value(&current)
        .map_err(|e| AppError::Internal(format!("Failed to serialize professional: {}", e)))?;
    let payload: ProfessionalPayload = parse_payload(merge_objects(stored, body)?)?;
    save(pool, &settings, id, payload).await
}

async fn save(
    pool: Pool,
    settings: &AuthSettings,
    id: i32,
    payload: ProfessionalPayload,
) -> Result<Json<Professional>, AppError> {
    let hash = new_hash(&payload, settings).await?;

    ProfessionalRepository::new(pool)
        .update(id, &payload, hash.as_deref())
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

/// DELETE /profesional/{id}/ - Removes the account, profile and every
/// appointment of the professional
pub async fn destroy(
    State(pool): State<Pool>,
    RowId(id): RowId,
) -> Result<StatusCode, AppError> {
    if ProfessionalRepository::new(pool).delete(id).await? {
        tracing::info!(resource = NAME, id, "Deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
