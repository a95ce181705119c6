//! Register, login, logout and session verification

use axum::{
    Extension, Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use cliento_core::{
    LoginRequest, LoginResponse, MessageBody, ProfessionalPayload, RegisterRequest, Role,
    SessionResponse, validate::parse_payload,
};
use deadpool_postgres::Pool;
use serde_json::Value as JsonValue;

use super::extract::ApiJson;
use crate::auth::{self, AuthContext, AuthSettings, token::bearer_token};
use crate::db::{AccountRepository, ProfessionalRepository};
use crate::error::AppError;

const INVALID_CREDENTIALS: &str = "invalid credentials";

/// POST /register/ - Create an account with its professional profile
pub async fn register(
    State(pool): State<Pool>,
    Extension(settings): Extension<AuthSettings>,
    ApiJson(body): ApiJson<JsonValue>,
) -> Result<impl IntoResponse, AppError> {
    let request: RegisterRequest = parse_payload(body)?;
    let password = request.password.unwrap_or_default();

    let payload = ProfessionalPayload {
        email: request.email,
        first_name: request.first_name,
        last_name: request.last_name,
        license_number: request.license_number,
        is_active: true,
        ..Default::default()
    };

    let hash = auth::hash_password(password, settings.password_iterations).await?;
    let professional = ProfessionalRepository::new(pool)
        .create(&payload, &hash, Role::Professional)
        .await?;

    tracing::info!(professional_id = professional.id, "Professional registered");
    Ok((
        StatusCode::CREATED,
        Json(MessageBody::new("user created successfully")),
    ))
}

/// POST /login/ - Exchange email and password for a bearer token
pub async fn login(
    State(pool): State<Pool>,
    Extension(settings): Extension<AuthSettings>,
    ApiJson(body): ApiJson<JsonValue>,
) -> Result<Json<LoginResponse>, AppError> {
    let request: LoginRequest = parse_payload(body)?;
    let email = request.email.unwrap_or_default();
    let password = request.password.unwrap_or_default();

    let repo = AccountRepository::new(pool);
    let Some(account) = repo.find_by_email(&email).await? else {
        tracing::warn!("Login attempt for unknown email");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    };

    if !auth::verify_password(password, account.password_hash).await? {
        tracing::warn!(account_id = account.context.account_id, "Login with wrong password");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    }

    if !account.is_active {
        tracing::warn!(account_id = account.context.account_id, "Login to inactive account");
        return Err(AppError::Unauthorized("account is inactive".into()));
    }

    let (token, expires_at) = repo
        .issue_token(account.context.account_id, settings.token_ttl_hours)
        .await?;

    tracing::info!(account_id = account.context.account_id, "Login succeeded");
    Ok(Json(LoginResponse {
        token,
        expires_at,
        user: account.context.identity(),
    }))
}

/// POST /logout/ - Revoke the presented token; succeeds without one
pub async fn logout(
    State(pool): State<Pool>,
    headers: HeaderMap,
) -> Result<Json<MessageBody>, AppError> {
    if let Some(token) = bearer_token(&headers) {
        if AccountRepository::new(pool).revoke_token(token).await? {
            tracing::info!("Token revoked");
        }
    }
    Ok(Json(MessageBody::new("logged out successfully")))
}

/// GET /verify-session/ - Identity of the token holder
pub async fn verify_session(Extension(context): Extension<AuthContext>) -> Json<SessionResponse> {
    Json(SessionResponse {
        message: "session active".to_string(),
        user: context.identity(),
        role: context.role,
    })
}
