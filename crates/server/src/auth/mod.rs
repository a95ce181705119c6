//! Credentials and the per-request authenticated caller.

pub mod password;
pub mod token;

use cliento_core::{Role, UserIdentity};

use crate::error::AppError;

/// Knobs shared by the login/register handlers and the seed generator.
#[derive(Debug, Clone, Copy)]
pub struct AuthSettings {
    pub token_ttl_hours: i64,
    pub password_iterations: u32,
}

/// The caller behind a valid bearer token, inserted into request extensions
/// by the auth middleware.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub account_id: i32,
    pub professional_id: i32,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
}

impl AuthContext {
    pub fn identity(&self) -> UserIdentity {
        UserIdentity {
            id: self.professional_id,
            email: self.email.clone(),
            nombre: self.first_name.clone(),
            apellido: self.last_name.clone(),
        }
    }
}

/// Hash on the blocking pool; PBKDF2 at production rounds takes long enough
/// to stall a runtime worker.
pub async fn hash_password(password: String, iterations: u32) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || password::hash_password(&password, iterations))
        .await
        .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))
}

pub async fn verify_password(password: String, encoded: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || password::verify_password(&password, &encoded))
        .await
        .map_err(|e| AppError::Internal(format!("Password check task failed: {}", e)))?
        .map_err(|e| AppError::Internal(e.to_string()))
}
