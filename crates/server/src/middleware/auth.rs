//! Bearer-token authentication for the protected API routes.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use deadpool_postgres::Pool;

use crate::auth::token::bearer_token;
use crate::db::AccountRepository;
use crate::error::AppError;

/// Professional id of the authenticated caller, copied onto the response so
/// outer layers (the audit log) can attribute the request.
#[derive(Debug, Clone, Copy)]
pub struct Actor(pub i32);

fn reject(reason: &'static str, message: &str) -> Response {
    metrics::counter!("auth_rejections_total", "reason" => reason).increment(1);
    AppError::Unauthorized(message.to_owned()).into_response()
}

/// Resolve the bearer token to an [`AuthContext`](crate::auth::AuthContext)
/// and attach it to the request, or answer 401.
pub async fn auth_middleware(State(pool): State<Pool>, mut request: Request, next: Next) -> Response {
    let Some(token) = bearer_token(request.headers()).map(str::to_owned) else {
        return reject("missing", "Authentication credentials were not provided");
    };

    match AccountRepository::new(pool).resolve_token(&token).await {
        Ok(Some(context)) => {
            tracing::debug!(account_id = context.account_id, "Authenticated request");
            let actor = Actor(context.professional_id);
            request.extensions_mut().insert(context);
            let mut response = next.run(request).await;
            response.extensions_mut().insert(actor);
            response
        }
        Ok(None) => reject("invalid", "Invalid or expired token"),
        Err(e) => e.into_response(),
    }
}
