//! Audit trail of writes against practice data.
//!
//! Every POST/PUT/PATCH/DELETE is logged under the `audit` target with the
//! affected collection, the row id when the path carries one, and the
//! professional who made the call.

use axum::{extract::Request, http::Method, middleware::Next, response::Response};

use super::auth::Actor;
use super::request_id::RequestId;

fn is_write(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

/// Split `/paciente/12/` into `("paciente", Some(12))`.
fn write_target(path: &str) -> (&str, Option<i32>) {
    let mut segments = path.split('/').filter(|s| !s.is_empty());
    let collection = segments.next().unwrap_or("/");
    let id = segments.next().and_then(|s| s.parse().ok());
    (collection, id)
}

pub async fn audit_middleware(request: Request, next: Next) -> Response {
    if !is_write(request.method()) {
        return next.run(request).await;
    }

    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(|r| r.0.clone())
        .unwrap_or_default();

    let response = next.run(request).await;

    let (collection, record_id) = write_target(&path);
    let actor = response.extensions().get::<Actor>().map(|a| a.0);
    let status = response.status();
    tracing::info!(
        target: "audit",
        request_id = %request_id,
        method = %method,
        collection,
        record_id,
        actor,
        status = status.as_u16(),
        outcome = if status.is_success() { "applied" } else { "rejected" },
        "Write request"
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_of_row_path() {
        assert_eq!(write_target("/paciente/12/"), ("paciente", Some(12)));
        assert_eq!(write_target("/consulta/"), ("consulta", None));
        assert_eq!(write_target("/login/"), ("login", None));
    }

    #[test]
    fn reads_are_not_audited() {
        assert!(!is_write(&Method::GET));
        assert!(is_write(&Method::PATCH));
    }
}
