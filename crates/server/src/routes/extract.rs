//! Request extractors whose rejections use the JSON error body.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// `axum::Json`, with missing, malformed or wrongly typed bodies answered as
/// `400 {"error": ...}`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Row id from `/<collection>/{id}/`. A segment that is not an `i32` cannot
/// name a row, so it answers 404 like an unknown id.
#[derive(Debug, Clone, Copy, serde::Deserialize, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct RowId(pub i32);

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode, header},
        routing::{get, post},
    };
    use http_body_util::BodyExt;
    use serde_json::Value as JsonValue;
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/row/{id}/", get(|RowId(id): RowId| async move { id.to_string() }))
            .route(
                "/body/",
                post(|ApiJson(body): ApiJson<JsonValue>| async move { body.to_string() }),
            )
    }

    async fn send(request: Request<Body>) -> (StatusCode, JsonValue) {
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap_or(JsonValue::Null))
    }

    fn get_row(id: &str) -> Request<Body> {
        Request::builder()
            .uri(format!("/row/{}/", id))
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn integer_ids_pass_through() {
        let response = app().oneshot(get_row("42")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unparseable_ids_are_not_found() {
        for id in ["abc", "99999999999", "-"] {
            let (status, body) = send(get_row(id)).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{id}");
            assert!(body["error"].is_string(), "{id}");
        }
    }

    #[tokio::test]
    async fn missing_content_type_is_a_json_bad_request() {
        let (status, body) = send(
            Request::builder()
                .method("POST")
                .uri("/body/")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn malformed_json_is_a_json_bad_request() {
        let (status, body) = send(
            Request::builder()
                .method("POST")
                .uri("/body/")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"nombre\": "))
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }
}
