//! Prometheus request metrics
//!
//! - `http_requests_total` counter by method, route and status
//! - `http_request_duration_seconds` histogram by method and route
//! - `http_requests_in_flight` gauge

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};

/// Collapse row ids into the router's `{id}` placeholder so `/paciente/7/`
/// and `/paciente/8/` report as one route.
fn route_label(path: &str) -> String {
    path.split('/')
        .map(|seg| match seg.parse::<i64>() {
            Ok(_) => "{id}",
            Err(_) => seg,
        })
        .collect::<Vec<_>>()
        .join("/")
}

pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let method = request.method().as_str().to_owned();
    let route = route_label(request.uri().path());

    let in_flight = metrics::gauge!("http_requests_in_flight");
    in_flight.increment(1.0);
    let start = Instant::now();

    let response = next.run(request).await;

    in_flight.decrement(1.0);
    metrics::histogram!(
        "http_request_duration_seconds",
        "method" => method.clone(),
        "route" => route.clone()
    )
    .record(start.elapsed().as_secs_f64());
    metrics::counter!(
        "http_requests_total",
        "method" => method,
        "route" => route,
        "status" => response.status().as_u16().to_string()
    )
    .increment(1);

    response
}

#[cfg(test)]
mod tests {
    use super::route_label;

    #[test]
    fn row_ids_collapse() {
        assert_eq!(route_label("/paciente/42/"), "/paciente/{id}/");
        assert_eq!(route_label("/consulta/"), "/consulta/");
        assert_eq!(route_label("/"), "/");
    }
}
