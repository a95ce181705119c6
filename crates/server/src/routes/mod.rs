pub mod auth;
mod extract;
pub mod health;
pub mod metadata;
pub mod metrics;
mod professional;
mod resource;

use axum::{
    Router,
    routing::{get, post},
};
use cliento_core::{
    ApiResource, ApiRoot, Appointment, ClinicalNote, ClinicalRecord, ConsultingRoom, Disorder,
    Drug, Patient, Specialty,
};
use deadpool_postgres::Pool;

use crate::db::Entity;

/// Entity collections plus session verification; all require a token
pub fn api_routes() -> Router<Pool> {
    Router::new()
        .merge(professional::routes())
        .merge(resource::routes::<Specialty>())
        .merge(resource::routes::<ConsultingRoom>())
        .merge(resource::routes::<Patient>())
        .merge(resource::routes::<Appointment>())
        .merge(resource::routes::<Disorder>())
        .merge(resource::routes::<Drug>())
        .merge(resource::routes::<ClinicalRecord>())
        .merge(resource::routes::<ClinicalNote>())
        .route("/verify-session/", get(auth::verify_session))
}

/// Login, register and logout; reachable without a token
pub fn auth_routes() -> Router<Pool> {
    Router::new()
        .route("/login/", post(auth::login))
        .route("/register/", post(auth::register))
        .route("/logout/", post(auth::logout))
}

/// Description of the routing table served at `GET /`
pub fn api_root() -> ApiRoot {
    let collections = [
        "profesional",
        Specialty::NAME,
        ConsultingRoom::NAME,
        Patient::NAME,
        Appointment::NAME,
        Disorder::NAME,
        Drug::NAME,
        ClinicalRecord::NAME,
        ClinicalNote::NAME,
    ];

    let mut resources: Vec<ApiResource> = collections
        .into_iter()
        .map(ApiResource::collection)
        .collect();
    resources.extend([
        ApiResource::endpoint("login", "/login/", &["POST"], false),
        ApiResource::endpoint("register", "/register/", &["POST"], false),
        ApiResource::endpoint("logout", "/logout/", &["POST"], false),
        ApiResource::endpoint("verify-session", "/verify-session/", &["GET"], true),
        ApiResource::endpoint("health", "/health", &["GET"], false),
        ApiResource::endpoint("metrics", "/metrics", &["GET"], false),
    ]);

    ApiRoot::new(resources)
}
