//! Application error handling

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use cliento_core::{ErrorBody, FieldErrors};
use tokio_postgres::error::SqlState;

/// Application error type
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Validation(FieldErrors),
    Unauthorized(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorBody::new(msg)),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorBody::new(msg)),
            AppError::Validation(fields) => {
                (StatusCode::BAD_REQUEST, ErrorBody::validation(fields))
            }
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, ErrorBody::new(msg)),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new("Internal server error"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        AppError::Validation(errors)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        match rejection {
            PathRejection::FailedToDeserializePathParams(_) => {
                AppError::NotFound("Not found.".into())
            }
            other => AppError::Internal(other.body_text()),
        }
    }
}

impl From<deadpool_postgres::PoolError> for AppError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        AppError::Internal(format!("Database pool error: {}", err))
    }
}

impl From<tokio_postgres::Error> for AppError {
    fn from(err: tokio_postgres::Error) -> Self {
        if let Some(db) = err.as_db_error() {
            let code = db.code();
            if *code == SqlState::UNIQUE_VIOLATION || *code == SqlState::FOREIGN_KEY_VIOLATION {
                if let Some((field, message)) = db.constraint().and_then(constraint_violation) {
                    return AppError::Validation(FieldErrors::single(field, message));
                }
            }
        }
        AppError::Internal(format!("Database error: {}", err))
    }
}

/// Map a violated constraint to the JSON field and message reported to the
/// caller. Names match `db/schema.sql`.
fn constraint_violation(constraint: &str) -> Option<(&'static str, &'static str)> {
    let mapped = match constraint {
        "accounts_email_key" => ("email", "email already in use"),
        "professionals_license_key" => ("matricula", "license number already in use"),
        "patients_national_id_key" => ("dni", "dni already in use"),
        "clinical_records_patient_key" => ("paciente", "patient already has a clinical record"),
        "appointments_professional_fkey" => ("profesional", "professional does not exist"),
        "appointments_room_fkey" => ("consultorio", "consulting room does not exist"),
        "appointments_patient_fkey"
        | "disorders_patient_fkey"
        | "drugs_patient_fkey"
        | "clinical_records_patient_fkey" => ("paciente", "patient does not exist"),
        "clinical_notes_appointment_fkey" => ("consulta", "appointment does not exist"),
        "professional_specialties_specialty_fkey" => {
            ("especialidades", "specialty does not exist")
        }
        "room_professionals_professional_fkey" => {
            ("profesionales", "professional does not exist")
        }
        _ => return None,
    };
    Some(mapped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_constraints_map_to_fields() {
        assert_eq!(
            constraint_violation("accounts_email_key"),
            Some(("email", "email already in use"))
        );
        assert_eq!(
            constraint_violation("professionals_license_key"),
            Some(("matricula", "license number already in use"))
        );
        assert_eq!(constraint_violation("patients_national_id_key").map(|c| c.0), Some("dni"));
    }

    #[test]
    fn foreign_keys_map_to_reference_fields() {
        assert_eq!(
            constraint_violation("appointments_room_fkey").map(|c| c.0),
            Some("consultorio")
        );
        assert_eq!(
            constraint_violation("drugs_patient_fkey").map(|c| c.0),
            Some("paciente")
        );
    }

    #[test]
    fn unknown_constraint_is_unmapped() {
        assert_eq!(constraint_violation("professionals_account_key"), None);
    }

    #[test]
    fn validation_renders_bad_request() {
        let response =
            AppError::Validation(FieldErrors::single("dni", "dni already in use")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn internal_hides_details() {
        let response = AppError::Internal("secret".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
