//! Login accounts and the authentication request/response bodies.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FieldErrors;
use crate::validate::{self, Validate};

/// Account role, stored as lowercase text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Professional,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Professional => "professional",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "professional" => Ok(Role::Professional),
            "admin" => Ok(Role::Admin),
            other => Err(format!("Unknown role '{}'", other)),
        }
    }
}

/// Body of `POST /register/`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(rename = "nombre", alias = "name")]
    pub first_name: Option<String>,
    #[serde(rename = "apellido")]
    pub last_name: Option<String>,
    #[serde(rename = "matricula")]
    pub license_number: Option<String>,
}

impl Validate for RegisterRequest {
    const VERBATIM: &'static [&'static str] = validate::PASSWORD_KEYS;

    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        validate::required_email(&mut errors, "email", &self.email);
        validate::password(&mut errors, "password", &self.password, true);
        validate::required_text(&mut errors, "nombre", &self.first_name, 100);
        validate::required_text(&mut errors, "apellido", &self.last_name, 100);
        validate::required_text(&mut errors, "matricula", &self.license_number, 100);
        errors.into_result()
    }
}

/// Body of `POST /login/`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    #[serde(alias = "contrasena")]
    pub password: Option<String>,
}

impl Validate for LoginRequest {
    const VERBATIM: &'static [&'static str] = validate::PASSWORD_KEYS;

    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        validate::required_text(&mut errors, "email", &self.email, 254);
        if self.password.as_deref().is_none_or(str::is_empty) {
            errors.add("password", validate::REQUIRED);
        }
        errors.into_result()
    }
}

/// Minimal identity of the logged-in professional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    /// Professional profile id.
    pub id: i32,
    pub email: String,
    pub nombre: String,
    pub apellido: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserIdentity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub message: String,
    pub user: UserIdentity,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::parse_payload;
    use serde_json::json;

    #[test]
    fn register_accepts_name_alias() {
        let req: RegisterRequest = parse_payload(json!({
            "email": "a@x.com",
            "password": "password1",
            "name": "A",
            "apellido": "B",
            "matricula": "MAT-1"
        }))
        .unwrap();
        assert_eq!(req.first_name.as_deref(), Some("A"));
    }

    #[test]
    fn register_reports_missing_fields() {
        let errors = parse_payload::<RegisterRequest>(json!({"email": "a@x.com"})).unwrap_err();
        for field in ["password", "nombre", "apellido", "matricula"] {
            assert!(errors.contains(field), "missing error for {field}");
        }
        assert!(!errors.contains("email"));
    }

    #[test]
    fn login_accepts_contrasena_alias() {
        let req: LoginRequest =
            parse_payload(json!({"email": "juan@gmail.com", "contrasena": "12345678"})).unwrap();
        assert_eq!(req.password.as_deref(), Some("12345678"));
    }

    #[test]
    fn login_requires_both_fields() {
        let errors = parse_payload::<LoginRequest>(json!({"password": ""})).unwrap_err();
        assert!(errors.contains("email"));
        assert!(errors.contains("password"));
    }

    #[test]
    fn role_round_trips_through_text() {
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert_eq!(Role::Professional.to_string(), "professional");
        assert!("root".parse::<Role>().is_err());
    }
}
