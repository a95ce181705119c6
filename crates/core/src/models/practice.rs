//! Professionals, their specialties and the consulting rooms they work from.

use serde::{Deserialize, Serialize};

use crate::error::FieldErrors;
use crate::validate::{self, Validate};

fn default_true() -> bool {
    true
}

/// Clinician profile. The email belongs to the linked login account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Professional {
    pub id: i32,
    pub email: String,
    #[serde(rename = "nombre")]
    pub first_name: String,
    #[serde(rename = "apellido")]
    pub last_name: String,
    #[serde(rename = "matricula")]
    pub license_number: String,
    #[serde(rename = "especialidades")]
    pub specialties: Vec<i32>,
    #[serde(rename = "terapeuta")]
    pub therapist: bool,
    #[serde(rename = "psiquiatra")]
    pub psychiatrist: bool,
    #[serde(rename = "psicologo")]
    pub psychologist: bool,
    pub is_active: bool,
}

/// Write payload for `/profesional/`.
///
/// `password` is write-only. It is mandatory on create and optional on
/// update, where omitting it keeps the stored credential.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfessionalPayload {
    pub email: Option<String>,
    #[serde(alias = "contrasena")]
    pub password: Option<String>,
    #[serde(rename = "nombre")]
    pub first_name: Option<String>,
    #[serde(rename = "apellido")]
    pub last_name: Option<String>,
    #[serde(rename = "matricula")]
    pub license_number: Option<String>,
    #[serde(rename = "especialidades", default)]
    pub specialties: Vec<i32>,
    #[serde(rename = "terapeuta", default)]
    pub therapist: bool,
    #[serde(rename = "psiquiatra", default)]
    pub psychiatrist: bool,
    #[serde(rename = "psicologo", default)]
    pub psychologist: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl ProfessionalPayload {
    /// Validation for inserts: everything in [`Validate`] plus a password.
    pub fn validate_new(&self) -> Result<(), FieldErrors> {
        let mut errors = self.collect();
        validate::password(&mut errors, "password", &self.password, true);
        errors.into_result()
    }

    fn collect(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        validate::required_email(&mut errors, "email", &self.email);
        validate::required_text(&mut errors, "nombre", &self.first_name, 100);
        validate::required_text(&mut errors, "apellido", &self.last_name, 100);
        validate::required_text(&mut errors, "matricula", &self.license_number, 100);
        errors
    }
}

impl Validate for ProfessionalPayload {
    const VERBATIM: &'static [&'static str] = validate::PASSWORD_KEYS;

    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = self.collect();
        validate::password(&mut errors, "password", &self.password, false);
        errors.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Specialty {
    pub id: i32,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpecialtyPayload {
    #[serde(rename = "nombre")]
    pub name: Option<String>,
    #[serde(rename = "descripcion")]
    pub description: Option<String>,
}

impl Validate for SpecialtyPayload {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        validate::required_text(&mut errors, "nombre", &self.name, 100);
        validate::required_text(&mut errors, "descripcion", &self.description, usize::MAX);
        errors.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsultingRoom {
    pub id: i32,
    #[serde(rename = "direccion")]
    pub address: String,
    #[serde(rename = "telefono")]
    pub phone: String,
    #[serde(rename = "profesionales")]
    pub professionals: Vec<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConsultingRoomPayload {
    #[serde(rename = "direccion")]
    pub address: Option<String>,
    #[serde(rename = "telefono")]
    pub phone: Option<String>,
    #[serde(rename = "profesionales", default)]
    pub professionals: Vec<i32>,
}

impl Validate for ConsultingRoomPayload {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        validate::required_text(&mut errors, "direccion", &self.address, 200);
        validate::required_text(&mut errors, "telefono", &self.phone, 20);
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::parse_payload;
    use serde_json::json;

    #[test]
    fn professional_create_requires_password() {
        let payload: ProfessionalPayload = serde_json::from_value(json!({
            "email": "juan@gmail.com",
            "nombre": "Juan",
            "apellido": "Pérez",
            "matricula": "12345"
        }))
        .unwrap();

        assert!(payload.validate().is_ok());
        let errors = payload.validate_new().unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["password"]);
    }

    #[test]
    fn professional_flags_default_off_and_active_on() {
        let payload: ProfessionalPayload = parse_payload(json!({
            "email": "ana@gmail.com",
            "nombre": "Ana",
            "apellido": "Gómez",
            "matricula": "67890",
            "psiquiatra": true
        }))
        .unwrap();

        assert!(payload.psychiatrist);
        assert!(!payload.therapist);
        assert!(payload.is_active);
        assert!(payload.specialties.is_empty());
    }

    #[test]
    fn professional_lists_every_missing_field() {
        let errors = parse_payload::<ProfessionalPayload>(json!({"email": "nope"})).unwrap_err();
        for field in ["email", "nombre", "apellido", "matricula"] {
            assert!(errors.contains(field), "missing error for {field}");
        }
    }

    #[test]
    fn professional_serializes_with_wire_names() {
        let professional = Professional {
            id: 1,
            email: "juan@gmail.com".into(),
            first_name: "Juan".into(),
            last_name: "Pérez".into(),
            license_number: "12345".into(),
            specialties: vec![1],
            therapist: true,
            psychiatrist: false,
            psychologist: false,
            is_active: true,
        };
        let value = serde_json::to_value(&professional).unwrap();
        assert_eq!(value["nombre"], "Juan");
        assert_eq!(value["matricula"], "12345");
        assert_eq!(value["especialidades"], json!([1]));
        assert!(value.get("password").is_none());
    }

    #[test]
    fn room_requires_address_and_phone() {
        let errors = parse_payload::<ConsultingRoomPayload>(json!({})).unwrap_err();
        assert!(errors.contains("direccion"));
        assert!(errors.contains("telefono"));
    }
}
