//! Patients and the data hanging off them: disorders, drugs and the
//! clinical record.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FieldErrors;
use crate::validate::{self, Validate};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: i32,
    #[serde(rename = "nombre")]
    pub first_name: String,
    #[serde(rename = "apellido")]
    pub last_name: String,
    /// National identity document number, unique across patients.
    #[serde(rename = "dni")]
    pub national_id: String,
    #[serde(rename = "fecha_nacimiento")]
    pub birth_date: NaiveDate,
    #[serde(rename = "telefono")]
    pub phone: String,
    pub email: String,
    #[serde(rename = "direccion")]
    pub address: String,
    /// Metres.
    #[serde(rename = "altura")]
    pub height: f64,
    /// Kilograms.
    #[serde(rename = "peso")]
    pub weight: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatientPayload {
    #[serde(rename = "nombre")]
    pub first_name: Option<String>,
    #[serde(rename = "apellido")]
    pub last_name: Option<String>,
    #[serde(rename = "dni")]
    pub national_id: Option<String>,
    #[serde(rename = "fecha_nacimiento")]
    pub birth_date: Option<NaiveDate>,
    #[serde(rename = "telefono")]
    pub phone: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "direccion")]
    pub address: Option<String>,
    #[serde(rename = "altura")]
    pub height: Option<f64>,
    #[serde(rename = "peso")]
    pub weight: Option<f64>,
}

impl Validate for PatientPayload {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        validate::required_text(&mut errors, "nombre", &self.first_name, 100);
        validate::required_text(&mut errors, "apellido", &self.last_name, 100);
        validate::required_text(&mut errors, "dni", &self.national_id, 20);
        validate::required_text(&mut errors, "telefono", &self.phone, 20);
        validate::required_email(&mut errors, "email", &self.email);
        validate::required_text(&mut errors, "direccion", &self.address, 200);
        validate::positive(&mut errors, "altura", &self.height);
        validate::positive(&mut errors, "peso", &self.weight);

        match self.birth_date {
            None => errors.add("fecha_nacimiento", validate::REQUIRED),
            Some(date) if date > Utc::now().date_naive() => {
                errors.add("fecha_nacimiento", "Birth date cannot be in the future.")
            }
            Some(_) => {}
        }

        errors.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Disorder {
    pub id: i32,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "paciente")]
    pub patient_id: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DisorderPayload {
    #[serde(rename = "nombre")]
    pub name: Option<String>,
    #[serde(rename = "descripcion")]
    pub description: Option<String>,
    #[serde(rename = "paciente")]
    pub patient_id: Option<i32>,
}

impl Validate for DisorderPayload {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        validate::required_text(&mut errors, "nombre", &self.name, 100);
        validate::required_text(&mut errors, "descripcion", &self.description, usize::MAX);
        validate::required(&mut errors, "paciente", &self.patient_id);
        errors.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drug {
    pub id: i32,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "fabricante")]
    pub manufacturer: String,
    #[serde(rename = "paciente")]
    pub patient_id: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DrugPayload {
    #[serde(rename = "nombre")]
    pub name: Option<String>,
    #[serde(rename = "descripcion")]
    pub description: Option<String>,
    #[serde(rename = "fabricante")]
    pub manufacturer: Option<String>,
    #[serde(rename = "paciente")]
    pub patient_id: Option<i32>,
}

impl Validate for DrugPayload {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        validate::required_text(&mut errors, "nombre", &self.name, 100);
        validate::required_text(&mut errors, "descripcion", &self.description, usize::MAX);
        validate::required_text(&mut errors, "fabricante", &self.manufacturer, 100);
        validate::required(&mut errors, "paciente", &self.patient_id);
        errors.into_result()
    }
}

/// Administrative record container ("ficha"), at most one per patient.
///
/// `created_at` is set once on insert; `updated_at` is refreshed on every
/// write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicalRecord {
    pub id: i32,
    #[serde(rename = "paciente")]
    pub patient_id: i32,
    #[serde(rename = "fecha_creacion")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "fecha_actualizacion")]
    pub updated_at: DateTime<Utc>,
}

/// Timestamps are server-managed; any supplied values are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClinicalRecordPayload {
    #[serde(rename = "paciente")]
    pub patient_id: Option<i32>,
}

impl Validate for ClinicalRecordPayload {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        validate::required(&mut errors, "paciente", &self.patient_id);
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::parse_payload;
    use serde_json::json;

    fn pedro() -> serde_json::Value {
        json!({
            "nombre": "Pedro",
            "apellido": "López",
            "dni": "12345678",
            "fecha_nacimiento": "1990-01-01",
            "telefono": "123456789",
            "email": "pedro@example.com",
            "direccion": "Calle Falsa 123",
            "altura": 1.75,
            "peso": 70
        })
    }

    #[test]
    fn valid_patient_parses() {
        let payload: PatientPayload = parse_payload(pedro()).unwrap();
        assert_eq!(payload.national_id.as_deref(), Some("12345678"));
        assert_eq!(payload.weight, Some(70.0));
        assert_eq!(
            payload.birth_date,
            NaiveDate::from_ymd_opt(1990, 1, 1)
        );
    }

    #[test]
    fn future_birth_date_is_rejected() {
        let mut body = pedro();
        body["fecha_nacimiento"] = json!("2999-01-01");
        let errors = parse_payload::<PatientPayload>(body).unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["fecha_nacimiento"]);
    }

    #[test]
    fn malformed_date_is_a_non_field_error() {
        let mut body = pedro();
        body["fecha_nacimiento"] = json!("01/01/1990");
        let errors = parse_payload::<PatientPayload>(body).unwrap_err();
        assert!(errors.contains(validate::NON_FIELD_ERRORS));
    }

    #[test]
    fn drug_requires_patient_and_manufacturer() {
        let errors = parse_payload::<DrugPayload>(json!({
            "nombre": "Paracetamol",
            "descripcion": "Analgésico"
        }))
        .unwrap_err();
        assert!(errors.contains("fabricante"));
        assert!(errors.contains("paciente"));
        assert!(!errors.contains("nombre"));
    }

    #[test]
    fn record_ignores_client_timestamps() {
        let payload: ClinicalRecordPayload = parse_payload(json!({
            "paciente": 3,
            "fecha_creacion": "2000-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(payload.patient_id, Some(3));
    }
}
