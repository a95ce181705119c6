//! Appointments ("consultas") and the clinical notes written during them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FieldErrors;
use crate::validate::{self, Validate};

/// A scheduled encounter between a professional, a room and a patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i32,
    #[serde(rename = "fecha")]
    pub scheduled_at: DateTime<Utc>,
    #[serde(rename = "profesional")]
    pub professional_id: i32,
    #[serde(rename = "consultorio")]
    pub room_id: i32,
    #[serde(rename = "paciente")]
    pub patient_id: i32,
    #[serde(rename = "virtual")]
    pub is_virtual: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppointmentPayload {
    #[serde(rename = "fecha")]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(rename = "profesional")]
    pub professional_id: Option<i32>,
    #[serde(rename = "consultorio")]
    pub room_id: Option<i32>,
    #[serde(rename = "paciente")]
    pub patient_id: Option<i32>,
    #[serde(rename = "virtual", default)]
    pub is_virtual: bool,
}

impl Validate for AppointmentPayload {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        validate::required(&mut errors, "fecha", &self.scheduled_at);
        validate::required(&mut errors, "profesional", &self.professional_id);
        validate::required(&mut errors, "consultorio", &self.room_id);
        validate::required(&mut errors, "paciente", &self.patient_id);
        errors.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicalNote {
    pub id: i32,
    #[serde(rename = "consulta")]
    pub appointment_id: i32,
    #[serde(rename = "contenido")]
    pub content: String,
    #[serde(rename = "fecha_creacion")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "fecha_actualizacion")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClinicalNotePayload {
    #[serde(rename = "consulta")]
    pub appointment_id: Option<i32>,
    #[serde(rename = "contenido")]
    pub content: Option<String>,
}

impl Validate for ClinicalNotePayload {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        validate::required(&mut errors, "consulta", &self.appointment_id);
        validate::required_text(&mut errors, "contenido", &self.content, usize::MAX);
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::parse_payload;
    use serde_json::json;

    #[test]
    fn appointment_defaults_to_in_person() {
        let payload: AppointmentPayload = parse_payload(json!({
            "fecha": "2026-03-01T14:30:00Z",
            "profesional": 1,
            "consultorio": 2,
            "paciente": 3
        }))
        .unwrap();
        assert!(!payload.is_virtual);
        assert_eq!(payload.room_id, Some(2));
    }

    #[test]
    fn appointment_reports_all_missing_references() {
        let errors = parse_payload::<AppointmentPayload>(json!({"virtual": true})).unwrap_err();
        assert_eq!(
            errors.fields().collect::<Vec<_>>(),
            vec!["consultorio", "fecha", "paciente", "profesional"]
        );
    }

    #[test]
    fn note_needs_content() {
        let errors =
            parse_payload::<ClinicalNotePayload>(json!({"consulta": 1, "contenido": ""}))
                .unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["contenido"]);
    }
}
