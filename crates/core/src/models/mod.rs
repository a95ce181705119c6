//! Entity types as exposed over the API, plus their write payloads.

pub mod account;
pub mod appointment;
pub mod patient;
pub mod practice;

pub use account::{LoginRequest, LoginResponse, RegisterRequest, Role, SessionResponse, UserIdentity};
pub use appointment::{Appointment, AppointmentPayload, ClinicalNote, ClinicalNotePayload};
pub use patient::{
    ClinicalRecord, ClinicalRecordPayload, Disorder, DisorderPayload, Drug, DrugPayload, Patient,
    PatientPayload,
};
pub use practice::{
    ConsultingRoom, ConsultingRoomPayload, Professional, ProfessionalPayload, Specialty,
    SpecialtyPayload,
};
