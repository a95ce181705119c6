//! Development data generator.
//!
//! Writes through the same repositories as the HTTP layer, so every seeded
//! row passed the same constraints an API client would hit.

use std::collections::HashSet;

use chrono::{Duration, Utc};
use cliento_core::{
    Appointment, AppointmentPayload, ClinicalNote, ClinicalNotePayload, ClinicalRecord,
    ClinicalRecordPayload, ConsultingRoom, ConsultingRoomPayload, Disorder, DisorderPayload, Drug,
    DrugPayload, Patient, PatientPayload, ProfessionalPayload, Role, Specialty, SpecialtyPayload,
};
use deadpool_postgres::Pool;
use rand::{Rng, rngs::StdRng, seq::SliceRandom};

use crate::auth::{self, AuthSettings};
use crate::db::{ProfessionalRepository, Repository};
use crate::error::AppError;

/// Password given to every seeded account.
pub const SEED_PASSWORD: &str = "12345678";

const SPECIALTIES: &[(&str, &str)] = &[
    ("Psicología Clínica", "Evaluación y tratamiento de trastornos psicológicos."),
    ("Psiquiatría", "Diagnóstico y tratamiento médico de trastornos mentales."),
    ("Terapia Familiar", "Intervención sobre la dinámica del grupo familiar."),
    ("Neuropsicología", "Relación entre funciones cerebrales y conducta."),
];
const FIRST_NAMES: &[&str] = &[
    "Juan", "Ana", "Pedro", "Maria", "Lucia", "Martin", "Sofia", "Diego", "Valentina", "Tomas",
    "Camila", "Julian",
];
const LAST_NAMES: &[&str] = &[
    "Perez", "Gomez", "Lopez", "Rodriguez", "Fernandez", "Garcia", "Martinez", "Sanchez",
    "Romero", "Alvarez",
];
const STREETS: &[&str] = &[
    "Calle Falsa",
    "Avenida Siempre Viva",
    "Avenida Corrientes",
    "Calle San Martin",
    "Avenida Rivadavia",
];
const DISORDERS: &[(&str, &str)] = &[
    ("Ansiedad", "Trastorno de ansiedad generalizada."),
    ("Depresión", "Trastorno depresivo mayor."),
    ("TOC", "Trastorno obsesivo compulsivo."),
    ("Insomnio", "Dificultad persistente para conciliar el sueño."),
    ("TEPT", "Trastorno de estrés postraumático."),
];
const DRUGS: &[(&str, &str)] = &[
    ("Sertralina", "Antidepresivo ISRS."),
    ("Clonazepam", "Ansiolítico benzodiacepínico."),
    ("Fluoxetina", "Antidepresivo ISRS."),
    ("Quetiapina", "Antipsicótico atípico."),
    ("Melatonina", "Regulador del ciclo de sueño."),
];
const MANUFACTURERS: &[&str] = &["Laboratorio X", "Laboratorio Y", "Farmacéutica Sur", "Bagó"];
const NOTES: &[&str] = &[
    "Primera entrevista; se acuerda encuadre y frecuencia semanal.",
    "El paciente refiere mejoría en el descanso nocturno.",
    "Se revisa la adherencia a la medicación indicada.",
    "Se trabajan técnicas de respiración y registro de pensamientos.",
];

/// How many rows of each kind to create.
#[derive(Debug, Clone)]
pub struct SeedPlan {
    pub specialties: usize,
    pub professionals: usize,
    pub rooms: usize,
    pub patients: usize,
    pub appointments: usize,
    pub disorders: usize,
    pub drugs: usize,
}

impl Default for SeedPlan {
    fn default() -> Self {
        Self {
            specialties: 3,
            professionals: 5,
            rooms: 3,
            patients: 10,
            appointments: 15,
            disorders: 10,
            drugs: 10,
        }
    }
}

/// Rows actually written.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub specialties: usize,
    pub professionals: usize,
    pub rooms: usize,
    pub patients: usize,
    pub appointments: usize,
    pub disorders: usize,
    pub drugs: usize,
    pub clinical_records: usize,
    pub clinical_notes: usize,
}

fn person(rng: &mut StdRng) -> (String, String) {
    let first = FIRST_NAMES.choose(rng).copied().unwrap_or("Juan");
    let last = LAST_NAMES.choose(rng).copied().unwrap_or("Perez");
    (first.to_string(), last.to_string())
}

fn address(rng: &mut StdRng) -> String {
    let street = STREETS.choose(rng).copied().unwrap_or("Calle Falsa");
    format!("{} {}", street, rng.gen_range(1..2000))
}

fn phone(rng: &mut StdRng) -> String {
    format!("11{:08}", rng.gen_range(0..100_000_000u32))
}

/// Populate the database according to `plan`.
pub async fn run(
    pool: &Pool,
    plan: &SeedPlan,
    settings: &AuthSettings,
    rng: &mut StdRng,
) -> Result<SeedReport, AppError> {
    let mut report = SeedReport::default();

    let specialty_repo = Repository::<Specialty>::new(pool.clone());
    let mut specialty_ids = Vec::new();
    for (name, description) in SPECIALTIES.iter().cycle().take(plan.specialties) {
        let specialty = specialty_repo
            .create(&SpecialtyPayload {
                name: Some(name.to_string()),
                description: Some(description.to_string()),
            })
            .await?;
        specialty_ids.push(specialty.id);
    }
    report.specialties = specialty_ids.len();

    // Same password for every account, so hash it once
    let password_hash =
        auth::hash_password(SEED_PASSWORD.to_string(), settings.password_iterations).await?;
    let professional_repo = ProfessionalRepository::new(pool.clone());
    let licenses = rand::seq::index::sample(rng, 10_000, plan.professionals.min(10_000));
    let mut professional_ids = Vec::new();
    for (i, license) in licenses.into_iter().enumerate() {
        let (first, last) = person(rng);
        let take = if specialty_ids.is_empty() {
            0
        } else {
            rng.gen_range(1..=specialty_ids.len())
        };
        let specialties = specialty_ids.choose_multiple(rng, take).copied().collect();

        let payload = ProfessionalPayload {
            email: Some(format!(
                "{}.{}{}@example.com",
                first.to_lowercase(),
                last.to_lowercase(),
                i + 1
            )),
            password: None,
            first_name: Some(first),
            last_name: Some(last),
            license_number: Some(format!("MAT-{:04}", license)),
            specialties,
            therapist: rng.gen_bool(0.5),
            psychiatrist: rng.gen_bool(0.5),
            psychologist: rng.gen_bool(0.5),
            is_active: true,
        };
        let professional = professional_repo
            .create(&payload, &password_hash, Role::Professional)
            .await?;
        professional_ids.push(professional.id);
    }
    report.professionals = professional_ids.len();

    let room_repo = Repository::<ConsultingRoom>::new(pool.clone());
    let mut room_ids = Vec::new();
    for _ in 0..plan.rooms {
        let take = if professional_ids.is_empty() {
            0
        } else {
            rng.gen_range(1..=professional_ids.len())
        };
        let room = room_repo
            .create(&ConsultingRoomPayload {
                address: Some(address(rng)),
                phone: Some(phone(rng)),
                professionals: professional_ids.choose_multiple(rng, take).copied().collect(),
            })
            .await?;
        room_ids.push(room.id);
    }
    report.rooms = room_ids.len();

    let patient_repo = Repository::<Patient>::new(pool.clone());
    let record_repo = Repository::<ClinicalRecord>::new(pool.clone());
    let today = Utc::now().date_naive();
    let mut used_dni = HashSet::new();
    let mut patient_ids = Vec::new();
    for _ in 0..plan.patients {
        let dni = loop {
            let candidate = rng.gen_range(10_000_000..100_000_000u32);
            if used_dni.insert(candidate) {
                break candidate;
            }
        };
        let (first, last) = person(rng);
        let age_days = rng.gen_range(18 * 365..=80 * 365);

        let patient = patient_repo
            .create(&PatientPayload {
                email: Some(format!(
                    "{}.{}.{}@example.com",
                    first.to_lowercase(),
                    last.to_lowercase(),
                    dni
                )),
                first_name: Some(first),
                last_name: Some(last),
                national_id: Some(dni.to_string()),
                birth_date: Some(today - Duration::days(age_days)),
                phone: Some(phone(rng)),
                address: Some(address(rng)),
                height: Some(f64::from(rng.gen_range(150..=200u32)) / 100.0),
                weight: Some(f64::from(rng.gen_range(5000..=10000u32)) / 100.0),
            })
            .await?;

        record_repo
            .create(&ClinicalRecordPayload {
                patient_id: Some(patient.id),
            })
            .await?;
        report.clinical_records += 1;
        patient_ids.push(patient.id);
    }
    report.patients = patient_ids.len();

    let appointment_repo = Repository::<Appointment>::new(pool.clone());
    let note_repo = Repository::<ClinicalNote>::new(pool.clone());
    for _ in 0..plan.appointments {
        let (Some(&professional), Some(&room), Some(&patient)) = (
            professional_ids.choose(rng),
            room_ids.choose(rng),
            patient_ids.choose(rng),
        ) else {
            break;
        };

        let minutes_ago = rng.gen_range(0..180 * 24 * 60);
        let appointment = appointment_repo
            .create(&AppointmentPayload {
                scheduled_at: Some(Utc::now() - Duration::minutes(minutes_ago)),
                professional_id: Some(professional),
                room_id: Some(room),
                patient_id: Some(patient),
                is_virtual: rng.gen_bool(0.5),
            })
            .await?;
        report.appointments += 1;

        note_repo
            .create(&ClinicalNotePayload {
                appointment_id: Some(appointment.id),
                content: NOTES.choose(rng).map(|n| n.to_string()),
            })
            .await?;
        report.clinical_notes += 1;
    }

    let disorder_repo = Repository::<Disorder>::new(pool.clone());
    for _ in 0..plan.disorders {
        let (Some(&patient), Some((name, description))) =
            (patient_ids.choose(rng), DISORDERS.choose(rng))
        else {
            break;
        };
        disorder_repo
            .create(&DisorderPayload {
                name: Some(name.to_string()),
                description: Some(description.to_string()),
                patient_id: Some(patient),
            })
            .await?;
        report.disorders += 1;
    }

    let drug_repo = Repository::<Drug>::new(pool.clone());
    for _ in 0..plan.drugs {
        let (Some(&patient), Some((name, description)), Some(manufacturer)) = (
            patient_ids.choose(rng),
            DRUGS.choose(rng),
            MANUFACTURERS.choose(rng),
        ) else {
            break;
        };
        drug_repo
            .create(&DrugPayload {
                name: Some(name.to_string()),
                description: Some(description.to_string()),
                manufacturer: Some(manufacturer.to_string()),
                patient_id: Some(patient),
            })
            .await?;
        report.drugs += 1;
    }

    tracing::info!(?report, "Seed data created");
    Ok(report)
}
