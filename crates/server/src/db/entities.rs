//! Table mappings for the entities served by the generic repository.

use cliento_core::{
    Appointment, AppointmentPayload, ClinicalNote, ClinicalNotePayload, ClinicalRecord,
    ClinicalRecordPayload, ConsultingRoom, ConsultingRoomPayload, Disorder, DisorderPayload, Drug,
    DrugPayload, Patient, PatientPayload, Specialty, SpecialtyPayload,
};
use tokio_postgres::{Row, types::ToSql};

use super::repository::{Entity, Link};

/// `room_professionals`, owned by the room side.
pub const ROOM_PROFESSIONALS: Link = Link {
    table: "room_professionals",
    owner: "room_id",
    target: "professional_id",
};

impl Entity for Specialty {
    type Payload = SpecialtyPayload;

    const NAME: &'static str = "especialidad";
    const LABEL: &'static str = "Specialty";
    const TABLE: &'static str = "specialties";
    const SELECT: &'static [&'static str] = &["id", "name", "description"];
    const WRITE: &'static [&'static str] = &["name", "description"];

    fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
        })
    }

    fn params(p: &SpecialtyPayload) -> Vec<&(dyn ToSql + Sync)> {
        vec![&p.name as &(dyn ToSql + Sync), &p.description]
    }

    fn id(&self) -> i32 {
        self.id
    }
}

impl Entity for ConsultingRoom {
    type Payload = ConsultingRoomPayload;

    const NAME: &'static str = "consultorio";
    const LABEL: &'static str = "Consulting room";
    const TABLE: &'static str = "rooms";
    const SELECT: &'static [&'static str] = &["id", "address", "phone"];
    const WRITE: &'static [&'static str] = &["address", "phone"];
    const LINK: Option<Link> = Some(ROOM_PROFESSIONALS);

    fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            address: row.try_get("address")?,
            phone: row.try_get("phone")?,
            professionals: Vec::new(),
        })
    }

    fn params(p: &ConsultingRoomPayload) -> Vec<&(dyn ToSql + Sync)> {
        vec![&p.address as &(dyn ToSql + Sync), &p.phone]
    }

    fn link_ids(p: &ConsultingRoomPayload) -> &[i32] {
        &p.professionals
    }

    fn set_links(&mut self, ids: Vec<i32>) {
        self.professionals = ids;
    }

    fn id(&self) -> i32 {
        self.id
    }
}

impl Entity for Patient {
    type Payload = PatientPayload;

    const NAME: &'static str = "paciente";
    const LABEL: &'static str = "Patient";
    const TABLE: &'static str = "patients";
    const SELECT: &'static [&'static str] = &[
        "id",
        "first_name",
        "last_name",
        "national_id",
        "birth_date",
        "phone",
        "email",
        "address",
        "height",
        "weight",
    ];
    const WRITE: &'static [&'static str] = &[
        "first_name",
        "last_name",
        "national_id",
        "birth_date",
        "phone",
        "email",
        "address",
        "height",
        "weight",
    ];

    fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            national_id: row.try_get("national_id")?,
            birth_date: row.try_get("birth_date")?,
            phone: row.try_get("phone")?,
            email: row.try_get("email")?,
            address: row.try_get("address")?,
            height: row.try_get("height")?,
            weight: row.try_get("weight")?,
        })
    }

    fn params(p: &PatientPayload) -> Vec<&(dyn ToSql + Sync)> {
        vec![
            &p.first_name as &(dyn ToSql + Sync),
            &p.last_name,
            &p.national_id,
            &p.birth_date,
            &p.phone,
            &p.email,
            &p.address,
            &p.height,
            &p.weight,
        ]
    }

    fn id(&self) -> i32 {
        self.id
    }
}

impl Entity for Appointment {
    type Payload = AppointmentPayload;

    const NAME: &'static str = "consulta";
    const LABEL: &'static str = "Appointment";
    const TABLE: &'static str = "appointments";
    const SELECT: &'static [&'static str] = &[
        "id",
        "scheduled_at",
        "professional_id",
        "room_id",
        "patient_id",
        "is_virtual",
    ];
    const WRITE: &'static [&'static str] = &[
        "scheduled_at",
        "professional_id",
        "room_id",
        "patient_id",
        "is_virtual",
    ];

    fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            scheduled_at: row.try_get("scheduled_at")?,
            professional_id: row.try_get("professional_id")?,
            room_id: row.try_get("room_id")?,
            patient_id: row.try_get("patient_id")?,
            is_virtual: row.try_get("is_virtual")?,
        })
    }

    fn params(p: &AppointmentPayload) -> Vec<&(dyn ToSql + Sync)> {
        vec![
            &p.scheduled_at as &(dyn ToSql + Sync),
            &p.professional_id,
            &p.room_id,
            &p.patient_id,
            &p.is_virtual,
        ]
    }

    fn id(&self) -> i32 {
        self.id
    }
}

impl Entity for Disorder {
    type Payload = DisorderPayload;

    const NAME: &'static str = "trastorno";
    const LABEL: &'static str = "Disorder";
    const TABLE: &'static str = "disorders";
    const SELECT: &'static [&'static str] = &["id", "name", "description", "patient_id"];
    const WRITE: &'static [&'static str] = &["name", "description", "patient_id"];

    fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            patient_id: row.try_get("patient_id")?,
        })
    }

    fn params(p: &DisorderPayload) -> Vec<&(dyn ToSql + Sync)> {
        vec![&p.name as &(dyn ToSql + Sync), &p.description, &p.patient_id]
    }

    fn id(&self) -> i32 {
        self.id
    }
}

impl Entity for Drug {
    type Payload = DrugPayload;

    const NAME: &'static str = "droga";
    const LABEL: &'static str = "Drug";
    const TABLE: &'static str = "drugs";
    const SELECT: &'static [&'static str] =
        &["id", "name", "description", "manufacturer", "patient_id"];
    const WRITE: &'static [&'static str] = &["name", "description", "manufacturer", "patient_id"];

    fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            manufacturer: row.try_get("manufacturer")?,
            patient_id: row.try_get("patient_id")?,
        })
    }

    fn params(p: &DrugPayload) -> Vec<&(dyn ToSql + Sync)> {
        vec![
            &p.name as &(dyn ToSql + Sync),
            &p.description,
            &p.manufacturer,
            &p.patient_id,
        ]
    }

    fn id(&self) -> i32 {
        self.id
    }
}

impl Entity for ClinicalRecord {
    type Payload = ClinicalRecordPayload;

    const NAME: &'static str = "ficha";
    const LABEL: &'static str = "Clinical record";
    const TABLE: &'static str = "clinical_records";
    const SELECT: &'static [&'static str] = &["id", "patient_id", "created_at", "updated_at"];
    const WRITE: &'static [&'static str] = &["patient_id"];
    const TOUCH: Option<&'static str> = Some("updated_at = NOW()");

    fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            patient_id: row.try_get("patient_id")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn params(p: &ClinicalRecordPayload) -> Vec<&(dyn ToSql + Sync)> {
        vec![&p.patient_id as &(dyn ToSql + Sync)]
    }

    fn id(&self) -> i32 {
        self.id
    }
}

impl Entity for ClinicalNote {
    type Payload = ClinicalNotePayload;

    const NAME: &'static str = "nota";
    const LABEL: &'static str = "Clinical note";
    const TABLE: &'static str = "clinical_notes";
    const SELECT: &'static [&'static str] =
        &["id", "appointment_id", "content", "created_at", "updated_at"];
    const WRITE: &'static [&'static str] = &["appointment_id", "content"];
    const TOUCH: Option<&'static str> = Some("updated_at = NOW()");

    fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            appointment_id: row.try_get("appointment_id")?,
            content: row.try_get("content")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn params(p: &ClinicalNotePayload) -> Vec<&(dyn ToSql + Sync)> {
        vec![&p.appointment_id as &(dyn ToSql + Sync), &p.content]
    }

    fn id(&self) -> i32 {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params_match<E: Entity>(payload: &E::Payload) {
        assert_eq!(
            E::params(payload).len(),
            E::WRITE.len(),
            "{} binds a different number of params than it writes",
            E::NAME
        );
        assert_eq!(E::SELECT.first(), Some(&"id"));
    }

    #[test]
    fn every_entity_binds_one_param_per_written_column() {
        params_match::<Specialty>(&SpecialtyPayload::default());
        params_match::<ConsultingRoom>(&ConsultingRoomPayload::default());
        params_match::<Patient>(&PatientPayload::default());
        params_match::<Appointment>(&AppointmentPayload::default());
        params_match::<Disorder>(&DisorderPayload::default());
        params_match::<Drug>(&DrugPayload::default());
        params_match::<ClinicalRecord>(&ClinicalRecordPayload::default());
        params_match::<ClinicalNote>(&ClinicalNotePayload::default());
    }
}
