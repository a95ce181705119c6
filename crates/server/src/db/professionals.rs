//! Professional profiles and their login accounts, written together.

use cliento_core::{
    Professional, ProfessionalPayload, Role,
    validate::{clean, normalize_email},
};
use deadpool_postgres::Pool;
use tokio_postgres::Row;

use super::repository::{Link, load_links, replace_links};
use crate::error::AppError;

pub const PROFESSIONAL_SPECIALTIES: Link = Link {
    table: "professional_specialties",
    owner: "professional_id",
    target: "specialty_id",
};

const SELECT: &str = "SELECT p.id, a.email, p.first_name, p.last_name, p.license_number, \
                      p.therapist, p.psychiatrist, p.psychologist, a.is_active \
                      FROM professionals p JOIN accounts a ON a.id = p.account_id";

fn from_row(row: &Row) -> Result<Professional, tokio_postgres::Error> {
    Ok(Professional {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        license_number: row.try_get("license_number")?,
        specialties: Vec::new(),
        therapist: row.try_get("therapist")?,
        psychiatrist: row.try_get("psychiatrist")?,
        psychologist: row.try_get("psychologist")?,
        is_active: row.try_get("is_active")?,
    })
}

/// Repository for Professional CRUD operations
#[derive(Clone)]
pub struct ProfessionalRepository {
    pool: Pool,
}

impl ProfessionalRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Professional>, AppError> {
        let client = self.pool.get().await?;
        let sql = format!("{} ORDER BY p.id", SELECT);
        let rows = client.query(sql.as_str(), &[]).await?;

        let mut items = rows
            .iter()
            .map(from_row)
            .collect::<Result<Vec<_>, _>>()?;

        let ids: Vec<i32> = items.iter().map(|p| p.id).collect();
        let mut links = load_links(&client, PROFESSIONAL_SPECIALTIES, &ids).await?;
        for item in &mut items {
            item.specialties = links.remove(&item.id).unwrap_or_default();
        }
        Ok(items)
    }

    pub async fn get(&self, id: i32) -> Result<Option<Professional>, AppError> {
        let client = self.pool.get().await?;
        let sql = format!("{} WHERE p.id = $1", SELECT);
        let Some(row) = client.query_opt(sql.as_str(), &[&id]).await? else {
            return Ok(None);
        };

        let mut professional = from_row(&row)?;
        let mut links = load_links(&client, PROFESSIONAL_SPECIALTIES, &[id]).await?;
        professional.specialties = links.remove(&id).unwrap_or_default();
        Ok(Some(professional))
    }

    /// Create the account and the profile in one transaction. A duplicate
    /// email fails before the profile insert, a duplicate license after it;
    /// either way nothing is kept.
    pub async fn create(
        &self,
        payload: &ProfessionalPayload,
        password_hash: &str,
        role: Role,
    ) -> Result<Professional, AppError> {
        let email = normalize_email(payload.email.as_deref().unwrap_or_default());
        let first_name = clean(&payload.first_name).unwrap_or_default();
        let last_name = clean(&payload.last_name).unwrap_or_default();
        let license_number = clean(&payload.license_number).unwrap_or_default();

        let mut client = self.pool.get().await?;
        let tx = client.transaction().await?;

        let account = tx
            .query_one(
                "INSERT INTO accounts (email, password_hash, role, is_active)
                 VALUES ($1, $2, $3, $4) RETURNING id",
                &[&email, &password_hash, &role.as_str(), &payload.is_active],
            )
            .await?;
        let account_id: i32 = account.try_get(0)?;

        let row = tx
            .query_one(
                "INSERT INTO professionals
                   (account_id, first_name, last_name, license_number,
                    therapist, psychiatrist, psychologist)
                 VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id",
                &[
                    &account_id,
                    &first_name,
                    &last_name,
                    &license_number,
                    &payload.therapist,
                    &payload.psychiatrist,
                    &payload.psychologist,
                ],
            )
            .await?;
        let id: i32 = row.try_get(0)?;

        let specialties =
            replace_links(&tx, PROFESSIONAL_SPECIALTIES, id, &payload.specialties).await?;
        tx.commit().await?;

        Ok(Professional {
            id,
            email,
            first_name,
            last_name,
            license_number,
            specialties,
            therapist: payload.therapist,
            psychiatrist: payload.psychiatrist,
            psychologist: payload.psychologist,
            is_active: payload.is_active,
        })
    }

    /// Replace the profile and account fields. `password_hash` of `None`
    /// keeps the stored credential.
    pub async fn update(
        &self,
        id: i32,
        payload: &ProfessionalPayload,
        password_hash: Option<&str>,
    ) -> Result<Option<Professional>, AppError> {
        let email = normalize_email(payload.email.as_deref().unwrap_or_default());
        let first_name = clean(&payload.first_name).unwrap_or_default();
        let last_name = clean(&payload.last_name).unwrap_or_default();
        let license_number = clean(&payload.license_number).unwrap_or_default();

        let mut client = self.pool.get().await?;
        let tx = client.transaction().await?;

        let Some(row) = tx
            .query_opt(
                "UPDATE professionals
                 SET first_name = $1, last_name = $2, license_number = $3,
                     therapist = $4, psychiatrist = $5, psychologist = $6
                 WHERE id = $7 RETURNING account_id",
                &[
                    &first_name,
                    &last_name,
                    &license_number,
                    &payload.therapist,
                    &payload.psychiatrist,
                    &payload.psychologist,
                    &id,
                ],
            )
            .await?
        else {
            return Ok(None);
        };
        let account_id: i32 = row.try_get(0)?;

        tx.execute(
            "UPDATE accounts
             SET email = $1, is_active = $2, password_hash = COALESCE($3, password_hash)
             WHERE id = $4",
            &[&email, &payload.is_active, &password_hash, &account_id],
        )
        .await?;

        if !payload.is_active {
            tx.execute("DELETE FROM auth_tokens WHERE account_id = $1", &[&account_id])
                .await?;
        }

        let specialties =
            replace_links(&tx, PROFESSIONAL_SPECIALTIES, id, &payload.specialties).await?;
        tx.commit().await?;

        Ok(Some(Professional {
            id,
            email,
            first_name,
            last_name,
            license_number,
            specialties,
            therapist: payload.therapist,
            psychiatrist: payload.psychiatrist,
            psychologist: payload.psychologist,
            is_active: payload.is_active,
        }))
    }

    /// Delete the account behind the profile; the profile, its tokens,
    /// links and appointments cascade from it.
    pub async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let client = self.pool.get().await?;
        let deleted = client
            .execute(
                "DELETE FROM accounts
                 WHERE id = (SELECT account_id FROM professionals WHERE id = $1)",
                &[&id],
            )
            .await?;
        Ok(deleted > 0)
    }
}
