//! Account lookups and bearer-token storage.

use chrono::{DateTime, Duration, Utc};
use cliento_core::{Role, validate::normalize_email};
use deadpool_postgres::Pool;
use tokio_postgres::Row;

use crate::auth::{AuthContext, token};
use crate::error::AppError;

const CONTEXT_COLUMNS: &str = "a.id AS account_id, a.email, a.role, a.is_active, \
                               a.password_hash, p.id AS professional_id, p.first_name, p.last_name";

/// What login needs to know about an account.
pub struct LoginAccount {
    pub password_hash: String,
    pub is_active: bool,
    pub context: AuthContext,
}

fn context_from_row(row: &Row) -> Result<AuthContext, AppError> {
    let role: String = row.try_get("role")?;
    Ok(AuthContext {
        account_id: row.try_get("account_id")?,
        professional_id: row.try_get("professional_id")?,
        email: row.try_get("email")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        role: role.parse::<Role>().map_err(AppError::Internal)?,
    })
}

/// Repository for accounts and their tokens
#[derive(Clone)]
pub struct AccountRepository {
    pool: Pool,
}

impl AccountRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<LoginAccount>, AppError> {
        let client = self.pool.get().await?;
        let sql = format!(
            "SELECT {} FROM accounts a JOIN professionals p ON p.account_id = a.id
             WHERE a.email = $1",
            CONTEXT_COLUMNS
        );
        let email = normalize_email(email);
        let Some(row) = client.query_opt(sql.as_str(), &[&email]).await? else {
            return Ok(None);
        };

        Ok(Some(LoginAccount {
            password_hash: row.try_get("password_hash")?,
            is_active: row.try_get("is_active")?,
            context: context_from_row(&row)?,
        }))
    }

    /// Issue a new token for `account_id`, dropping its expired ones.
    /// Returns the plaintext token (never stored) and its expiry.
    pub async fn issue_token(
        &self,
        account_id: i32,
        ttl_hours: i64,
    ) -> Result<(String, DateTime<Utc>), AppError> {
        let ttl = Duration::try_hours(ttl_hours)
            .ok_or_else(|| AppError::Internal(format!("Invalid token TTL: {}h", ttl_hours)))?;
        let expires_at = Utc::now() + ttl;
        let token = token::generate_token();
        let digest = token::token_digest(&token);

        let client = self.pool.get().await?;
        client
            .execute(
                "DELETE FROM auth_tokens WHERE account_id = $1 AND expires_at <= NOW()",
                &[&account_id],
            )
            .await?;
        client
            .execute(
                "INSERT INTO auth_tokens (token_hash, account_id, expires_at) VALUES ($1, $2, $3)",
                &[&digest, &account_id, &expires_at],
            )
            .await?;

        Ok((token, expires_at))
    }

    /// The caller behind an unexpired token of an active account.
    pub async fn resolve_token(&self, token: &str) -> Result<Option<AuthContext>, AppError> {
        let client = self.pool.get().await?;
        let sql = format!(
            "SELECT {} FROM auth_tokens t
             JOIN accounts a ON a.id = t.account_id
             JOIN professionals p ON p.account_id = a.id
             WHERE t.token_hash = $1 AND t.expires_at > NOW() AND a.is_active",
            CONTEXT_COLUMNS
        );
        let digest = token::token_digest(token);

        match client.query_opt(sql.as_str(), &[&digest]).await? {
            Some(row) => Ok(Some(context_from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// Forget a token. Unknown tokens are not an error.
    pub async fn revoke_token(&self, token: &str) -> Result<bool, AppError> {
        let client = self.pool.get().await?;
        let digest = token::token_digest(token);
        let deleted = client
            .execute("DELETE FROM auth_tokens WHERE token_hash = $1", &[&digest])
            .await?;
        Ok(deleted > 0)
    }
}
