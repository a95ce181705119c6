//! Generic CRUD over one table per entity.
//!
//! Each entity describes its table, columns and parameter binding through
//! [`Entity`]; [`Repository`] turns that into SQL. Entities with a
//! many-to-many side (rooms ↔ professionals) declare a [`Link`] and the
//! repository keeps the link table in step inside the same transaction.

use std::collections::HashMap;
use std::marker::PhantomData;

use cliento_core::Validate;
use deadpool_postgres::Pool;
use serde::{Serialize, de::DeserializeOwned};
use tokio_postgres::{Row, types::ToSql};

use crate::error::AppError;

/// A many-to-many link table: `(owner, target)` pairs.
#[derive(Debug, Clone, Copy)]
pub struct Link {
    pub table: &'static str,
    pub owner: &'static str,
    pub target: &'static str,
}

pub trait Entity: Serialize + Send + Sync + Sized + 'static {
    type Payload: DeserializeOwned + Validate + Send + Sync + 'static;

    /// Route segment, e.g. `paciente`.
    const NAME: &'static str;
    /// Used in not-found messages.
    const LABEL: &'static str;
    const TABLE: &'static str;
    /// Columns read back into the entity, `id` first.
    const SELECT: &'static [&'static str];
    /// Columns written from the payload, in [`Entity::params`] order.
    const WRITE: &'static [&'static str];
    /// Extra assignment appended to every UPDATE.
    const TOUCH: Option<&'static str> = None;
    const LINK: Option<Link> = None;

    fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error>;
    fn params(payload: &Self::Payload) -> Vec<&(dyn ToSql + Sync)>;

    fn link_ids(_payload: &Self::Payload) -> &[i32] {
        &[]
    }

    fn set_links(&mut self, _ids: Vec<i32>) {}

    fn id(&self) -> i32;
}

/// Repository for one [`Entity`]
pub struct Repository<E> {
    pool: Pool,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for Repository<E> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> Repository<E> {
    pub fn new(pool: Pool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }

    /// All rows ordered by id
    pub async fn list(&self) -> Result<Vec<E>, AppError> {
        let client = self.pool.get().await?;
        let sql = format!("{} ORDER BY id", select_sql(E::TABLE, E::SELECT));
        let rows = client.query(sql.as_str(), &[]).await?;

        let mut items = rows
            .iter()
            .map(E::from_row)
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(link) = E::LINK {
            let ids: Vec<i32> = items.iter().map(E::id).collect();
            let mut links = load_links(&client, link, &ids).await?;
            for item in &mut items {
                item.set_links(links.remove(&item.id()).unwrap_or_default());
            }
        }

        Ok(items)
    }

    /// Get a row by primary key
    pub async fn get(&self, id: i32) -> Result<Option<E>, AppError> {
        let client = self.pool.get().await?;
        let sql = format!("{} WHERE id = $1", select_sql(E::TABLE, E::SELECT));
        let Some(row) = client.query_opt(sql.as_str(), &[&id]).await? else {
            return Ok(None);
        };

        let mut item = E::from_row(&row)?;
        if let Some(link) = E::LINK {
            let mut links = load_links(&client, link, &[id]).await?;
            item.set_links(links.remove(&id).unwrap_or_default());
        }
        Ok(Some(item))
    }

    /// Insert a validated payload and return the stored row
    pub async fn create(&self, payload: &E::Payload) -> Result<E, AppError> {
        let mut client = self.pool.get().await?;
        let tx = client.transaction().await?;

        let sql = insert_sql(E::TABLE, E::WRITE, E::SELECT);
        let row = tx.query_one(sql.as_str(), &E::params(payload)).await?;
        let mut item = E::from_row(&row)?;

        if let Some(link) = E::LINK {
            let ids = replace_links(&tx, link, item.id(), E::link_ids(payload)).await?;
            item.set_links(ids);
        }

        tx.commit().await?;
        Ok(item)
    }

    /// Replace every writable column; `None` if the id does not exist
    pub async fn update(&self, id: i32, payload: &E::Payload) -> Result<Option<E>, AppError> {
        let mut client = self.pool.get().await?;
        let tx = client.transaction().await?;

        let sql = update_sql(E::TABLE, E::WRITE, E::TOUCH, E::SELECT);
        let mut params = E::params(payload);
        params.push(&id);

        let Some(row) = tx.query_opt(sql.as_str(), &params).await? else {
            return Ok(None);
        };
        let mut item = E::from_row(&row)?;

        if let Some(link) = E::LINK {
            let ids = replace_links(&tx, link, id, E::link_ids(payload)).await?;
            item.set_links(ids);
        }

        tx.commit().await?;
        Ok(Some(item))
    }

    /// Delete a row; dependent rows go with it through `ON DELETE CASCADE`
    pub async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let client = self.pool.get().await?;
        let sql = format!("DELETE FROM {} WHERE id = $1", E::TABLE);
        let deleted = client.execute(sql.as_str(), &[&id]).await?;
        Ok(deleted > 0)
    }
}

/// Link targets for each owner id, sorted ascending.
pub(crate) async fn load_links(
    client: &tokio_postgres::Client,
    link: Link,
    owners: &[i32],
) -> Result<HashMap<i32, Vec<i32>>, AppError> {
    let mut map: HashMap<i32, Vec<i32>> = HashMap::new();
    if owners.is_empty() {
        return Ok(map);
    }

    let sql = format!(
        "SELECT {owner}, {target} FROM {table} WHERE {owner} = ANY($1) ORDER BY {target}",
        owner = link.owner,
        target = link.target,
        table = link.table,
    );
    let owners = owners.to_vec();
    for row in client.query(sql.as_str(), &[&owners]).await? {
        let owner: i32 = row.try_get(0)?;
        let target: i32 = row.try_get(1)?;
        map.entry(owner).or_default().push(target);
    }
    Ok(map)
}

/// Make `targets` the complete link set of `owner`. Returns the stored ids.
pub(crate) async fn replace_links(
    tx: &tokio_postgres::Transaction<'_>,
    link: Link,
    owner: i32,
    targets: &[i32],
) -> Result<Vec<i32>, AppError> {
    let mut targets = targets.to_vec();
    targets.sort_unstable();
    targets.dedup();

    let delete = format!("DELETE FROM {} WHERE {} = $1", link.table, link.owner);
    tx.execute(delete.as_str(), &[&owner]).await?;

    if !targets.is_empty() {
        let insert = format!(
            "INSERT INTO {table} ({owner}, {target}) SELECT $1, UNNEST($2::int4[])",
            table = link.table,
            owner = link.owner,
            target = link.target,
        );
        tx.execute(insert.as_str(), &[&owner, &targets]).await?;
    }

    Ok(targets)
}

fn select_sql(table: &str, columns: &[&str]) -> String {
    format!("SELECT {} FROM {}", columns.join(", "), table)
}

fn insert_sql(table: &str, write: &[&str], select: &[&str]) -> String {
    let placeholders: Vec<String> = (1..=write.len()).map(|i| format!("${}", i)).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        table,
        write.join(", "),
        placeholders.join(", "),
        select.join(", ")
    )
}

/// The id placeholder comes last, after the written columns.
fn update_sql(table: &str, write: &[&str], touch: Option<&str>, select: &[&str]) -> String {
    let mut assignments: Vec<String> = write
        .iter()
        .enumerate()
        .map(|(i, col)| format!("{} = ${}", col, i + 1))
        .collect();
    if let Some(touch) = touch {
        assignments.push(touch.to_string());
    }
    format!(
        "UPDATE {} SET {} WHERE id = ${} RETURNING {}",
        table,
        assignments.join(", "),
        write.len() + 1,
        select.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_clone<T: Clone>() {}

    #[test]
    fn repository_is_clone_for_any_type_parameter() {
        assert_clone::<Repository<()>>();
        assert_clone::<Repository<cliento_core::Patient>>();
    }

    #[test]
    fn insert_numbers_placeholders_in_column_order() {
        assert_eq!(
            insert_sql("drugs", &["name", "patient_id"], &["id", "name", "patient_id"]),
            "INSERT INTO drugs (name, patient_id) VALUES ($1, $2) RETURNING id, name, patient_id"
        );
    }

    #[test]
    fn update_puts_id_last_and_appends_touch() {
        assert_eq!(
            update_sql(
                "clinical_notes",
                &["appointment_id", "content"],
                Some("updated_at = NOW()"),
                &["id", "content"]
            ),
            "UPDATE clinical_notes SET appointment_id = $1, content = $2, updated_at = NOW() \
             WHERE id = $3 RETURNING id, content"
        );
    }

    #[test]
    fn select_lists_columns() {
        assert_eq!(
            select_sql("rooms", &["id", "address", "phone"]),
            "SELECT id, address, phone FROM rooms"
        );
    }
}
