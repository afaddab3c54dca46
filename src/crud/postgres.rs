//! PostgreSQL repository
//!
//! Generic sqlx-backed [`Repository`] for any entity that describes its table.

use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::QueryScalar;
use sqlx::{FromRow, PgConnection, PgPool, Postgres};

use super::repository::{distinct_ids, Repository};
use super::Record;
use crate::audit::{AuditEntity, AuditEntry, AuditLogError, AuditTrail};

/// Write query returning the affected row id
pub type IdQuery<'q> = QueryScalar<'q, Postgres, i64, PgArguments>;

/// Table description of an entity.
///
/// Reads select from `TABLE` aliased as `t`; entities with embedded
/// references override [`PgEntity::select_sql`] to join them in.
pub trait PgEntity: Record + for<'r> FromRow<'r, PgRow> + Unpin {
    const TABLE: &'static str;

    /// Writable columns, in the order [`PgEntity::bind_columns`] binds them
    const COLUMNS: &'static [&'static str];

    fn select_sql() -> String {
        let columns: Vec<String> = Self::COLUMNS.iter().map(|c| format!("t.{}", c)).collect();
        format!("SELECT t.id, {} FROM {} t", columns.join(", "), Self::TABLE)
    }

    fn bind_columns<'q>(&'q self, query: IdQuery<'q>) -> IdQuery<'q>;
}

pub(crate) fn insert_sql<E: PgEntity>() -> String {
    let placeholders: Vec<String> = (1..=E::COLUMNS.len()).map(|i| format!("${}", i)).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING id",
        E::TABLE,
        E::COLUMNS.join(", "),
        placeholders.join(", ")
    )
}

pub(crate) fn update_sql<E: PgEntity>() -> String {
    let assignments: Vec<String> = E::COLUMNS
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{} = ${}", c, i + 1))
        .collect();
    format!(
        "UPDATE {} SET {} WHERE id = ${} RETURNING id",
        E::TABLE,
        assignments.join(", "),
        E::COLUMNS.len() + 1
    )
}

fn select_by_id_sql<E: PgEntity>() -> String {
    format!("{} WHERE t.id = $1", E::select_sql())
}

/// Insert or update `entity` on `conn`, returning the row id
async fn write_row<E: PgEntity>(entity: &E, conn: &mut PgConnection) -> Result<i64, sqlx::Error> {
    match entity.id() {
        None => {
            let sql = insert_sql::<E>();
            entity
                .bind_columns(sqlx::query_scalar(&sql))
                .fetch_one(&mut *conn)
                .await
        }
        Some(id) => {
            let sql = update_sql::<E>();
            entity
                .bind_columns(sqlx::query_scalar(&sql))
                .bind(id)
                .fetch_one(&mut *conn)
                .await
        }
    }
}

/// Repository over one table
pub struct PgRepository<E> {
    pool: PgPool,
    _entity: PhantomData<fn() -> E>,
}

impl<E> PgRepository<E> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }
}

impl<E> Clone for PgRepository<E> {
    fn clone(&self) -> Self {
        Self::new(self.pool.clone())
    }
}

#[async_trait]
impl<E: PgEntity> Repository<E> for PgRepository<E> {
    async fn find_by_id(&self, id: i64) -> Result<Option<E>, sqlx::Error> {
        let sql = select_by_id_sql::<E>();
        sqlx::query_as::<_, E>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn find_all_by_id(&self, ids: &[i64]) -> Result<Vec<E>, sqlx::Error> {
        let ids = distinct_ids(ids);
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "{} WHERE t.id = ANY($1) ORDER BY array_position($1::bigint[], t.id)",
            E::select_sql()
        );
        sqlx::query_as::<_, E>(&sql)
            .bind(&ids)
            .fetch_all(&self.pool)
            .await
    }

    async fn save(&self, entity: E) -> Result<E, sqlx::Error> {
        let id = {
            let mut conn = self.pool.acquire().await?;
            write_row(&entity, &mut conn).await?
        };

        tracing::debug!(table = E::TABLE, id, "Row saved");

        self.find_by_id(id).await?.ok_or(sqlx::Error::RowNotFound)
    }

    /// The audit row goes to this pool's `audit` table on the same
    /// transaction, so `trail` is not consulted.
    async fn save_audited(
        &self,
        entity: E,
        _trail: &AuditTrail,
        entry: AuditEntry<E>,
    ) -> Result<E, AuditLogError> {
        // Start transaction for consistency
        let mut tx = self.pool.begin().await?;

        let id = write_row(&entity, &mut tx).await?;

        let select = select_by_id_sql::<E>();
        let stored = sqlx::query_as::<_, E>(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;

        let row = entry(&stored)?;
        let insert = insert_sql::<AuditEntity>();
        let audit_id: i64 = row
            .bind_columns(sqlx::query_scalar(&insert))
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(table = E::TABLE, id, audit_id, "Row saved with audit entry");

        Ok(stored)
    }
}
