//! Repository abstraction
//!
//! Persistence seam for every entity family: lookup by id, batch lookup,
//! and save (insert when the id is absent, update otherwise). Audited saves
//! write the record and its audit row as one unit.

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::Record;
use crate::audit::{AuditEntry, AuditLogError, AuditTrail};

#[async_trait]
pub trait Repository<E: Record>: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<E>, sqlx::Error>;

    /// Stored records whose id appears in `ids`, in order of first
    /// appearance. Unknown ids are skipped.
    async fn find_all_by_id(&self, ids: &[i64]) -> Result<Vec<E>, sqlx::Error>;

    /// Persist and return the stored form (id assigned on insert)
    async fn save(&self, entity: E) -> Result<E, sqlx::Error>;

    /// Like [`Repository::save`], plus the audit row `entry` builds from
    /// the stored form. Either both are written or neither is.
    async fn save_audited(
        &self,
        entity: E,
        trail: &AuditTrail,
        entry: AuditEntry<E>,
    ) -> Result<E, AuditLogError>;
}

/// Unique ids in order of first appearance
pub fn distinct_ids(ids: &[i64]) -> Vec<i64> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

/// Process-local repository backed by an ordered map
pub struct InMemoryRepository<E> {
    rows: RwLock<BTreeMap<i64, E>>,
    next_id: AtomicI64,
}

impl<E: Record> InMemoryRepository<E> {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Entity with its final id; explicit ids must not collide with later
    /// generated ones
    fn with_stored_id(&self, entity: E) -> (i64, E) {
        match entity.id() {
            Some(id) => {
                self.next_id.fetch_max(id + 1, Ordering::SeqCst);
                (id, entity)
            }
            None => {
                let id = self.next_id.fetch_add(1, Ordering::SeqCst);
                (id, entity.with_id(id))
            }
        }
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

impl<E: Record> Default for InMemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E: Record> Repository<E> for InMemoryRepository<E> {
    async fn find_by_id(&self, id: i64) -> Result<Option<E>, sqlx::Error> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn find_all_by_id(&self, ids: &[i64]) -> Result<Vec<E>, sqlx::Error> {
        let rows = self.rows.read().await;
        Ok(distinct_ids(ids)
            .into_iter()
            .filter_map(|id| rows.get(&id).cloned())
            .collect())
    }

    async fn save(&self, entity: E) -> Result<E, sqlx::Error> {
        let mut rows = self.rows.write().await;
        let (id, entity) = self.with_stored_id(entity);
        rows.insert(id, entity.clone());
        Ok(entity)
    }

    async fn save_audited(
        &self,
        entity: E,
        trail: &AuditTrail,
        entry: AuditEntry<E>,
    ) -> Result<E, AuditLogError> {
        // The write lock is held until the audit row is in, so the record
        // is never visible without it
        let mut rows = self.rows.write().await;
        let (id, entity) = self.with_stored_id(entity);

        trail.record(entry(&entity)?).await?;

        rows.insert(id, entity.clone());
        Ok(entity)
    }
}
