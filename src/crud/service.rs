//! Generic CRUD service
//!
//! Couples a repository with a mapper and owns the not-found semantics
//! shared by every entity family.

use std::sync::Arc;

use super::repository::{distinct_ids, Repository};
use super::{Mapper, Record};
use crate::audit::{AuditAction, AuditLogBuilder, AuditTrail};
use crate::context::OperationContext;
use crate::error::{AppError, AppResult};

/// How a batch read treats ids with no stored record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchPolicy {
    /// Any missing id fails the whole call
    Strict,
    /// Missing ids are dropped from the result
    Lenient,
}

pub struct CrudService<M: Mapper> {
    resource: &'static str,
    repository: Arc<dyn Repository<M::Entity>>,
    policy: BatchPolicy,
    audit: Option<AuditTrail>,
}

impl<M: Mapper> CrudService<M> {
    pub fn new(
        resource: &'static str,
        repository: Arc<dyn Repository<M::Entity>>,
        policy: BatchPolicy,
    ) -> Self {
        Self {
            resource,
            repository,
            policy,
            audit: None,
        }
    }

    /// Record an audit row on every create and update
    pub fn with_audit(mut self, audit: AuditTrail) -> Self {
        self.audit = Some(audit);
        self
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<M::Dto> {
        let entity = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(self.resource, id))?;

        Ok(M::to_dto(&entity))
    }

    pub async fn find_all_by_id(&self, ids: &[i64]) -> AppResult<Vec<M::Dto>> {
        let entities = self.repository.find_all_by_id(ids).await?;

        if self.policy == BatchPolicy::Strict {
            let missing: Vec<i64> = distinct_ids(ids)
                .into_iter()
                .filter(|id| !entities.iter().any(|e| e.id() == Some(*id)))
                .collect();

            if !missing.is_empty() {
                for id in &missing {
                    tracing::warn!(resource = self.resource, id, "Batch read hit unknown id");
                }
                return Err(AppError::NotFound {
                    resource: self.resource,
                    ids: missing,
                });
            }
        }

        Ok(M::to_dto_list(Some(entities.as_slice())).unwrap_or_default())
    }

    /// Create a record; any id in the payload is ignored
    pub async fn save(&self, dto: M::Dto, context: &OperationContext) -> AppResult<M::Dto> {
        let entity = M::to_entity(&dto);

        let saved = match &self.audit {
            Some(trail) => {
                let entry = AuditLogBuilder::new(AuditAction::Create)
                    .entity_type(self.resource)
                    .deferred(context, |builder, stored: &M::Entity| {
                        builder.entity_state(&M::to_dto(stored))
                    });
                self.repository.save_audited(entity, trail, entry).await?
            }
            None => self.repository.save(entity).await?,
        };

        tracing::debug!(
            resource = self.resource,
            id = ?saved.id(),
            correlation_id = ?context.correlation_id,
            "Record created"
        );

        Ok(M::to_dto(&saved))
    }

    /// Overlay the payload onto the stored record with `id`.
    ///
    /// Read and write are separate repository calls; concurrent updates of
    /// the same id may overwrite each other.
    pub async fn update(
        &self,
        id: i64,
        dto: M::Dto,
        context: &OperationContext,
    ) -> AppResult<M::Dto> {
        let existing = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(self.resource, id))?;

        let before = M::to_dto(&existing);
        let merged = M::merge_to_entity(&dto, existing);

        let saved = match &self.audit {
            Some(trail) => {
                let entry = AuditLogBuilder::new(AuditAction::Update)
                    .entity_type(self.resource)
                    .entity_state(&before)?
                    .deferred(context, |builder, stored: &M::Entity| {
                        builder.new_entity_state(&M::to_dto(stored))
                    });
                self.repository.save_audited(merged, trail, entry).await?
            }
            None => self.repository.save(merged).await?,
        };

        tracing::debug!(
            resource = self.resource,
            id,
            correlation_id = ?context.correlation_id,
            "Record updated"
        );

        Ok(M::to_dto(&saved))
    }
}
