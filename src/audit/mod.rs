//! Audit trail
//!
//! Every create and update on an audited family leaves an `audit` row with
//! the JSON state of the record before and after the change.

use std::sync::Arc;

use axum::Router;
use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::context::OperationContext;
use crate::crud::mapper::field_mapper;
use crate::crud::{read_only_router, BatchPolicy, CrudService, IdQuery, PgEntity, Repository};

/// Resource label used in not-found errors for audit reads
pub const AUDIT_RESOURCE: &str = "Audit";

/// Stored audit row
#[derive(Debug, Clone, Default, PartialEq, sqlx::FromRow)]
pub struct AuditEntity {
    pub id: Option<i64>,
    pub entity_type: Option<String>,
    pub operation_type: Option<String>,
    pub created_by: Option<String>,
    pub modified_by: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub modified_at: Option<NaiveDateTime>,
    pub new_entity_json: Option<String>,
    pub entity_json: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditDto {
    pub id: Option<i64>,
    pub entity_type: Option<String>,
    pub operation_type: Option<String>,
    pub created_by: Option<String>,
    pub modified_by: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub modified_at: Option<NaiveDateTime>,
    pub new_entity_json: Option<String>,
    pub entity_json: Option<String>,
}

field_mapper!(
    AuditMapper,
    AuditEntity,
    AuditDto,
    [
        entity_type,
        operation_type,
        created_by,
        modified_by,
        created_at,
        modified_at,
        new_entity_json,
        entity_json,
    ]
);

impl PgEntity for AuditEntity {
    const TABLE: &'static str = "audit";
    const COLUMNS: &'static [&'static str] = &[
        "entity_type",
        "operation_type",
        "created_by",
        "modified_by",
        "created_at",
        "modified_at",
        "new_entity_json",
        "entity_json",
    ];

    fn bind_columns<'q>(&'q self, query: IdQuery<'q>) -> IdQuery<'q> {
        query
            .bind(&self.entity_type)
            .bind(&self.operation_type)
            .bind(&self.created_by)
            .bind(&self.modified_by)
            .bind(self.created_at)
            .bind(self.modified_at)
            .bind(&self.new_entity_json)
            .bind(&self.entity_json)
    }
}

/// Audit action types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    Create,
    Update,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Create => "create",
            AuditAction::Update => "update",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Builder for creating audit log entries
#[derive(Debug, Clone)]
pub struct AuditLogBuilder {
    action: AuditAction,
    entity_type: Option<String>,
    entity_json: Option<String>,
    new_entity_json: Option<String>,
}

impl AuditLogBuilder {
    /// Create a new audit log builder
    pub fn new(action: AuditAction) -> Self {
        Self {
            action,
            entity_type: None,
            entity_json: None,
            new_entity_json: None,
        }
    }

    /// Set the audited entity type
    pub fn entity_type(mut self, entity_type: &str) -> Self {
        self.entity_type = Some(entity_type.to_string());
        self
    }

    /// Set the state recorded by the entry (created record, or record before update)
    pub fn entity_state<T: Serialize>(mut self, state: &T) -> Result<Self, serde_json::Error> {
        self.entity_json = Some(serde_json::to_string(state)?);
        Ok(self)
    }

    /// Set the state after an update
    pub fn new_entity_state<T: Serialize>(mut self, state: &T) -> Result<Self, serde_json::Error> {
        self.new_entity_json = Some(serde_json::to_string(state)?);
        Ok(self)
    }

    /// Stored row for this entry, stamped with the actor and time
    pub fn build(self, context: &OperationContext, at: NaiveDateTime) -> AuditEntity {
        let actor = context.actor_or_system().to_string();
        let modified = self.action == AuditAction::Update;

        AuditEntity {
            id: None,
            entity_type: self.entity_type,
            operation_type: Some(self.action.as_str().to_string()),
            modified_by: modified.then(|| actor.clone()),
            created_by: Some(actor),
            created_at: Some(at),
            modified_at: modified.then_some(at),
            new_entity_json: self.new_entity_json,
            entity_json: self.entity_json,
        }
    }
}

/// Audit row built from the record as it was stored
pub type AuditEntry<E> = Box<dyn FnOnce(&E) -> Result<AuditEntity, serde_json::Error> + Send>;

impl AuditLogBuilder {
    /// Finish the entry once the audited record is stored. `state` adds
    /// whatever the entry records about the stored form.
    pub fn deferred<E, F>(self, context: &OperationContext, state: F) -> AuditEntry<E>
    where
        E: 'static,
        F: FnOnce(Self, &E) -> Result<Self, serde_json::Error> + Send + 'static,
    {
        let context = context.clone();
        Box::new(move |stored| Ok(state(self, stored)?.build(&context, Utc::now().naive_utc())))
    }
}

/// Writer of audit rows
#[derive(Clone)]
pub struct AuditTrail {
    repository: Arc<dyn Repository<AuditEntity>>,
}

impl AuditTrail {
    pub fn new(repository: Arc<dyn Repository<AuditEntity>>) -> Self {
        Self { repository }
    }

    /// Store a finished audit row
    pub async fn record(&self, row: AuditEntity) -> Result<i64, AuditLogError> {
        let saved = self.repository.save(row).await?;
        let id = saved.id.ok_or(AuditLogError::MissingId)?;

        tracing::debug!(
            audit_id = id,
            operation = ?saved.operation_type,
            "Audit log entry created"
        );

        Ok(id)
    }
}

/// `GET /audit/:id` over the given audit table
pub fn router(repository: Arc<dyn Repository<AuditEntity>>) -> Router {
    let service = CrudService::<AuditMapper>::new(AUDIT_RESOURCE, repository, BatchPolicy::Strict);
    read_only_router(service, "/audit/:id")
}

/// Audit log errors
#[derive(Debug, thiserror::Error)]
pub enum AuditLogError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Audit row stored without id")]
    MissingId,
}

impl From<AuditLogError> for crate::error::AppError {
    fn from(err: AuditLogError) -> Self {
        match err {
            AuditLogError::Database(e) => crate::error::AppError::Database(e),
            AuditLogError::Serialization(e) => crate::error::AppError::Serialization(e),
            missing @ AuditLogError::MissingId => {
                crate::error::AppError::Internal(missing.to_string())
            }
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
