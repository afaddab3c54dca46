//! Operation Context
//!
//! Contains metadata about the current operation for audit and tracing.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Actor recorded when the caller does not identify itself
pub const SYSTEM_ACTOR: &str = "system";

/// Context for an operation, used for auditing and tracing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationContext {
    /// Caller name from X-Request-User header
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,

    /// Correlation ID for request tracing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<Uuid>,
}

impl OperationContext {
    /// Create a new empty context
    pub fn new() -> Self {
        Self {
            actor: None,
            correlation_id: None,
        }
    }

    /// Create context with actor
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    /// Create context with correlation ID
    pub fn with_correlation_id(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }

    /// Actor name for audit records
    pub fn actor_or_system(&self) -> &str {
        self.actor.as_deref().unwrap_or(SYSTEM_ACTOR)
    }

    /// Generate a new correlation ID if not present
    pub fn ensure_correlation_id(&mut self) -> Uuid {
        *self.correlation_id.get_or_insert_with(Uuid::new_v4)
    }
}

impl Default for OperationContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_builder() {
        let correlation_id = Uuid::new_v4();

        let context = OperationContext::new()
            .with_actor("teller-01")
            .with_correlation_id(correlation_id);

        assert_eq!(context.actor.as_deref(), Some("teller-01"));
        assert_eq!(context.correlation_id, Some(correlation_id));
        assert_eq!(context.actor_or_system(), "teller-01");
    }

    #[test]
    fn test_anonymous_actor_is_system() {
        assert_eq!(OperationContext::new().actor_or_system(), SYSTEM_ACTOR);
    }

    #[test]
    fn test_ensure_correlation_id() {
        let mut context = OperationContext::new();
        assert!(context.correlation_id.is_none());

        let id = context.ensure_correlation_id();
        assert_eq!(context.correlation_id, Some(id));

        // Calling again should return the same ID
        assert_eq!(context.ensure_correlation_id(), id);
    }
}
