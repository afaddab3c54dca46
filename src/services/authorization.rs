//! Authorization service
//!
//! User credentials and roles, keyed to a profile.

use axum::http::StatusCode;
use axum::Router;
use serde::{Deserialize, Serialize};

use super::Storage;
use crate::audit::{self, AuditEntity, AuditTrail};
use crate::crud::mapper::field_mapper;
use crate::crud::{crud_router, BatchPolicy, CrudService, IdQuery, PgEntity, RouteLayout};

#[derive(Debug, Clone, Default, PartialEq, sqlx::FromRow)]
pub struct UserEntity {
    pub id: Option<i64>,
    pub role: Option<String>,
    pub profile_id: Option<i64>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: Option<i64>,
    pub role: Option<String>,
    pub profile_id: Option<i64>,
    pub password: Option<String>,
}

field_mapper!(UserMapper, UserEntity, UserDto, [role, profile_id, password]);

impl PgEntity for UserEntity {
    const TABLE: &'static str = "users";
    const COLUMNS: &'static [&'static str] = &["role", "profile_id", "password"];

    fn bind_columns<'q>(&'q self, query: IdQuery<'q>) -> IdQuery<'q> {
        query
            .bind(&self.role)
            .bind(self.profile_id)
            .bind(&self.password)
    }
}

pub const TABLES: &[&str] = &["users", "audit"];

fn user_layout() -> RouteLayout {
    RouteLayout::conventional("")
        .read("/read/:id")
        .update("/:id/update")
        .create_status(StatusCode::CREATED)
}

pub fn router(storage: &Storage) -> Router {
    let audit_repository = storage.repository::<AuditEntity>();

    let users = CrudService::<UserMapper>::new("User", storage.repository(), BatchPolicy::Strict)
        .with_audit(AuditTrail::new(audit_repository.clone()));

    crud_router(users, user_layout()).merge(audit::router(audit_repository))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crud::Mapper;

    #[test]
    fn test_user_layout() {
        let layout = user_layout();
        assert_eq!(layout.read, "/read/:id");
        assert_eq!(layout.read_all, "/read/all");
        assert_eq!(layout.create, "/create");
        assert_eq!(layout.update, "/:id/update");
        assert_eq!(layout.create_status, StatusCode::CREATED);
    }

    #[test]
    fn test_to_entity_drops_client_id() {
        let dto = UserDto {
            id: Some(12),
            role: Some("ADMIN".into()),
            profile_id: Some(3),
            password: Some("s3cret".into()),
        };
        let entity = UserMapper::to_entity(&dto);
        assert_eq!(entity.id, None);
        assert_eq!(entity.role.as_deref(), Some("ADMIN"));
        assert_eq!(entity.profile_id, Some(3));
    }

    #[test]
    fn test_empty_patch_changes_nothing() {
        let stored = UserEntity {
            id: Some(1),
            role: Some("USER".into()),
            profile_id: Some(5),
            password: Some("x".into()),
        };
        let merged = UserMapper::merge_to_entity(&UserDto::default(), stored.clone());
        assert_eq!(merged, stored);
    }
}
