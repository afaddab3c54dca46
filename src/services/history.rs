//! History service
//!
//! A history row is a bag of pointers to audit rows owned by the other
//! services. The ids are stored as given; nothing checks that they resolve.

use axum::Router;
use serde::{Deserialize, Serialize};

use super::Storage;
use crate::crud::mapper::field_mapper;
use crate::crud::{crud_router, BatchPolicy, CrudService, IdQuery, PgEntity, RouteLayout};

#[derive(Debug, Clone, Default, PartialEq, sqlx::FromRow)]
pub struct HistoryEntity {
    pub id: Option<i64>,
    pub transfer_audit_id: Option<i64>,
    pub profile_audit_id: Option<i64>,
    pub account_audit_id: Option<i64>,
    pub anti_fraud_audit_id: Option<i64>,
    pub public_bank_info_audit_id: Option<i64>,
    pub authorization_audit_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryDto {
    pub id: Option<i64>,
    pub transfer_audit_id: Option<i64>,
    pub profile_audit_id: Option<i64>,
    pub account_audit_id: Option<i64>,
    pub anti_fraud_audit_id: Option<i64>,
    pub public_bank_info_audit_id: Option<i64>,
    pub authorization_audit_id: Option<i64>,
}

field_mapper!(
    HistoryMapper,
    HistoryEntity,
    HistoryDto,
    [
        transfer_audit_id,
        profile_audit_id,
        account_audit_id,
        anti_fraud_audit_id,
        public_bank_info_audit_id,
        authorization_audit_id,
    ]
);

impl PgEntity for HistoryEntity {
    const TABLE: &'static str = "history";
    const COLUMNS: &'static [&'static str] = &[
        "transfer_audit_id",
        "profile_audit_id",
        "account_audit_id",
        "anti_fraud_audit_id",
        "public_bank_info_audit_id",
        "authorization_audit_id",
    ];

    fn bind_columns<'q>(&'q self, query: IdQuery<'q>) -> IdQuery<'q> {
        query
            .bind(self.transfer_audit_id)
            .bind(self.profile_audit_id)
            .bind(self.account_audit_id)
            .bind(self.anti_fraud_audit_id)
            .bind(self.public_bank_info_audit_id)
            .bind(self.authorization_audit_id)
    }
}

pub const TABLES: &[&str] = &["history"];

fn history_layout() -> RouteLayout {
    RouteLayout::conventional("/api/history")
        .read_all("/api/history", "id")
        .create("/api/history")
        .update("/api/history/:id")
}

pub fn router(storage: &Storage) -> Router {
    let history = CrudService::<HistoryMapper>::new("History", storage.repository(), BatchPolicy::Strict);

    crud_router(history, history_layout())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crud::Mapper;

    #[test]
    fn test_history_layout_shares_paths_between_verbs() {
        let layout = history_layout();
        assert_eq!(layout.read, "/api/history/:id");
        assert_eq!(layout.update, layout.read);
        assert_eq!(layout.read_all, "/api/history");
        assert_eq!(layout.create, layout.read_all);
        assert_eq!(layout.ids_param, "id");
    }

    #[test]
    fn test_partial_pointers_round_trip() {
        let dto = HistoryDto {
            id: Some(8),
            account_audit_id: Some(31),
            ..Default::default()
        };
        let entity = HistoryMapper::to_entity(&dto);
        assert_eq!(entity.id, None);
        assert_eq!(entity.account_audit_id, Some(31));
        assert_eq!(entity.transfer_audit_id, None);

        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["accountAuditId"], 31);
        assert!(json["antiFraudAuditId"].is_null());
        assert!(json["publicBankInfoAuditId"].is_null());
    }
}
