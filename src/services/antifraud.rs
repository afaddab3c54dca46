//! Antifraud service
//!
//! Suspicious-transfer flags for account, card and phone transfers. The
//! three families share one shape and differ only in the transfer they
//! point at.

use axum::Router;
use serde::{Deserialize, Serialize};

use super::Storage;
use crate::audit::{self, AuditEntity, AuditTrail};
use crate::crud::mapper::field_mapper;
use crate::crud::{crud_router, BatchPolicy, CrudService, IdQuery, PgEntity, RouteLayout};

macro_rules! suspicious_transfer {
    ($entity:ident, $dto:ident, $mapper:ident, $table:literal, $transfer_id:ident) => {
        #[derive(Debug, Clone, Default, PartialEq, sqlx::FromRow)]
        pub struct $entity {
            pub id: Option<i64>,
            pub $transfer_id: Option<i64>,
            pub is_blocked: Option<bool>,
            pub is_suspicious: Option<bool>,
            pub blocked_reason: Option<String>,
            pub suspicious_reason: Option<String>,
        }

        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $dto {
            pub id: Option<i64>,
            pub $transfer_id: Option<i64>,
            pub is_blocked: Option<bool>,
            pub is_suspicious: Option<bool>,
            pub blocked_reason: Option<String>,
            pub suspicious_reason: Option<String>,
        }

        field_mapper!(
            $mapper,
            $entity,
            $dto,
            [$transfer_id, is_blocked, is_suspicious, blocked_reason, suspicious_reason]
        );

        impl PgEntity for $entity {
            const TABLE: &'static str = $table;
            const COLUMNS: &'static [&'static str] = &[
                stringify!($transfer_id),
                "is_blocked",
                "is_suspicious",
                "blocked_reason",
                "suspicious_reason",
            ];

            fn bind_columns<'q>(&'q self, query: IdQuery<'q>) -> IdQuery<'q> {
                query
                    .bind(self.$transfer_id)
                    .bind(self.is_blocked)
                    .bind(self.is_suspicious)
                    .bind(&self.blocked_reason)
                    .bind(&self.suspicious_reason)
            }
        }
    };
}

suspicious_transfer!(
    SuspiciousAccountTransferEntity,
    SuspiciousAccountTransferDto,
    SuspiciousAccountTransferMapper,
    "suspicious_account_transfers",
    account_transfer_id
);

suspicious_transfer!(
    SuspiciousCardTransferEntity,
    SuspiciousCardTransferDto,
    SuspiciousCardTransferMapper,
    "suspicious_card_transfers",
    card_transfer_id
);

suspicious_transfer!(
    SuspiciousPhoneTransferEntity,
    SuspiciousPhoneTransferDto,
    SuspiciousPhoneTransferMapper,
    "suspicious_phone_transfers",
    phone_transfer_id
);

pub const TABLES: &[&str] = &[
    "suspicious_account_transfers",
    "suspicious_card_transfers",
    "suspicious_phone_transfers",
    "audit",
];

/// `/suspicious/<kind>/transfer/:id`, batch reads on the base path
fn transfer_layout(kind: &str) -> RouteLayout {
    let base = format!("/suspicious/{}/transfer", kind);
    RouteLayout::conventional(&base)
        .read_all(base.clone(), "ids")
        .update(format!("{}/:id", base))
}

pub fn router(storage: &Storage) -> Router {
    let audit_repository = storage.repository::<AuditEntity>();
    let trail = AuditTrail::new(audit_repository.clone());

    let accounts = CrudService::<SuspiciousAccountTransferMapper>::new(
        "SuspiciousAccountTransfer",
        storage.repository(),
        BatchPolicy::Strict,
    )
    .with_audit(trail.clone());

    let cards = CrudService::<SuspiciousCardTransferMapper>::new(
        "SuspiciousCardTransfer",
        storage.repository(),
        BatchPolicy::Strict,
    )
    .with_audit(trail.clone());

    let phones = CrudService::<SuspiciousPhoneTransferMapper>::new(
        "SuspiciousPhoneTransfer",
        storage.repository(),
        BatchPolicy::Strict,
    )
    .with_audit(trail);

    Router::new()
        .merge(crud_router(accounts, transfer_layout("account")))
        .merge(crud_router(cards, transfer_layout("card")))
        .merge(crud_router(phones, transfer_layout("phone")))
        .merge(audit::router(audit_repository))
}
