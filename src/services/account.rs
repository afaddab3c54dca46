//! Account service
//!
//! Account details: balance, account number and the ids tying an account to
//! its owner's passport, profile and bank.

use axum::Router;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Storage;
use crate::audit::{self, AuditEntity, AuditTrail};
use crate::crud::mapper::field_mapper;
use crate::crud::{crud_router, BatchPolicy, CrudService, IdQuery, PgEntity, RouteLayout};

#[derive(Debug, Clone, Default, PartialEq, sqlx::FromRow)]
pub struct AccountDetailsEntity {
    pub id: Option<i64>,
    pub passport_id: Option<i64>,
    pub account_number: Option<i64>,
    pub bank_details_id: Option<i64>,
    pub money: Option<Decimal>,
    pub negative_balance: Option<bool>,
    pub profile_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDetailsDto {
    pub id: Option<i64>,
    pub passport_id: Option<i64>,
    pub account_number: Option<i64>,
    pub bank_details_id: Option<i64>,
    pub money: Option<Decimal>,
    pub negative_balance: Option<bool>,
    pub profile_id: Option<i64>,
}

field_mapper!(
    AccountDetailsMapper,
    AccountDetailsEntity,
    AccountDetailsDto,
    [
        passport_id,
        account_number,
        bank_details_id,
        money,
        negative_balance,
        profile_id,
    ]
);

impl PgEntity for AccountDetailsEntity {
    const TABLE: &'static str = "account_details";
    const COLUMNS: &'static [&'static str] = &[
        "passport_id",
        "account_number",
        "bank_details_id",
        "money",
        "negative_balance",
        "profile_id",
    ];

    fn bind_columns<'q>(&'q self, query: IdQuery<'q>) -> IdQuery<'q> {
        query
            .bind(self.passport_id)
            .bind(self.account_number)
            .bind(self.bank_details_id)
            .bind(self.money)
            .bind(self.negative_balance)
            .bind(self.profile_id)
    }
}

pub const TABLES: &[&str] = &["account_details", "audit"];

pub fn router(storage: &Storage) -> Router {
    let audit_repository = storage.repository::<AuditEntity>();
    let trail = AuditTrail::new(audit_repository.clone());

    let details = CrudService::<AccountDetailsMapper>::new(
        "AccountDetails",
        storage.repository(),
        BatchPolicy::Strict,
    )
    .with_audit(trail);

    crud_router(details, RouteLayout::conventional("/details"))
        .merge(audit::router(audit_repository))
}
