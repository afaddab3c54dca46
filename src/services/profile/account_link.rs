//! Link between a profile and an account held by the account service

use serde::{Deserialize, Serialize};

use crate::crud::mapper::field_mapper;
use crate::crud::{IdQuery, PgEntity};

#[derive(Debug, Clone, Default, PartialEq, sqlx::FromRow)]
pub struct AccountDetailsIdEntity {
    pub id: Option<i64>,
    pub account_id: Option<i64>,
    pub profile_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDetailsIdDto {
    pub id: Option<i64>,
    pub account_id: Option<i64>,
    pub profile_id: Option<i64>,
}

field_mapper!(
    AccountDetailsIdMapper,
    AccountDetailsIdEntity,
    AccountDetailsIdDto,
    [account_id, profile_id]
);

impl PgEntity for AccountDetailsIdEntity {
    const TABLE: &'static str = "account_details_id";
    const COLUMNS: &'static [&'static str] = &["account_id", "profile_id"];

    fn bind_columns<'q>(&'q self, query: IdQuery<'q>) -> IdQuery<'q> {
        query.bind(self.account_id).bind(self.profile_id)
    }
}
