//! Profile and passport records

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::crud::mapper::field_mapper;
use crate::crud::{IdQuery, PgEntity};

#[derive(Debug, Clone, Default, PartialEq, sqlx::FromRow)]
pub struct ProfileEntity {
    pub id: Option<i64>,
    pub phone_number: Option<i64>,
    pub email: Option<String>,
    pub name_on_card: Option<String>,
    pub inn: Option<i64>,
    pub snils: Option<i64>,
    pub passport_id: Option<i64>,
    pub actual_registration_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDto {
    pub id: Option<i64>,
    pub phone_number: Option<i64>,
    pub email: Option<String>,
    pub name_on_card: Option<String>,
    pub inn: Option<i64>,
    pub snils: Option<i64>,
    pub passport_id: Option<i64>,
    pub actual_registration_id: Option<i64>,
}

field_mapper!(
    ProfileMapper,
    ProfileEntity,
    ProfileDto,
    [
        phone_number,
        email,
        name_on_card,
        inn,
        snils,
        passport_id,
        actual_registration_id,
    ]
);

impl PgEntity for ProfileEntity {
    const TABLE: &'static str = "profile";
    const COLUMNS: &'static [&'static str] = &[
        "phone_number",
        "email",
        "name_on_card",
        "inn",
        "snils",
        "passport_id",
        "actual_registration_id",
    ];

    fn bind_columns<'q>(&'q self, query: IdQuery<'q>) -> IdQuery<'q> {
        query
            .bind(self.phone_number)
            .bind(&self.email)
            .bind(&self.name_on_card)
            .bind(self.inn)
            .bind(self.snils)
            .bind(self.passport_id)
            .bind(self.actual_registration_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, sqlx::FromRow)]
pub struct PassportEntity {
    pub id: Option<i64>,
    pub series: Option<i32>,
    pub number: Option<i64>,
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub gender: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub birth_place: Option<String>,
    pub issued_by: Option<String>,
    pub date_of_issue: Option<NaiveDate>,
    pub division_code: Option<i32>,
    pub expiration_date: Option<NaiveDate>,
    pub registration_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassportDto {
    pub id: Option<i64>,
    pub series: Option<i32>,
    pub number: Option<i64>,
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub gender: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub birth_place: Option<String>,
    pub issued_by: Option<String>,
    pub date_of_issue: Option<NaiveDate>,
    pub division_code: Option<i32>,
    pub expiration_date: Option<NaiveDate>,
    pub registration_id: Option<i64>,
}

field_mapper!(
    PassportMapper,
    PassportEntity,
    PassportDto,
    [
        series,
        number,
        last_name,
        first_name,
        middle_name,
        gender,
        birth_date,
        birth_place,
        issued_by,
        date_of_issue,
        division_code,
        expiration_date,
        registration_id,
    ]
);

impl PgEntity for PassportEntity {
    const TABLE: &'static str = "passport";
    const COLUMNS: &'static [&'static str] = &[
        "series",
        "number",
        "last_name",
        "first_name",
        "middle_name",
        "gender",
        "birth_date",
        "birth_place",
        "issued_by",
        "date_of_issue",
        "division_code",
        "expiration_date",
        "registration_id",
    ];

    fn bind_columns<'q>(&'q self, query: IdQuery<'q>) -> IdQuery<'q> {
        query
            .bind(self.series)
            .bind(self.number)
            .bind(&self.last_name)
            .bind(&self.first_name)
            .bind(&self.middle_name)
            .bind(&self.gender)
            .bind(self.birth_date)
            .bind(&self.birth_place)
            .bind(&self.issued_by)
            .bind(self.date_of_issue)
            .bind(self.division_code)
            .bind(self.expiration_date)
            .bind(self.registration_id)
    }
}
