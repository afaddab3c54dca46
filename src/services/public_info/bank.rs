//! Bank details and the documents (license, certificate) issued to them

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};

use super::base64_bytes;
use crate::crud::mapper::{field_mapper, overlay};
use crate::crud::{IdQuery, Mapper, PgEntity, Record};

#[derive(Debug, Clone, Default, PartialEq, sqlx::FromRow)]
pub struct BankDetailsEntity {
    pub id: Option<i64>,
    pub bik: Option<i64>,
    pub inn: Option<i64>,
    pub kpp: Option<i64>,
    pub cor_account: Option<Decimal>,
    pub city: Option<String>,
    pub joint_stock_company: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankDetailsDto {
    pub id: Option<i64>,
    pub bik: Option<i64>,
    pub inn: Option<i64>,
    pub kpp: Option<i64>,
    pub cor_account: Option<Decimal>,
    pub city: Option<String>,
    pub joint_stock_company: Option<String>,
    pub name: Option<String>,
}

field_mapper!(
    BankDetailsMapper,
    BankDetailsEntity,
    BankDetailsDto,
    [bik, inn, kpp, cor_account, city, joint_stock_company, name]
);

impl PgEntity for BankDetailsEntity {
    const TABLE: &'static str = "bank_details";
    const COLUMNS: &'static [&'static str] = &[
        "bik",
        "inn",
        "kpp",
        "cor_account",
        "city",
        "joint_stock_company",
        "name",
    ];

    fn bind_columns<'q>(&'q self, query: IdQuery<'q>) -> IdQuery<'q> {
        query
            .bind(self.bik)
            .bind(self.inn)
            .bind(self.kpp)
            .bind(self.cor_account)
            .bind(&self.city)
            .bind(&self.joint_stock_company)
            .bind(&self.name)
    }
}

/// Columns of the joined `bank_details bd` row, for documents
const BANK_DETAILS_JOIN_COLUMNS: &str = "bd.bik AS bank_details_bik, \
     bd.inn AS bank_details_inn, \
     bd.kpp AS bank_details_kpp, \
     bd.cor_account AS bank_details_cor_account, \
     bd.city AS bank_details_city, \
     bd.joint_stock_company AS bank_details_joint_stock_company, \
     bd.name AS bank_details_name";

impl BankDetailsEntity {
    /// Embedded bank details of a joined document row; `None` without a reference
    fn from_joined_row(row: &PgRow) -> Result<Option<Self>, sqlx::Error> {
        let id: Option<i64> = row.try_get("bank_details_id")?;
        let Some(id) = id else {
            return Ok(None);
        };

        Ok(Some(Self {
            id: Some(id),
            bik: row.try_get("bank_details_bik")?,
            inn: row.try_get("bank_details_inn")?,
            kpp: row.try_get("bank_details_kpp")?,
            cor_account: row.try_get("bank_details_cor_account")?,
            city: row.try_get("bank_details_city")?,
            joint_stock_company: row.try_get("bank_details_joint_stock_company")?,
            name: row.try_get("bank_details_name")?,
        }))
    }
}

/// Reference to stored bank details; unlike `to_entity` the id is kept
fn bank_details_reference(dto: &BankDetailsDto) -> BankDetailsEntity {
    BankDetailsEntity {
        id: dto.id,
        ..BankDetailsMapper::to_entity(dto)
    }
}

fn document_select(table: &str, photo_column: &str) -> String {
    format!(
        "SELECT t.id, t.{photo}, t.bank_details_id, {joined} \
         FROM {table} t LEFT JOIN bank_details bd ON bd.id = t.bank_details_id",
        photo = photo_column,
        joined = BANK_DETAILS_JOIN_COLUMNS,
        table = table,
    )
}

macro_rules! bank_document {
    ($entity:ident, $dto:ident, $mapper:ident, $table:literal, $photo:ident) => {
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct $entity {
            pub id: Option<i64>,
            pub $photo: Option<Vec<u8>>,
            pub bank_details: Option<BankDetailsEntity>,
        }

        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $dto {
            pub id: Option<i64>,
            #[serde(default, with = "base64_bytes")]
            pub $photo: Option<Vec<u8>>,
            pub bank_details: Option<BankDetailsDto>,
        }

        impl Record for $entity {
            fn id(&self) -> Option<i64> {
                self.id
            }

            fn with_id(mut self, id: i64) -> Self {
                self.id = Some(id);
                self
            }
        }

        pub struct $mapper;

        impl Mapper for $mapper {
            type Entity = $entity;
            type Dto = $dto;

            fn to_dto(entity: &$entity) -> $dto {
                $dto {
                    id: entity.id,
                    $photo: entity.$photo.clone(),
                    bank_details: BankDetailsMapper::map_to_dto(entity.bank_details.as_ref()),
                }
            }

            fn to_entity(dto: &$dto) -> $entity {
                $entity {
                    id: None,
                    $photo: dto.$photo.clone(),
                    bank_details: dto.bank_details.as_ref().map(bank_details_reference),
                }
            }

            fn merge_to_entity(dto: &$dto, entity: $entity) -> $entity {
                $entity {
                    id: entity.id,
                    $photo: overlay(entity.$photo, &dto.$photo),
                    bank_details: match &dto.bank_details {
                        Some(reference) => Some(bank_details_reference(reference)),
                        None => entity.bank_details,
                    },
                }
            }
        }

        impl<'r> FromRow<'r, PgRow> for $entity {
            fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
                Ok(Self {
                    id: row.try_get("id")?,
                    $photo: row.try_get(stringify!($photo))?,
                    bank_details: BankDetailsEntity::from_joined_row(row)?,
                })
            }
        }

        impl PgEntity for $entity {
            const TABLE: &'static str = $table;
            const COLUMNS: &'static [&'static str] = &[stringify!($photo), "bank_details_id"];

            fn select_sql() -> String {
                document_select(Self::TABLE, stringify!($photo))
            }

            fn bind_columns<'q>(&'q self, query: IdQuery<'q>) -> IdQuery<'q> {
                query
                    .bind(&self.$photo)
                    .bind(self.bank_details.as_ref().and_then(|b| b.id))
            }
        }
    };
}

bank_document!(LicenseEntity, LicenseDto, LicenseMapper, "license", photo_license);

bank_document!(
    CertificateEntity,
    CertificateDto,
    CertificateMapper,
    "certificate",
    photo_certificate
);
