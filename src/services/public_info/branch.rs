//! Branches and the ATMs attached to them

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};

use crate::crud::mapper::{field_mapper, overlay};
use crate::crud::{IdQuery, Mapper, PgEntity, Record};

#[derive(Debug, Clone, Default, PartialEq, sqlx::FromRow)]
pub struct BranchEntity {
    pub id: Option<i64>,
    pub address: Option<String>,
    pub phone_number: Option<i64>,
    pub city: Option<String>,
    pub start_of_work: Option<NaiveTime>,
    pub end_of_work: Option<NaiveTime>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchDto {
    pub id: Option<i64>,
    pub address: Option<String>,
    pub phone_number: Option<i64>,
    pub city: Option<String>,
    pub start_of_work: Option<NaiveTime>,
    pub end_of_work: Option<NaiveTime>,
}

field_mapper!(
    BranchMapper,
    BranchEntity,
    BranchDto,
    [address, phone_number, city, start_of_work, end_of_work]
);

impl PgEntity for BranchEntity {
    const TABLE: &'static str = "branch";
    const COLUMNS: &'static [&'static str] =
        &["address", "phone_number", "city", "start_of_work", "end_of_work"];

    fn bind_columns<'q>(&'q self, query: IdQuery<'q>) -> IdQuery<'q> {
        query
            .bind(&self.address)
            .bind(self.phone_number)
            .bind(&self.city)
            .bind(self.start_of_work)
            .bind(self.end_of_work)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AtmEntity {
    pub id: Option<i64>,
    pub address: Option<String>,
    pub start_of_work: Option<NaiveTime>,
    pub end_of_work: Option<NaiveTime>,
    pub all_hours: Option<bool>,
    pub branch: Option<BranchEntity>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtmDto {
    pub id: Option<i64>,
    pub address: Option<String>,
    pub start_of_work: Option<NaiveTime>,
    pub end_of_work: Option<NaiveTime>,
    pub all_hours: Option<bool>,
    pub branch: Option<BranchDto>,
}

impl Record for AtmEntity {
    fn id(&self) -> Option<i64> {
        self.id
    }

    fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }
}

/// Reference to a stored branch; unlike `to_entity` the id is kept
fn branch_reference(dto: &BranchDto) -> BranchEntity {
    BranchEntity {
        id: dto.id,
        ..BranchMapper::to_entity(dto)
    }
}

pub struct AtmMapper;

impl Mapper for AtmMapper {
    type Entity = AtmEntity;
    type Dto = AtmDto;

    fn to_dto(entity: &AtmEntity) -> AtmDto {
        AtmDto {
            id: entity.id,
            address: entity.address.clone(),
            start_of_work: entity.start_of_work,
            end_of_work: entity.end_of_work,
            all_hours: entity.all_hours,
            branch: BranchMapper::map_to_dto(entity.branch.as_ref()),
        }
    }

    fn to_entity(dto: &AtmDto) -> AtmEntity {
        AtmEntity {
            id: None,
            address: dto.address.clone(),
            start_of_work: dto.start_of_work,
            end_of_work: dto.end_of_work,
            all_hours: dto.all_hours,
            branch: dto.branch.as_ref().map(branch_reference),
        }
    }

    fn merge_to_entity(dto: &AtmDto, entity: AtmEntity) -> AtmEntity {
        AtmEntity {
            id: entity.id,
            address: overlay(entity.address, &dto.address),
            start_of_work: overlay(entity.start_of_work, &dto.start_of_work),
            end_of_work: overlay(entity.end_of_work, &dto.end_of_work),
            all_hours: overlay(entity.all_hours, &dto.all_hours),
            branch: match &dto.branch {
                Some(reference) => Some(branch_reference(reference)),
                None => entity.branch,
            },
        }
    }
}

impl<'r> FromRow<'r, PgRow> for AtmEntity {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let branch_id: Option<i64> = row.try_get("branch_id")?;
        let branch = match branch_id {
            Some(id) => Some(BranchEntity {
                id: Some(id),
                address: row.try_get("branch_address")?,
                phone_number: row.try_get("branch_phone_number")?,
                city: row.try_get("branch_city")?,
                start_of_work: row.try_get("branch_start_of_work")?,
                end_of_work: row.try_get("branch_end_of_work")?,
            }),
            None => None,
        };

        Ok(Self {
            id: row.try_get("id")?,
            address: row.try_get("address")?,
            start_of_work: row.try_get("start_of_work")?,
            end_of_work: row.try_get("end_of_work")?,
            all_hours: row.try_get("all_hours")?,
            branch,
        })
    }
}

impl PgEntity for AtmEntity {
    const TABLE: &'static str = "atm";
    const COLUMNS: &'static [&'static str] =
        &["address", "start_of_work", "end_of_work", "all_hours", "branch_id"];

    fn select_sql() -> String {
        r#"
        SELECT t.id, t.address, t.start_of_work, t.end_of_work, t.all_hours, t.branch_id,
               b.address AS branch_address,
               b.phone_number AS branch_phone_number,
               b.city AS branch_city,
               b.start_of_work AS branch_start_of_work,
               b.end_of_work AS branch_end_of_work
        FROM atm t
        LEFT JOIN branch b ON b.id = t.branch_id
        "#
        .to_string()
    }

    fn bind_columns<'q>(&'q self, query: IdQuery<'q>) -> IdQuery<'q> {
        query
            .bind(&self.address)
            .bind(self.start_of_work)
            .bind(self.end_of_work)
            .bind(self.all_hours)
            .bind(self.branch.as_ref().and_then(|b| b.id))
    }
}
