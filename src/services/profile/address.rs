//! Registration (passport address) and actual registration (where the
//! customer lives). Both carry the same address fields.

use serde::{Deserialize, Serialize};

use crate::crud::mapper::field_mapper;
use crate::crud::{IdQuery, PgEntity};

macro_rules! address_family {
    ($entity:ident, $dto:ident, $mapper:ident, $table:literal) => {
        #[derive(Debug, Clone, Default, PartialEq, sqlx::FromRow)]
        pub struct $entity {
            pub id: Option<i64>,
            pub country: Option<String>,
            pub region: Option<String>,
            pub city: Option<String>,
            pub district: Option<String>,
            pub locality: Option<String>,
            pub street: Option<String>,
            pub house_number: Option<String>,
            pub house_block: Option<String>,
            pub flat_number: Option<String>,
            pub index: Option<i64>,
        }

        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $dto {
            pub id: Option<i64>,
            pub country: Option<String>,
            pub region: Option<String>,
            pub city: Option<String>,
            pub district: Option<String>,
            pub locality: Option<String>,
            pub street: Option<String>,
            pub house_number: Option<String>,
            pub house_block: Option<String>,
            pub flat_number: Option<String>,
            pub index: Option<i64>,
        }

        field_mapper!(
            $mapper,
            $entity,
            $dto,
            [
                country,
                region,
                city,
                district,
                locality,
                street,
                house_number,
                house_block,
                flat_number,
                index,
            ]
        );

        impl PgEntity for $entity {
            const TABLE: &'static str = $table;
            // "index" is a keyword
            const COLUMNS: &'static [&'static str] = &[
                "country",
                "region",
                "city",
                "district",
                "locality",
                "street",
                "house_number",
                "house_block",
                "flat_number",
                "\"index\"",
            ];

            fn bind_columns<'q>(&'q self, query: IdQuery<'q>) -> IdQuery<'q> {
                query
                    .bind(&self.country)
                    .bind(&self.region)
                    .bind(&self.city)
                    .bind(&self.district)
                    .bind(&self.locality)
                    .bind(&self.street)
                    .bind(&self.house_number)
                    .bind(&self.house_block)
                    .bind(&self.flat_number)
                    .bind(self.index)
            }
        }
    };
}

address_family!(
    RegistrationEntity,
    RegistrationDto,
    RegistrationMapper,
    "registration"
);

address_family!(
    ActualRegistrationEntity,
    ActualRegistrationDto,
    ActualRegistrationMapper,
    "actual_registration"
);
