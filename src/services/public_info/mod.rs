//! Public-info service
//!
//! Publicly readable bank information: bank details, branches, ATMs and the
//! license and certificate documents. Batch reads are lenient.

mod bank;
mod branch;

pub use bank::{
    BankDetailsDto, BankDetailsEntity, BankDetailsMapper, CertificateDto, CertificateEntity,
    CertificateMapper, LicenseDto, LicenseEntity, LicenseMapper,
};
pub use branch::{AtmDto, AtmEntity, AtmMapper, BranchDto, BranchEntity, BranchMapper};

use axum::Router;

use super::Storage;
use crate::audit::{self, AuditEntity, AuditTrail};
use crate::crud::{crud_router, BatchPolicy, CrudService, Mapper, PgEntity, RouteLayout};

pub const TABLES: &[&str] = &[
    "bank_details",
    "branch",
    "atm",
    "license",
    "certificate",
    "audit",
];

pub fn router(storage: &Storage) -> Router {
    let audit_repository = storage.repository::<AuditEntity>();
    let trail = AuditTrail::new(audit_repository.clone());

    Router::new()
        .merge(family::<AtmMapper>(storage, &trail, "Atm", "/atm"))
        .merge(family::<BranchMapper>(storage, &trail, "Branch", "/branch"))
        .merge(family::<BankDetailsMapper>(storage, &trail, "BankDetails", "/bank/details"))
        .merge(family::<LicenseMapper>(storage, &trail, "License", "/license"))
        .merge(family::<CertificateMapper>(storage, &trail, "Certificate", "/certificate"))
        .merge(audit::router(audit_repository))
}

fn family<M>(storage: &Storage, trail: &AuditTrail, resource: &'static str, prefix: &str) -> Router
where
    M: Mapper,
    M::Entity: PgEntity,
{
    let service = CrudService::<M>::new(resource, storage.repository(), BatchPolicy::Lenient)
        .with_audit(trail.clone());
    crud_router(service, RouteLayout::conventional(prefix))
}

/// Binary columns travel as base64 strings
pub(crate) mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error> {
        match bytes {
            Some(bytes) => serializer.serialize_some(&STANDARD.encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|encoded| STANDARD.decode(encoded).map_err(serde::de::Error::custom))
            .transpose()
    }
}
