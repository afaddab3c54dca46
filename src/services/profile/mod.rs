//! Profile service
//!
//! Customer identity: profile, passport, registration addresses and the
//! profile ↔ account link. Batch reads are lenient.

mod account_link;
mod address;
mod person;

pub use account_link::{AccountDetailsIdDto, AccountDetailsIdEntity, AccountDetailsIdMapper};
pub use address::{
    ActualRegistrationDto, ActualRegistrationEntity, ActualRegistrationMapper, RegistrationDto,
    RegistrationEntity, RegistrationMapper,
};
pub use person::{PassportDto, PassportEntity, PassportMapper, ProfileDto, ProfileEntity, ProfileMapper};

use axum::Router;

use super::Storage;
use crate::audit::{self, AuditEntity, AuditTrail};
use crate::crud::{crud_router, BatchPolicy, CrudService, Mapper, RouteLayout};

pub const TABLES: &[&str] = &[
    "profile",
    "passport",
    "registration",
    "actual_registration",
    "account_details_id",
    "audit",
];

/// `<prefix>/read/:id`, `<prefix>/read/all`, `<prefix>/create`, `<prefix>/update/:id`
fn profile_layout(prefix: &str) -> RouteLayout {
    RouteLayout::conventional(prefix).read(format!("{}/read/:id", prefix))
}

pub fn router(storage: &Storage) -> Router {
    let audit_repository = storage.repository::<AuditEntity>();
    let trail = AuditTrail::new(audit_repository.clone());

    Router::new()
        .merge(family::<ProfileMapper>(storage, &trail, "Profile", "/profile"))
        .merge(family::<PassportMapper>(storage, &trail, "Passport", "/passport"))
        .merge(family::<RegistrationMapper>(storage, &trail, "Registration", "/registration"))
        .merge(family::<ActualRegistrationMapper>(
            storage,
            &trail,
            "ActualRegistration",
            "/actual/registration",
        ))
        .merge(family::<AccountDetailsIdMapper>(
            storage,
            &trail,
            "AccountDetailsId",
            "/account/details",
        ))
        .merge(audit::router(audit_repository))
}

fn family<M>(storage: &Storage, trail: &AuditTrail, resource: &'static str, prefix: &str) -> Router
where
    M: Mapper,
    M::Entity: crate::crud::PgEntity,
{
    let service = CrudService::<M>::new(resource, storage.repository(), BatchPolicy::Lenient)
        .with_audit(trail.clone());
    crud_router(service, profile_layout(prefix))
}
