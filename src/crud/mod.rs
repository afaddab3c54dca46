//! CRUD core
//!
//! The layering shared by every service: routes → service → mapper →
//! repository → entity.

pub mod mapper;
mod postgres;
mod repository;
pub mod routes;
mod service;

pub use mapper::{Mapper, Record};
pub use postgres::{IdQuery, PgEntity, PgRepository};
pub use repository::{InMemoryRepository, Repository};
pub use routes::{crud_router, read_only_router, RouteLayout};
pub use service::{BatchPolicy, CrudService};
