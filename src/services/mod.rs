//! Service catalog
//!
//! The six deployable services and the storage they are wired against.

pub mod account;
pub mod antifraud;
pub mod authorization;
pub mod history;
pub mod profile;
pub mod public_info;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use axum::Router;
use sqlx::PgPool;

use crate::crud::{InMemoryRepository, PgEntity, PgRepository, Repository};

/// Repository backend chosen at wiring time
#[derive(Debug, Clone)]
pub enum Storage {
    Postgres(PgPool),
    InMemory,
}

impl Storage {
    /// Fresh repository for one entity family. In-memory repositories are
    /// not shared between calls.
    pub fn repository<E: PgEntity>(&self) -> Arc<dyn Repository<E>> {
        match self {
            Storage::Postgres(pool) => Arc::new(PgRepository::<E>::new(pool.clone())),
            Storage::InMemory => Arc::new(InMemoryRepository::<E>::new()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceKind {
    Account,
    Antifraud,
    Authorization,
    History,
    Profile,
    PublicInfo,
}

impl ServiceKind {
    pub const ALL: [ServiceKind; 6] = [
        ServiceKind::Account,
        ServiceKind::Antifraud,
        ServiceKind::Authorization,
        ServiceKind::History,
        ServiceKind::Profile,
        ServiceKind::PublicInfo,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ServiceKind::Account => "account",
            ServiceKind::Antifraud => "antifraud",
            ServiceKind::Authorization => "authorization",
            ServiceKind::History => "history",
            ServiceKind::Profile => "profile",
            ServiceKind::PublicInfo => "public-info",
        }
    }

    pub fn default_port(&self) -> u16 {
        match self {
            ServiceKind::Account => 8085,
            ServiceKind::Antifraud => 8086,
            ServiceKind::Authorization => 8087,
            ServiceKind::History => 8088,
            ServiceKind::Profile => 8089,
            ServiceKind::PublicInfo => 8091,
        }
    }

    /// History paths already carry their `/api/history` prefix
    pub fn default_context_path(&self) -> &'static str {
        match self {
            ServiceKind::Account => "/api/account",
            ServiceKind::Antifraud => "/api/anti-fraud",
            ServiceKind::Authorization => "/api/authorization",
            ServiceKind::History => "/",
            ServiceKind::Profile => "/api/profile",
            ServiceKind::PublicInfo => "/api/public-info",
        }
    }

    pub fn required_tables(&self) -> &'static [&'static str] {
        match self {
            ServiceKind::Account => account::TABLES,
            ServiceKind::Antifraud => antifraud::TABLES,
            ServiceKind::Authorization => authorization::TABLES,
            ServiceKind::History => history::TABLES,
            ServiceKind::Profile => profile::TABLES,
            ServiceKind::PublicInfo => public_info::TABLES,
        }
    }

    /// API routes of this service, relative to its context path
    pub fn router(&self, storage: &Storage) -> Router {
        match self {
            ServiceKind::Account => account::router(storage),
            ServiceKind::Antifraud => antifraud::router(storage),
            ServiceKind::Authorization => authorization::router(storage),
            ServiceKind::History => history::router(storage),
            ServiceKind::Profile => profile::router(storage),
            ServiceKind::PublicInfo => public_info::router(storage),
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ServiceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ServiceKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| format!("unknown service '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_round_trip() {
        for kind in ServiceKind::ALL {
            assert_eq!(kind.name().parse::<ServiceKind>().unwrap(), kind);
        }
        assert!("ledger".parse::<ServiceKind>().is_err());
    }

    #[test]
    fn test_ports_are_distinct() {
        let ports: HashSet<_> = ServiceKind::ALL.iter().map(|k| k.default_port()).collect();
        assert_eq!(ports.len(), ServiceKind::ALL.len());
    }

    #[test]
    fn test_history_has_no_audit_table() {
        assert!(!ServiceKind::History.required_tables().contains(&"audit"));
        for kind in ServiceKind::ALL.into_iter().filter(|k| *k != ServiceKind::History) {
            assert!(kind.required_tables().contains(&"audit"), "{} lacks audit", kind);
        }
    }

    #[test]
    fn test_every_router_builds_in_memory() {
        for kind in ServiceKind::ALL {
            let _ = kind.router(&Storage::InMemory);
        }
    }
}
