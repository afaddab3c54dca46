//! bank-services library
//!
//! Shared CRUD core and the six service definitions. Each binary in
//! `src/bin/` runs one service through [`server::run`].

pub mod api;
pub mod audit;
pub mod config;
pub mod context;
pub mod crud;
pub mod db;
mod error;
pub mod info;
pub mod server;
pub mod services;

pub use config::Config;
pub use context::OperationContext;
pub use error::{AppError, AppResult, ErrorResponse};
pub use services::{ServiceKind, Storage};
