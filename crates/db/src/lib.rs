//! PostgreSQL access for tasks: the connection-owning [`Store`], schema
//! bootstrap, row models and the task repository.

pub mod config;
pub mod models;
pub mod repositories;
pub mod schema;
pub mod store;

pub use config::DatabaseConfig;
pub use schema::{ensure_schema, health_check};
pub use store::{Store, StoreError};
