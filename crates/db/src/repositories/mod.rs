//! Repository layer: one struct per table, translating domain operations into SQL.

pub mod task_repo;

pub use task_repo::TaskRepo;
