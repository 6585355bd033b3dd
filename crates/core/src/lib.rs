//! Domain primitives shared by the storage and HTTP layers.

pub mod error;
pub mod task;
pub mod types;
