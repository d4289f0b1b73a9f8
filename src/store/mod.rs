//! Persistence layer: local device storage or a per-user libSQL table.

pub mod libsql_backend;
pub mod local;
pub mod migrations;
pub mod traits;

pub use libsql_backend::LibSqlProfileStore;
pub use local::LocalProfileStore;
pub use traits::{OwnerKey, ProfileStore};
