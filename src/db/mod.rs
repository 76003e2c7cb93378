pub mod error;
#[cfg(test)]
pub mod fake;
pub mod filter;
pub mod models;
pub mod pg_schema;
pub mod postgres;
pub mod store;

pub use error::DatabaseError;
#[cfg(test)]
pub use fake::{FakeOperation, FakeRecordStore};
pub use filter::{RecordFilter, RecordPatch};
pub use models::{Archetype, CachedPlayer, Element, Insights, Persona, PlayerRecord, ProComparison};
pub use postgres::PostgresRecordStore;
pub use store::RecordStore;
