//! Record store abstraction.
//!
//! Persistence is an external collaborator: handlers only see these traits.
//! The bundled [`memory::MemoryStore`] keeps everything in process memory,
//! which is all the demo needs; a database-backed implementation would slot
//! in behind the same traits.

use async_trait::async_trait;

use crate::domain::{Client, Project, Record, TimeEntry, User};

pub mod memory;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Uniform CRUD surface over one entity collection.
///
/// `list` slices the collection in store-default order; `count` always
/// reflects the unfiltered total.
#[async_trait]
pub trait EntityStore<T: Record>: Send + Sync {
    async fn find(&self, id: i64) -> StoreResult<Option<T>>;
    async fn list(&self, skip: i64, take: i64) -> StoreResult<Vec<T>>;
    async fn count(&self) -> StoreResult<i64>;
    /// Assigns the id; the record's incoming id is ignored.
    async fn add(&self, record: T) -> StoreResult<T>;
    /// Overwrites the record with the same id. Returns false when it does not
    /// exist.
    async fn update(&self, record: T) -> StoreResult<bool>;
    /// Hard delete. Returns false when the id does not exist.
    async fn remove(&self, id: i64) -> StoreResult<bool>;
}

/// The full record store: one [`EntityStore`] per entity kind plus the
/// queries that cross a single collection.
#[async_trait]
pub trait RecordStore: Send + Sync {
    fn users(&self) -> &dyn EntityStore<User>;
    fn clients(&self) -> &dyn EntityStore<Client>;
    fn projects(&self) -> &dyn EntityStore<Project>;
    fn time_entries(&self) -> &dyn EntityStore<TimeEntry>;

    /// All entries for one user within a calendar month, ordered ascending by
    /// entry date.
    async fn entries_for_user_month(
        &self,
        user_id: i64,
        year: i32,
        month: u32,
    ) -> StoreResult<Vec<TimeEntry>>;

    /// Flush pending writes. A no-op for stores that write through.
    async fn commit(&self) -> StoreResult<()>;
}
