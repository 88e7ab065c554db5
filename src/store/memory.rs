//! In-memory record store backed by `RwLock`ed maps.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Datelike;
use tokio::sync::RwLock;

use crate::domain::{Client, Project, Record, TimeEntry, User};

use super::{EntityStore, RecordStore, StoreResult};

/// One entity collection. A `BTreeMap` keeps iteration in id order so paging
/// walks the collection without duplicates or gaps.
pub struct Table<T> {
    rows: RwLock<BTreeMap<i64, T>>,
    next_id: AtomicI64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl<T: Record> EntityStore<T> for Table<T> {
    async fn find(&self, id: i64) -> StoreResult<Option<T>> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn list(&self, skip: i64, take: i64) -> StoreResult<Vec<T>> {
        let skip = skip.max(0) as usize;
        let take = take.max(0) as usize;
        Ok(self
            .rows
            .read()
            .await
            .values()
            .skip(skip)
            .take(take)
            .cloned()
            .collect())
    }

    async fn count(&self) -> StoreResult<i64> {
        Ok(self.rows.read().await.len() as i64)
    }

    async fn add(&self, mut record: T) -> StoreResult<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        record.set_id(id);
        self.rows.write().await.insert(id, record.clone());
        Ok(record)
    }

    async fn update(&self, record: T) -> StoreResult<bool> {
        let mut rows = self.rows.write().await;
        if !rows.contains_key(&record.id()) {
            return Ok(false);
        }
        rows.insert(record.id(), record);
        Ok(true)
    }

    async fn remove(&self, id: i64) -> StoreResult<bool> {
        Ok(self.rows.write().await.remove(&id).is_some())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    users: Table<User>,
    clients: Table<Client>,
    projects: Table<Project>,
    time_entries: Table<TimeEntry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    fn users(&self) -> &dyn EntityStore<User> {
        &self.users
    }

    fn clients(&self) -> &dyn EntityStore<Client> {
        &self.clients
    }

    fn projects(&self) -> &dyn EntityStore<Project> {
        &self.projects
    }

    fn time_entries(&self) -> &dyn EntityStore<TimeEntry> {
        &self.time_entries
    }

    async fn entries_for_user_month(
        &self,
        user_id: i64,
        year: i32,
        month: u32,
    ) -> StoreResult<Vec<TimeEntry>> {
        let rows = self.time_entries.rows.read().await;
        let mut entries: Vec<TimeEntry> = rows
            .values()
            .filter(|e| {
                e.user_id == user_id
                    && e.entry_date.year() == year
                    && e.entry_date.month() == month
            })
            .cloned()
            .collect();
        entries.sort_by_key(|e| e.entry_date);
        Ok(entries)
    }

    async fn commit(&self) -> StoreResult<()> {
        // Writes go straight to the maps; nothing to flush.
        Ok(())
    }
}
