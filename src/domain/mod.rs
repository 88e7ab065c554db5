//! Persisted entities. Identifiers are 64-bit integers assigned by the record
//! store on creation and immutable afterwards.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Anything the record store can hold.
pub trait Record: Clone + Send + Sync + 'static {
    fn id(&self) -> i64;
    fn set_id(&mut self, id: i64);
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub hour_rate: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    pub name: String,
}

/// A project always belongs to exactly one client; the client may be
/// reassigned via update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub client_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeEntry {
    pub id: i64,
    pub user_id: i64,
    pub project_id: i64,
    pub entry_date: NaiveDate,
    pub hours: i32,
    /// Copied from the user's rate at creation time; changing the user's rate
    /// never touches existing entries.
    pub hour_rate: Decimal,
    pub description: String,
}

macro_rules! impl_record {
    ($($ty:ty),+) => {
        $(impl Record for $ty {
            fn id(&self) -> i64 {
                self.id
            }

            fn set_id(&mut self, id: i64) {
                self.id = id;
            }
        })+
    };
}

impl_record!(User, Client, Project, TimeEntry);
