use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::{Client, Project, TimeEntry, User};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: i64,
    pub name: String,
    pub hour_rate: Decimal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientView {
    pub id: i64,
    pub name: String,
}

/// Projects carry their resolved client.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectView {
    pub id: i64,
    pub name: String,
    pub client: Option<ClientView>,
}

/// Entries carry their resolved user and project chain. The nested fields are
/// null when the referenced record has since been hard-deleted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntryView {
    pub id: i64,
    pub user: Option<UserView>,
    pub project: Option<ProjectView>,
    pub entry_date: NaiveDate,
    pub hours: i32,
    pub hour_rate: Decimal,
    pub description: String,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            hour_rate: user.hour_rate,
        }
    }
}

impl From<&Client> for ClientView {
    fn from(client: &Client) -> Self {
        Self {
            id: client.id,
            name: client.name.clone(),
        }
    }
}

impl ProjectView {
    pub fn new(project: &Project, client: Option<&Client>) -> Self {
        Self {
            id: project.id,
            name: project.name.clone(),
            client: client.map(ClientView::from),
        }
    }
}

impl TimeEntryView {
    pub fn new(
        entry: &TimeEntry,
        user: Option<&User>,
        project: Option<&Project>,
        client: Option<&Client>,
    ) -> Self {
        Self {
            id: entry.id,
            user: user.map(UserView::from),
            project: project.map(|p| ProjectView::new(p, client)),
            entry_date: entry.entry_date,
            hours: entry.hours,
            hour_rate: entry.hour_rate,
            description: entry.description.clone(),
        }
    }
}
