use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use chrono::NaiveDate;

use crate::domain::TimeEntry;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::models::{TimeEntryInput, TimeEntryUpdate, TimeEntryView};
use crate::pagination::{paginate, PageQuery, PagedResult};
use crate::store::{EntityStore, RecordStore};
use crate::AppState;

/// Resolve the user/project/client chain for projection. Any link that has
/// since been deleted simply comes back null.
async fn resolve_view(store: &dyn RecordStore, entry: &TimeEntry) -> Result<TimeEntryView, ApiError> {
    let user = store.users().find(entry.user_id).await?;
    let project = store.projects().find(entry.project_id).await?;
    let client = match &project {
        Some(project) => store.clients().find(project.client_id).await?,
        None => None,
    };
    Ok(TimeEntryView::new(
        entry,
        user.as_ref(),
        project.as_ref(),
        client.as_ref(),
    ))
}

/// GET /api/time-entries/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<TimeEntryView>, ApiError> {
    let entry = state
        .store
        .time_entries()
        .find(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("time entry {id} not found")))?;

    Ok(Json(resolve_view(state.store.as_ref(), &entry).await?))
}

/// GET /api/time-entries?page=&size=
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PagedResult<TimeEntryView>>, ApiError> {
    let (page, size) = query.resolve(state.default_page_size);
    let result = paginate(state.store.time_entries(), page, size).await?;

    let mut views = Vec::with_capacity(result.items.len());
    for entry in &result.items {
        views.push(resolve_view(state.store.as_ref(), entry).await?);
    }
    Ok(Json(PagedResult {
        items: views,
        page: result.page,
        page_size: result.page_size,
        total_count: result.total_count,
        total_pages: result.total_pages,
    }))
}

/// GET /api/time-entries/user/:user_id/:year/:month
///
/// Unpaginated, ordered ascending by entry date.
pub async fn by_user_month(
    State(state): State<AppState>,
    Path((user_id, year, month)): Path<(i64, i32, u32)>,
) -> Result<Json<Vec<TimeEntryView>>, ApiError> {
    if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
        return Err(ApiError::bad_request(format!(
            "{year}-{month} is not a calendar month"
        )));
    }

    let entries = state
        .store
        .entries_for_user_month(user_id, year, month)
        .await?;

    let mut views = Vec::with_capacity(entries.len());
    for entry in &entries {
        views.push(resolve_view(state.store.as_ref(), entry).await?);
    }
    Ok(Json(views))
}

/// POST /api/time-entries (admin)
///
/// Both referenced records must exist. The user's current rate is copied onto
/// the entry; later rate changes never touch it.
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    OriginalUri(uri): OriginalUri,
    Json(input): Json<TimeEntryInput>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_admin()?;
    input.validate()?;

    let user = state
        .store
        .users()
        .find(input.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("user {} not found", input.user_id)))?;
    let project = state
        .store
        .projects()
        .find(input.project_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("project {} not found", input.project_id)))?;
    let client = state.store.clients().find(project.client_id).await?;

    let entry = state
        .store
        .time_entries()
        .add(TimeEntry {
            id: 0,
            user_id: user.id,
            project_id: project.id,
            entry_date: input.entry_date,
            hours: input.hours,
            hour_rate: user.hour_rate,
            description: input.description,
        })
        .await?;
    state.store.commit().await?;

    let location = format!("{}/{}", uri.path(), entry.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(TimeEntryView::new(
            &entry,
            Some(&user),
            Some(&project),
            client.as_ref(),
        )),
    ))
}

/// PUT /api/time-entries/:id (admin)
///
/// Applies only the fields the update model carries: date, hours and
/// description. The user/project links and the rate snapshot survive.
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(input): Json<TimeEntryUpdate>,
) -> Result<Json<TimeEntryView>, ApiError> {
    auth.require_admin()?;
    input.validate()?;

    let mut entry = state
        .store
        .time_entries()
        .find(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("time entry {id} not found")))?;

    entry.entry_date = input.entry_date;
    entry.hours = input.hours;
    entry.description = input.description;
    state.store.time_entries().update(entry.clone()).await?;
    state.store.commit().await?;

    Ok(Json(resolve_view(state.store.as_ref(), &entry).await?))
}

/// DELETE /api/time-entries/:id (admin)
pub async fn remove(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    auth.require_admin()?;

    if !state.store.time_entries().remove(id).await? {
        return Err(ApiError::not_found(format!("time entry {id} not found")));
    }
    state.store.commit().await?;

    Ok(StatusCode::OK)
}
