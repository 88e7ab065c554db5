use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};

use crate::domain::Project;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::models::{ProjectInput, ProjectView};
use crate::pagination::{paginate, PageQuery, PagedResult};
use crate::store::{EntityStore, RecordStore};
use crate::AppState;

async fn resolve_view(store: &dyn RecordStore, project: &Project) -> Result<ProjectView, ApiError> {
    let client = store.clients().find(project.client_id).await?;
    Ok(ProjectView::new(project, client.as_ref()))
}

/// GET /api/projects/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ProjectView>, ApiError> {
    let project = state
        .store
        .projects()
        .find(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("project {id} not found")))?;

    Ok(Json(resolve_view(state.store.as_ref(), &project).await?))
}

/// GET /api/projects?page=&size=
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PagedResult<ProjectView>>, ApiError> {
    let (page, size) = query.resolve(state.default_page_size);
    let result = paginate(state.store.projects(), page, size).await?;

    let mut views = Vec::with_capacity(result.items.len());
    for project in &result.items {
        views.push(resolve_view(state.store.as_ref(), project).await?);
    }
    Ok(Json(PagedResult {
        items: views,
        page: result.page,
        page_size: result.page_size,
        total_count: result.total_count,
        total_pages: result.total_pages,
    }))
}

/// POST /api/projects (admin)
///
/// The referenced client must exist; creation fails with 404 otherwise and
/// the store is left untouched.
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    OriginalUri(uri): OriginalUri,
    Json(input): Json<ProjectInput>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_admin()?;
    input.validate()?;

    let client = state
        .store
        .clients()
        .find(input.client_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("client {} not found", input.client_id)))?;

    let project = state
        .store
        .projects()
        .add(Project {
            id: 0,
            name: input.name,
            client_id: client.id,
        })
        .await?;
    state.store.commit().await?;

    let location = format!("{}/{}", uri.path(), project.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(ProjectView::new(&project, Some(&client))),
    ))
}

/// PUT /api/projects/:id (admin)
///
/// May reassign the project to another client; the new client is resolved
/// before anything is written.
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(input): Json<ProjectInput>,
) -> Result<Json<ProjectView>, ApiError> {
    auth.require_admin()?;
    input.validate()?;

    let mut project = state
        .store
        .projects()
        .find(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("project {id} not found")))?;

    let client = state
        .store
        .clients()
        .find(input.client_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("client {} not found", input.client_id)))?;

    project.name = input.name;
    project.client_id = client.id;
    state.store.projects().update(project.clone()).await?;
    state.store.commit().await?;

    Ok(Json(ProjectView::new(&project, Some(&client))))
}

/// DELETE /api/projects/:id (admin)
pub async fn remove(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    auth.require_admin()?;

    if !state.store.projects().remove(id).await? {
        return Err(ApiError::not_found(format!("project {id} not found")));
    }
    state.store.commit().await?;

    Ok(StatusCode::OK)
}
