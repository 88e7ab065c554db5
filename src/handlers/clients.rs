use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};

use crate::domain::Client;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::models::{ClientInput, ClientView};
use crate::pagination::{paginate, PageQuery, PagedResult};
use crate::store::{EntityStore, RecordStore};
use crate::AppState;

/// GET /api/clients/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ClientView>, ApiError> {
    let client = state
        .store
        .clients()
        .find(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("client {id} not found")))?;

    Ok(Json(ClientView::from(&client)))
}

/// GET /api/clients?page=&size=
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PagedResult<ClientView>>, ApiError> {
    let (page, size) = query.resolve(state.default_page_size);
    let result = paginate(state.store.clients(), page, size).await?;
    Ok(Json(result.map(|client| ClientView::from(&client))))
}

/// POST /api/clients (admin)
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    OriginalUri(uri): OriginalUri,
    Json(input): Json<ClientInput>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_admin()?;
    input.validate()?;

    let client = state
        .store
        .clients()
        .add(Client {
            id: 0,
            name: input.name,
        })
        .await?;
    state.store.commit().await?;

    let location = format!("{}/{}", uri.path(), client.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(ClientView::from(&client)),
    ))
}

/// PUT /api/clients/:id (admin)
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(input): Json<ClientInput>,
) -> Result<Json<ClientView>, ApiError> {
    auth.require_admin()?;
    input.validate()?;

    let mut client = state
        .store
        .clients()
        .find(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("client {id} not found")))?;

    client.name = input.name;
    state.store.clients().update(client.clone()).await?;
    state.store.commit().await?;

    Ok(Json(ClientView::from(&client)))
}

/// DELETE /api/clients/:id (admin)
pub async fn remove(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    auth.require_admin()?;

    if !state.store.clients().remove(id).await? {
        return Err(ApiError::not_found(format!("client {id} not found")));
    }
    state.store.commit().await?;

    Ok(StatusCode::OK)
}
