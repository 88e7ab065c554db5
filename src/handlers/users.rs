use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};

use crate::domain::User;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::models::{UserInput, UserView};
use crate::pagination::{paginate, PageQuery, PagedResult};
use crate::store::{EntityStore, RecordStore};
use crate::AppState;

/// GET /api/users/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserView>, ApiError> {
    let user = state
        .store
        .users()
        .find(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("user {id} not found")))?;

    Ok(Json(UserView::from(&user)))
}

/// GET /api/users?page=&size=
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PagedResult<UserView>>, ApiError> {
    let (page, size) = query.resolve(state.default_page_size);
    let result = paginate(state.store.users(), page, size).await?;
    Ok(Json(result.map(|user| UserView::from(&user))))
}

/// POST /api/users (admin)
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    OriginalUri(uri): OriginalUri,
    Json(input): Json<UserInput>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_admin()?;
    input.validate()?;

    let user = state
        .store
        .users()
        .add(User {
            id: 0,
            name: input.name,
            hour_rate: input.hour_rate,
        })
        .await?;
    state.store.commit().await?;

    let location = format!("{}/{}", uri.path(), user.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(UserView::from(&user)),
    ))
}

/// PUT /api/users/:id (admin)
///
/// Overwrites the fields the input model carries; existing time entries keep
/// their rate snapshot.
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(input): Json<UserInput>,
) -> Result<Json<UserView>, ApiError> {
    auth.require_admin()?;
    input.validate()?;

    let mut user = state
        .store
        .users()
        .find(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("user {id} not found")))?;

    user.name = input.name;
    user.hour_rate = input.hour_rate;
    state.store.users().update(user.clone()).await?;
    state.store.commit().await?;

    Ok(Json(UserView::from(&user)))
}

/// DELETE /api/users/:id (admin)
pub async fn remove(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    auth.require_admin()?;

    if !state.store.users().remove(id).await? {
        return Err(ApiError::not_found(format!("user {id} not found")));
    }
    state.store.commit().await?;

    Ok(StatusCode::OK)
}
