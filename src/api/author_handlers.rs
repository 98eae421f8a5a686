use axum::{extract::State, response::Json};
use serde::Serialize;

use crate::api::error::AppError;
use crate::api::extract::{AppJson, AppPath};
use crate::api::handlers::AppState;
use crate::model::{AuthorPatch, AuthorView, Id, NewAuthor};
use crate::store::traits::Store;

/// Authors are always returned with their derived fields
#[derive(Debug, Serialize)]
pub struct AuthorResponse {
    pub author: AuthorView,
}

#[derive(Debug, Serialize)]
pub struct AuthorListResponse {
    pub authors: Vec<AuthorView>,
}

pub async fn list_authors<S: Store>(
    State(store): State<AppState<S>>,
) -> Result<Json<AuthorListResponse>, AppError> {
    let authors = store
        .list_authors()
        .await?
        .into_iter()
        .map(AuthorView::from)
        .collect();
    Ok(Json(AuthorListResponse { authors }))
}

pub async fn create_author<S: Store>(
    State(store): State<AppState<S>>,
    AppJson(new_author): AppJson<NewAuthor>,
) -> Result<Json<AuthorResponse>, AppError> {
    let author = store.create_author(new_author).await?;
    log::info!("Created author {}", author.id);
    Ok(Json(AuthorResponse {
        author: author.into(),
    }))
}

pub async fn get_author<S: Store>(
    State(store): State<AppState<S>>,
    AppPath(author_id): AppPath<Id>,
) -> Result<Json<AuthorResponse>, AppError> {
    let author = store
        .get_author(&author_id)
        .await?
        .ok_or_else(|| AppError::author_not_found(&author_id))?;
    Ok(Json(AuthorResponse {
        author: author.into(),
    }))
}

pub async fn update_author<S: Store>(
    State(store): State<AppState<S>>,
    AppPath(author_id): AppPath<Id>,
    AppJson(patch): AppJson<AuthorPatch>,
) -> Result<Json<AuthorResponse>, AppError> {
    let author = store
        .update_author(&author_id, patch)
        .await?
        .ok_or_else(|| AppError::author_not_found(&author_id))?;
    Ok(Json(AuthorResponse {
        author: author.into(),
    }))
}

pub async fn delete_author<S: Store>(
    State(store): State<AppState<S>>,
    AppPath(author_id): AppPath<Id>,
) -> Result<Json<AuthorResponse>, AppError> {
    let author = store
        .delete_author(&author_id)
        .await?
        .ok_or_else(|| AppError::author_not_found(&author_id))?;
    log::info!("Deleted author {}", author.id);
    Ok(Json(AuthorResponse {
        author: author.into(),
    }))
}
