//! Book resource handlers
//!
//! Translates HTTP requests into `BookStore` calls and maps outcomes to
//! status codes: 400 for malformed input, 404 for missing records, 500 for
//! backend failures.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use tracing::info;

use crate::error::ApiError;
use crate::types::{Book, BookDraft, BookId};
use crate::AppState;

fn parse_id(raw: &str) -> Result<BookId, ApiError> {
    BookId::parse(raw).ok_or_else(|| ApiError::BadRequest(format!("invalid book id: {raw}")))
}

fn parse_body(body: Result<Json<BookDraft>, JsonRejection>) -> Result<BookDraft, ApiError> {
    match body {
        Ok(Json(draft)) => Ok(draft),
        Err(rejection) => Err(ApiError::BadRequest(rejection.body_text())),
    }
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Book>>, ApiError> {
    let books = state.store.list().await?;
    Ok(Json(books))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Book>, ApiError> {
    let id = parse_id(&id)?;
    let book = state.store.get(&id).await?;
    Ok(Json(book))
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<BookDraft>, JsonRejection>,
) -> Result<Response, ApiError> {
    let draft = parse_body(body)?;
    let book = state.store.create(draft).await?;
    info!(id = %book.id, "created book");
    Ok((StatusCode::CREATED, Json(book)).into_response())
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<BookDraft>, JsonRejection>,
) -> Result<Json<Book>, ApiError> {
    let id = parse_id(&id)?;
    let draft = parse_body(body)?;
    let book = state.store.update(&id, draft).await?;
    Ok(Json(book))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id)?;
    state.store.delete(&id).await?;
    info!(id = %id, "deleted book");
    Ok(Json(json!({ "message": "Book deleted" })))
}

/// Maintenance endpoint: unconditionally empties the active store. Routed
/// as `/clear-mongodb` or `/clear-redis` depending on the backend; the
/// in-memory variant does not mount it.
pub async fn clear(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    state.store.clear().await?;
    info!(backend = %state.backend, "cleared storage");
    Ok(Json(json!({ "message": format!("{} storage cleared", state.backend) })))
}
