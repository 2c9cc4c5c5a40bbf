//! Wrap-up document handlers.
//!
//! All routes here sit behind `require_auth`.

use crate::errors::WuError;
use crate::observability::metrics::record_wrapup_operation;
use crate::routes::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use common::types::{ListWrapupsResponse, NewWrapup, Wrapup};
use serde::Deserialize;
use std::sync::Arc;
use tracing::instrument;

/// Client-facing message for a body that is not a wrapup document.
pub const INVALID_BODY_MESSAGE: &str = "request body is malformed or incomplete";

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub filter: String,
}

fn status_label<T>(result: &Result<T, WuError>) -> &'static str {
    if result.is_ok() {
        "success"
    } else {
        "error"
    }
}

/// `GET /api/v1/wrapups?filter=<text>`
#[instrument(skip_all, name = "wu.handlers.list_wrapups")]
pub async fn list_wrapups(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListWrapupsResponse>, WuError> {
    let result = state.store.list(params.filter.trim()).await;
    record_wrapup_operation("list", status_label(&result));
    let wrapups = result?;

    tracing::debug!(target: "wu.handlers", count = wrapups.len(), "Listed wrapups");

    Ok(Json(ListWrapupsResponse {
        count: wrapups.len(),
        wrapups,
    }))
}

/// `GET /api/v1/wrapups/{id}`
#[instrument(skip_all, name = "wu.handlers.get_wrapup")]
pub async fn get_wrapup(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Wrapup>, WuError> {
    let id = id.trim();
    if id.is_empty() {
        record_wrapup_operation("get", "error");
        return Err(WuError::BadRequest("id is required".to_string()));
    }

    let result = state
        .store
        .get(id)
        .await
        .and_then(|found| found.ok_or_else(|| WuError::NotFound("wrapup not found".to_string())));
    record_wrapup_operation("get", status_label(&result));

    Ok(Json(result?))
}

/// `POST /api/v1/wrapups`
#[instrument(skip_all, name = "wu.handlers.create_wrapup")]
pub async fn create_wrapup(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewWrapup>, JsonRejection>,
) -> Result<(StatusCode, Json<Wrapup>), WuError> {
    let Json(new) = payload.map_err(|rejection| {
        tracing::debug!(target: "wu.handlers", error = %rejection, "Rejected wrapup body");
        record_wrapup_operation("create", "error");
        WuError::BadRequest(INVALID_BODY_MESSAGE.to_string())
    })?;

    if new.title.trim().is_empty() {
        record_wrapup_operation("create", "error");
        return Err(WuError::BadRequest("title is required".to_string()));
    }

    let result = state.store.create(new).await;
    record_wrapup_operation("create", status_label(&result));
    let wrapup = result?;

    tracing::info!(target: "wu.handlers", wrapup_id = %wrapup.id, "Wrapup created");

    Ok((StatusCode::CREATED, Json(wrapup)))
}
