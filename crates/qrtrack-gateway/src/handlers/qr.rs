use crate::error::{AppError, Result, GENERATE_FAILED, LOAD_FAILED, SCAN_FAILED};
use crate::model::{GenerateForm, IndexPage};
use crate::state::AppState;
use askama::Template;
use axum::extract::rejection::FormRejection;
use axum::extract::{Path, State};
use axum::response::{Html, Redirect, Response};
use axum::Form;
use qrtrack_core::{Link, RecordId};
use tracing::{debug, info};

pub async fn index_handler(State(state): State<AppState>) -> Result<Html<String>> {
    let records = state
        .issuer
        .list()
        .await
        .map_err(|e| AppError::internal(LOAD_FAILED, e))?;

    let page = IndexPage { records }
        .render()
        .map_err(|e| AppError::internal(LOAD_FAILED, e))?;
    Ok(Html(page))
}

pub async fn generate_handler(
    State(state): State<AppState>,
    form: std::result::Result<Form<GenerateForm>, FormRejection>,
) -> Result<Redirect> {
    // an unreadable body is treated like a missing `link` field
    let Form(form) = form.map_err(|rejection| AppError::InvalidInput(rejection.body_text()))?;
    let link = Link::new(form.link.unwrap_or_default())?;

    let id = state
        .issuer
        .issue(link)
        .await
        .map_err(|e| AppError::internal(GENERATE_FAILED, e))?;
    info!(id = %id, "generated qr code");

    Ok(Redirect::to("/"))
}

pub async fn scan_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Response> {
    // malformed ids are treated as unknown, without touching the store
    let id: RecordId = id.parse().inspect_err(|e| debug!(error = %e, "malformed scan id"))?;
    info!(id = %id, "scan request received");

    let record = state
        .redirector
        .resolve(id)
        .await
        .map_err(|e| AppError::internal(SCAN_FAILED, e))?
        .ok_or(AppError::NotFound)?;

    state.presenter.present(&record.link)
}
