//! Dashboard page and its JSON twin.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::{Html, Json},
    Extension,
};
use tracing::instrument;

use crate::analytics::{Dashboard, FilterParams};
use crate::error::{AppError, AppErrorResponse, ResultExt};
use crate::middleware::RequestId;
use crate::state::AppState;

/// Dashboard page for the selected filters.
#[instrument(name = "dashboard::index", skip(state, query, request_id))]
pub async fn index(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    query: Result<Query<FilterParams>, QueryRejection>,
) -> Result<Html<String>, AppErrorResponse> {
    let Query(params) = query.with_request_id(&request_id)?;
    let dataset = state.store.get().await.with_request_id(&request_id)?;
    let dashboard = Dashboard::build(&dataset, &params).with_request_id(&request_id)?;

    tracing::debug!(
        total = dashboard.total_records,
        selected = dashboard.filtered_records,
        "Built dashboard"
    );

    let mut context = tera::Context::new();
    context.insert("config", &state.config.ui);
    context.insert("dashboard", &dashboard);

    let html = state
        .tera
        .render("dashboard.html", &context)
        .map_err(AppError::from)
        .with_request_id(&request_id)?;
    Ok(Html(html))
}

/// The dashboard model as JSON.
#[instrument(name = "dashboard::api", skip(state, query, request_id))]
pub async fn api(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    query: Result<Query<FilterParams>, QueryRejection>,
) -> Result<Json<Dashboard>, AppErrorResponse> {
    let Query(params) = query.with_request_id_json(&request_id)?;
    let dataset = state.store.get().await.with_request_id_json(&request_id)?;
    let dashboard = Dashboard::build(&dataset, &params).with_request_id_json(&request_id)?;
    Ok(Json(dashboard))
}
