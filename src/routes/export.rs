//! Download of the filtered records as CSV.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::IntoResponse,
    Extension,
};
use tracing::instrument;

use crate::analytics::{Filter, FilterOptions, FilterParams};
use crate::config::EXPORT_FILE_NAME;
use crate::error::{AppErrorResponse, ResultExt};
use crate::export::to_csv;
use crate::middleware::RequestId;
use crate::state::AppState;

/// Filtered rows as a `text/csv` attachment.
#[instrument(name = "export::csv", skip(state, query, request_id))]
pub async fn csv(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    query: Result<Query<FilterParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppErrorResponse> {
    let Query(params) = query.with_request_id(&request_id)?;
    let dataset = state.store.get().await.with_request_id(&request_id)?;
    let options = FilterOptions::from_dataset(&dataset);
    let filter = Filter::resolve(&params, &options).with_request_id(&request_id)?;
    let records = filter.apply(&dataset);

    let body = to_csv(&records).with_request_id(&request_id)?;
    tracing::debug!(rows = records.len(), bytes = body.len(), "Exported CSV");

    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME),
            ),
        ],
        body,
    ))
}
