use std::sync::Arc;

use axum::{
    extract::rejection::QueryRejection,
    http::{header::CACHE_CONTROL, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Json, Response},
};
use uuid::Uuid;

use crate::analytics::FilterError;
use crate::config::CACHE_CONTROL_ERROR;
use crate::dataset::DatasetError;
use crate::export::ExportError;
use crate::middleware::RequestId;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Dataset(#[from] Arc<DatasetError>),

    #[error("Invalid filter: {0}")]
    InvalidFilter(#[from] FilterError),

    #[error("Invalid query: {}", .0.body_text())]
    InvalidQuery(#[from] QueryRejection),

    #[error("Template rendering error: {0}")]
    Template(#[from] tera::Error),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

impl AppError {
    /// Status code and the message safe to show to visitors.
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::Dataset(e) => match e.as_ref() {
                DatasetError::NotFound(_) => (StatusCode::SERVICE_UNAVAILABLE, self.to_string()),
                _ => {
                    tracing::error!(error = %self, "Dataset could not be loaded");
                    (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
                }
            },
            AppError::InvalidFilter(_) | AppError::InvalidQuery(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            _ => {
                tracing::error!("Internal error: {:?}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        AppErrorResponse {
            error: self,
            request_id: None,
            format: ErrorFormat::Html,
        }
        .into_response()
    }
}

/// How an error is rendered to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorFormat {
    Html,
    Json,
}

/// An `AppError` tagged with the request it happened in, so the visitor can
/// quote the ID and it can be matched against the logs.
#[derive(Debug)]
pub struct AppErrorResponse {
    pub error: AppError,
    pub request_id: Option<Uuid>,
    pub format: ErrorFormat,
}

impl IntoResponse for AppErrorResponse {
    fn into_response(self) -> Response {
        let (status, message) = self.error.status_and_message();
        let request_id = self.request_id.map(|id| id.to_string());

        let mut response = match self.format {
            ErrorFormat::Json => (
                status,
                Json(serde_json::json!({
                    "error": message,
                    "status": status.as_u16(),
                    "request_id": request_id,
                })),
            )
                .into_response(),
            ErrorFormat::Html => {
                let reference = request_id
                    .map(|id| format!("<p class=\"request-id\">Request ID: {}</p>", id))
                    .unwrap_or_default();
                let body = format!(
                    r#"<!DOCTYPE html>
<html>
<head>
    <title>Error {}</title>
    <link rel="stylesheet" href="/static/css/style.css">
</head>
<body>
    <div class="container">
        <div class="error-page">
            <h1>Error {}</h1>
            <p>{}</p>
            {}
            <a href="/">Return to dashboard</a>
        </div>
    </div>
</body>
</html>"#,
                    status.as_u16(),
                    status.as_u16(),
                    escape_html(&message),
                    reference
                );
                (status, Html(body)).into_response()
            }
        };

        response
            .headers_mut()
            .insert(CACHE_CONTROL, HeaderValue::from_static(CACHE_CONTROL_ERROR));
        response
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Attach the current request ID to an error result.
pub trait ResultExt<T> {
    fn with_request_id(self, request_id: &RequestId) -> Result<T, AppErrorResponse>;
    fn with_request_id_json(self, request_id: &RequestId) -> Result<T, AppErrorResponse>;
}

impl<T, E: Into<AppError>> ResultExt<T> for Result<T, E> {
    fn with_request_id(self, request_id: &RequestId) -> Result<T, AppErrorResponse> {
        self.map_err(|e| AppErrorResponse {
            error: e.into(),
            request_id: Some(request_id.0),
            format: ErrorFormat::Html,
        })
    }

    fn with_request_id_json(self, request_id: &RequestId) -> Result<T, AppErrorResponse> {
        self.map_err(|e| AppErrorResponse {
            error: e.into(),
            request_id: Some(request_id.0),
            format: ErrorFormat::Json,
        })
    }
}
