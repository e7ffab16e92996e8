//! HTTP to HTTPS redirect server.
//!
//! Spawns a lightweight HTTP listener on the configured port that redirects
//! every request to the HTTPS dashboard, except the health probe which is
//! answered directly so plain-HTTP health checks keep working.

use std::net::SocketAddr;

use axum::http::Uri;
use axum::response::Redirect;
use axum::routing::{any, get};
use axum::Router;
use axum_extra::extract::Host;

use crate::routes::{health, HEALTH_PATH};

/// Spawn an HTTP server that redirects all requests to HTTPS.
///
/// This runs in the background and does not block.
pub fn spawn_redirect_server(http_port: u16, https_port: u16) {
    tokio::spawn(async move {
        let addr = SocketAddr::from(([0, 0, 0, 0], http_port));

        tracing::info!(
            http_port = %http_port,
            https_port = %https_port,
            "Starting HTTP->HTTPS redirect server"
        );

        match axum_server::bind(addr)
            .serve(redirect_router(https_port).into_make_service())
            .await
        {
            Ok(()) => {
                tracing::debug!("HTTP redirect server stopped");
            }
            Err(e) => {
                tracing::error!(error = %e, "HTTP redirect server failed");
            }
        }
    });
}

fn redirect_router(https_port: u16) -> Router {
    Router::new()
        .route(HEALTH_PATH, get(health::health))
        .fallback(any(move |Host(host): Host, uri: Uri| async move {
            redirect_to_https(&host, &uri, https_port)
        }))
}

/// Build the HTTPS URL for a plain HTTP request.
fn https_url(host: &str, uri: &Uri, https_port: u16) -> String {
    let host_without_port = host.split(':').next().unwrap_or(host);
    let path = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");

    if https_port == 443 {
        format!("https://{}{}", host_without_port, path)
    } else {
        format!("https://{}:{}{}", host_without_port, https_port, path)
    }
}

fn redirect_to_https(host: &str, uri: &Uri, https_port: u16) -> Redirect {
    let url = https_url(host, uri, https_port);
    tracing::debug!(from = %uri, to = %url, "Redirecting HTTP to HTTPS");
    Redirect::permanent(&url)
}
