//! Static file serving for the dashboard stylesheet and assets.

use tower_http::services::ServeDir;

/// Serve files below `static_dir`. Missing files answer 404.
pub fn create_static_service(static_dir: &str) -> ServeDir {
    ServeDir::new(static_dir)
}
