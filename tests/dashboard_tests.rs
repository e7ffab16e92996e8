//! End-to-end tests of the HTTP surface.
//!
//! Each test builds the full router over a dataset written to a temporary
//! directory and drives it with `tower::ServiceExt::oneshot`, so no port is
//! bound.
//!
//! Run with: cargo test --test dashboard_tests

use std::path::Path;

use axum::body::{to_bytes, Body};
use axum::http::header::{CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::{Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use screentime::config::{
    AppConfig, CACHE_CONTROL_DASHBOARD, CACHE_CONTROL_ERROR, CACHE_CONTROL_STATIC,
};
use screentime::routes::create_router;
use screentime::state::AppState;
use screentime::store::DatasetStore;
use screentime::templates::init_templates;

const DATASET: &str = "\
Age,Gender,City_Type,Device_Type,Daily_Screen_Time,Sleep_Hours,Outdoor_Activity,Purpose,Academic_Performance,Reported_Health_Issues
8,Male,Urban,Smartphone,1.5,9.0,2.0,Educational,Good,No
10,Female,Rural,TV,3.0,8.0,1.5,Entertainment,Average,No
12,Male,Urban,Laptop,5.0,6.5,0.5,Gaming,Poor,Yes
14,Female,Urban,Smartphone,7.0,5.9,0.2,Social Media,Poor,Yes
10,Male,Rural,Smartphone,2.5,7.5,1.0,Entertainment,Good,No
";

const BODY_LIMIT: usize = 1024 * 1024;

fn app_for(dataset: &Path) -> Router {
    let mut config = AppConfig::default();
    config.data.path = dataset.to_path_buf();
    config.ui.templates_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/templates").to_string();
    config.ui.static_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/static").to_string();

    let tera = init_templates(&config.ui.template_glob()).expect("templates compile");
    let store = DatasetStore::new(&config.data);
    create_router(AppState::new(config, tera, store))
}

fn app_with_dataset(dir: &tempfile::TempDir) -> Router {
    let path = dir.path().join("kids.csv");
    std::fs::write(&path, DATASET).unwrap();
    app_for(&path)
}

async fn get(app: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), BODY_LIMIT).await.unwrap();
    (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn health_probe_answers_without_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_for(&dir.path().join("missing.csv"));

    for path in ["/_stcore/health", "/health"] {
        let (status, headers, body) = get(app.clone(), path).await;
        assert_eq!(status, StatusCode::OK, "{}", path);
        assert_eq!(body, "ok");
        assert_eq!(headers.get(CACHE_CONTROL).unwrap(), "no-store");
    }
}

#[tokio::test]
async fn dashboard_renders_all_sections() {
    let dir = tempfile::tempdir().unwrap();
    let (status, headers, body) = get(app_with_dataset(&dir), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers.get(CACHE_CONTROL).unwrap(), CACHE_CONTROL_DASHBOARD);
    assert!(body.contains("Indian Kids Screen Time Analytics Dashboard"));
    assert!(body.contains("Showing 5 of 5 children."));
    assert!(body.contains("3.80 hrs"));
    assert!(body.contains("Average Screen Time by Age"));
    assert!(body.contains("Sleep Hours vs Screen Time"));
    assert!(body.contains("Consider wellness programs."));
    assert!(body.contains("Download Filtered Data as CSV"));
    // health detail is opt-in
    assert!(!body.contains("Children with Reported Health Issues"));
}

#[tokio::test]
async fn dashboard_applies_filters() {
    let dir = tempfile::tempdir().unwrap();
    let (status, _, body) = get(
        app_with_dataset(&dir),
        "/?age_min=8&age_max=12&gender=Male&city=All&device=All&health=true",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Showing 3 of 5 children."));
    assert!(body.contains("Children with Reported Health Issues"));
}

#[tokio::test]
async fn dashboard_reports_missing_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_for(&dir.path().join("missing.csv"));
    let (status, headers, body) = get(app, "/").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(headers.get(CACHE_CONTROL).unwrap(), CACHE_CONTROL_ERROR);
    assert!(body.contains("not found. Please upload the file."));
    assert!(body.contains("Request ID:"));
}

#[tokio::test]
async fn dataset_uploaded_after_start_is_picked_up() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kids.csv");
    let app = app_for(&path);

    let (status, _, _) = get(app.clone(), "/").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    std::fs::write(&path, DATASET).unwrap();
    let (status, _, _) = get(app, "/").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn inverted_age_range_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let (status, _, body) = get(app_with_dataset(&dir), "/api/dashboard?age_min=14&age_max=8").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], 400);
    assert!(json["request_id"].is_string());
}

#[tokio::test]
async fn cleared_age_box_uses_dataset_bounds() {
    let dir = tempfile::tempdir().unwrap();
    let (status, _, body) = get(
        app_with_dataset(&dir),
        "/?age_min=&age_max=14&gender=All&city=All&device=All",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Showing 5 of 5 children."));
}

#[tokio::test]
async fn malformed_query_gets_error_page() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with_dataset(&dir);

    let (status, headers, body) = get(app.clone(), "/?age_min=ten").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(headers.get(CACHE_CONTROL).unwrap(), CACHE_CONTROL_ERROR);
    assert!(body.contains("Request ID:"));
    assert!(body.contains("age_min"));

    let (status, headers, body) = get(app, "/api/dashboard?age_min=ten").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(headers
        .get(CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("application/json"));
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], 400);
    assert!(json["error"].as_str().unwrap().contains("age_min"));
    assert!(json["request_id"].is_string());
}

#[tokio::test]
async fn malformed_dataset_is_server_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kids.csv");
    let header = DATASET.lines().next().unwrap();
    std::fs::write(
        &path,
        format!(
            "{}\n8,Male,Urban,Smartphone,1.5,9.0,2.0,Educational,Good,No\nnine,Male,Urban,TV,1.0,9.0,2.0,Educational,Good,No\n",
            header
        ),
    )
    .unwrap();

    let (status, headers, body) = get(app_for(&path), "/").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(headers.get(CACHE_CONTROL).unwrap(), CACHE_CONTROL_ERROR);
    assert!(body.contains("Invalid dataset row 2"), "{}", body);
}

#[tokio::test]
async fn api_reports_missing_dataset_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_for(&dir.path().join("missing.csv"));
    let (status, headers, body) = get(app, "/api/dashboard").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(headers.get(CACHE_CONTROL).unwrap(), CACHE_CONTROL_ERROR);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], 503);
    assert!(json["error"]
        .as_str()
        .unwrap()
        .ends_with("not found. Please upload the file."));
    assert!(json["request_id"].is_string());
}

#[tokio::test]
async fn api_returns_dashboard_model() {
    let dir = tempfile::tempdir().unwrap();
    let (status, headers, body) = get(app_with_dataset(&dir), "/api/dashboard?device=Smartphone").await;

    assert_eq!(status, StatusCode::OK);
    assert!(headers
        .get(CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("application/json"));

    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["total_records"], 5);
    assert_eq!(json["filtered_records"], 3);
    assert_eq!(json["filter"]["device"], "Smartphone");
    assert_eq!(json["options"]["devices"][0], "All");
    assert_eq!(json["metric_cards"].as_array().unwrap().len(), 5);
    assert!(json["health_detail"].is_null());
}

#[tokio::test]
async fn export_downloads_filtered_csv() {
    let dir = tempfile::tempdir().unwrap();
    let (status, headers, body) = get(app_with_dataset(&dir), "/export.csv?gender=Female").await;

    assert_eq!(status, StatusCode::OK);
    assert!(headers
        .get(CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/csv"));
    assert_eq!(
        headers.get(CONTENT_DISPOSITION).unwrap(),
        "attachment; filename=\"filtered_screen_time_data.csv\""
    );

    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].ends_with(",Risk_Category"));
    assert!(lines[1].starts_with("10,Female,Rural,TV,"));
    assert!(lines[2].ends_with(",Very High Risk"));
}

#[tokio::test]
async fn static_stylesheet_is_served() {
    let dir = tempfile::tempdir().unwrap();
    let (status, headers, body) = get(app_with_dataset(&dir), "/static/css/style.css").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers.get(CACHE_CONTROL).unwrap(), CACHE_CONTROL_STATIC);
    assert!(body.contains(".metric-value"));
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let (status, _, _) = get(app_with_dataset(&dir), "/does-not-exist").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
