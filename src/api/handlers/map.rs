use axum::body::StreamBody;
use axum::extract::Json;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use serde_json::json;
use tokio_util::io::ReaderStream;

use crate::pipeline;

pub async fn show() -> impl IntoResponse {
    let path = pipeline::artifact_path();

    match tokio::fs::File::open(&path).await {
        Ok(file) => (
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            StreamBody::new(ReaderStream::new(file)),
        )
            .into_response(),
        Err(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "status": "error",
                "message": "map has not been generated yet",
            })),
        )
            .into_response(),
    }
}

#[test]
fn serves_artifact_only_after_it_exists() {
    use tokio_test::block_on;

    let path = std::env::temp_dir().join("maizuru_nav_map_handler_test.html");
    let _ = std::fs::remove_file(&path);
    std::env::set_var("MAP_ARTIFACT_PATH", &path);

    let missing = block_on(show()).into_response();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    std::fs::write(&path, "<html></html>").unwrap();
    let found = block_on(show()).into_response();
    assert_eq!(found.status(), StatusCode::OK);

    std::env::remove_var("MAP_ARTIFACT_PATH");
    let _ = std::fs::remove_file(&path);
}
