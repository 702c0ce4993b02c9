//! Runs the `gallery` binary against a local server and checks exit codes
//! and the written page.

use std::path::Path;
use std::process::{Command, Output};

use axum::http::{header, StatusCode};
use axum::routing::get;
use axum::Router;

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server stopped");
    });
    format!("http://{}", addr)
}

async fn run_render(base_url: String, output: &Path) -> Output {
    let output = output.to_path_buf();
    tokio::task::spawn_blocking(move || {
        Command::new(env!("CARGO_BIN_EXE_gallery"))
            .args(["--server", base_url.as_str(), "--timeout", "5", "render", "--output"])
            .arg(&output)
            .output()
            .expect("Failed to run gallery")
    })
    .await
    .expect("gallery task panicked")
}

#[tokio::test(flavor = "multi_thread")]
async fn test_render_exits_one_and_writes_error_page_on_server_error() {
    let app = Router::new().route(
        "/list",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let base_url = serve(app).await;
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let page = dir.path().join("gallery.html");

    let output = run_render(base_url, &page).await;

    assert_eq!(output.status.code(), Some(1));
    let written = std::fs::read_to_string(&page).expect("page was not written");
    assert!(written.contains(r#"<div class="error">"#));
    assert!(written.contains("500"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_render_exits_zero_on_empty_gallery() {
    let app = Router::new().route(
        "/list",
        get(|| async { ([(header::CONTENT_TYPE, "application/json")], "[]") }),
    );
    let base_url = serve(app).await;
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let page = dir.path().join("gallery.html");

    let output = run_render(base_url, &page).await;

    assert_eq!(output.status.code(), Some(0));
    let written = std::fs::read_to_string(&page).expect("page was not written");
    assert!(written.contains(r#"<div class="empty-gallery">"#));
}
