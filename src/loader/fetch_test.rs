use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use super::*;

/// Serve exactly one HTTP response on a local port and return its URL.
async fn serve_once(status_line: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 1024];
        let read = socket.read(&mut buf).await.unwrap();
        assert!(read > 0);
        let response = format!(
            "HTTP/1.1 {status_line}\r\ncontent-type: image/svg+xml\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
    });
    format!("http://{addr}/mask.svg")
}

fn fetcher() -> HttpFetcher {
    HttpFetcher::new(&RuntimeConfig::default()).unwrap()
}

#[tokio::test]
async fn fetch_returns_body_on_success() {
    let url = serve_once("200 OK", "<svg><path d=\"M0 0 L1 0 L1 1 Z\"/></svg>").await;
    let body = fetcher().fetch_text(&url).await.unwrap();
    assert!(body.starts_with("<svg>"));
}

#[tokio::test]
async fn fetch_non_success_status_is_fetch_failed() {
    let url = serve_once("404 Not Found", "").await;
    let err = fetcher().fetch_text(&url).await.unwrap_err();
    assert!(matches!(err, MaskError::FetchFailed { status: 404 }));
}

#[tokio::test]
async fn fetch_connection_refused_is_request_error() {
    // Bind then drop to get a port with nothing listening.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = fetcher().fetch_text(&format!("http://{addr}/x.svg")).await.unwrap_err();
    assert!(matches!(err, MaskError::FetchRequest(_)));
}

#[tokio::test]
async fn fetch_invalid_url_is_request_error() {
    let err = fetcher().fetch_text("not a url").await.unwrap_err();
    assert!(matches!(err, MaskError::FetchRequest(_)));
}
