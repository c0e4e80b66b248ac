//! HTTP adapter for the bundle service

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::{HeaderMap, Method, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use percent_encoding::percent_decode_str;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use toolshelf_core::service::{BundleRequest, BundleService, ServiceConfig};
use toolshelf_core::ToolshelfLayout;

/// Every path goes through the service's own router
pub fn router(service: Arc<BundleService>) -> Router {
    Router::new()
        .fallback(dispatch)
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

async fn dispatch(
    State(service): State<Arc<BundleService>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let request = BundleRequest {
        method,
        path: request_path(&uri),
        headers,
    };

    // Bundles are built with blocking filesystem I/O
    let handled = tokio::task::spawn_blocking(move || service.handle(&request)).await;
    match handled {
        Ok(response) => (response.status, response.headers, response.body).into_response(),
        Err(e) => {
            error!("Bundle handler failed: {}", e);
            (
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
            )
                .into_response()
        }
    }
}

/// Percent-decoded request path, without the query string
fn request_path(uri: &Uri) -> String {
    percent_decode_str(uri.path())
        .decode_utf8_lossy()
        .into_owned()
}

pub async fn run(layout: ToolshelfLayout, bind: SocketAddr) -> Result<()> {
    let root = layout.root.clone();
    let service = Arc::new(BundleService::new(layout, ServiceConfig::from_env()));
    info!(
        "Serving {} (bundle limit {} bytes)",
        root.display(),
        service.config().max_bundle_bytes
    );

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {bind}"))?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use std::fs;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn sample_router() -> (TempDir, Router) {
        let temp = TempDir::new().unwrap();
        let toolkit = temp.path().join("toolkits/sample-toolkit");
        fs::create_dir_all(&toolkit).unwrap();
        fs::write(toolkit.join("toolkit.json"), r#"{"slug": "sample-toolkit"}"#).unwrap();

        let service = BundleService::new(
            ToolshelfLayout::from_root(temp.path()),
            ServiceConfig::default(),
        );
        (temp, router(Arc::new(service)))
    }

    async fn send(app: Router, method: &str, uri: &str) -> (StatusCode, Vec<u8>) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    #[test]
    fn test_request_path_is_decoded() {
        let uri: Uri = "/toolkits/sample%2Dtoolkit/bundle%2Ezip?x=1".parse().unwrap();
        assert_eq!(request_path(&uri), "/toolkits/sample-toolkit/bundle.zip");
    }

    #[tokio::test]
    async fn test_encoded_bundle_path_is_served() {
        let (_temp, app) = sample_router();
        let (status, body) = send(app, "GET", "/toolkits/sample%2Dtoolkit/bundle.zip").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.starts_with(b"PK"));
    }

    #[tokio::test]
    async fn test_unknown_route_and_method() {
        let (_temp, app) = sample_router();
        let (status, body) = send(app.clone(), "GET", "/toolkits/ghost/bundle.zip").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, b"Toolkit not found");

        let (status, _) = send(app, "DELETE", "/toolkits/sample-toolkit/bundle.zip").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }
}
