//! HTTP front end for the request handler.
//!
//! There is no routing: every method and path renders the same page.

use axum::extract::State;
use axum::http::{header, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use domain_expiry_lib::{DomainExpiryError, PageRequest, RequestHandler};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Build the router. The handler is the fallback, so it sees every request.
pub fn router(handler: Arc<RequestHandler>) -> Router {
    Router::new().fallback(status_page).with_state(handler)
}

async fn status_page(
    State(handler): State<Arc<RequestHandler>>,
    method: Method,
    uri: Uri,
) -> Response {
    let page = handler
        .handle(&PageRequest::new(method.as_str(), uri.path()))
        .await;

    (StatusCode::OK, [(header::CONTENT_TYPE, page.content_type)], page.body).into_response()
}

/// Serve on `bind` until Ctrl-C.
pub async fn serve(handler: Arc<RequestHandler>, bind: &str) -> Result<(), DomainExpiryError> {
    let listener = TcpListener::bind(bind).await.map_err(|e| {
        DomainExpiryError::network_with_source(format!("Failed to bind {}", bind), e.to_string())
    })?;

    let config = handler.config();
    info!(
        address = %listener.local_addr()?,
        api = %config.api_base_url,
        lookup_timeout = ?config.lookup_timeout,
        "serving domain expiry page"
    );

    axum::serve(listener, router(handler))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    // If the signal handler cannot be installed, run until killed
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_expiry_lib::HandlerConfig;

    async fn spawn_server(config: HandlerConfig) -> String {
        let handler = Arc::new(RequestHandler::new(config).unwrap());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(handler)).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_every_method_and_path_gets_the_page() {
        let base = spawn_server(HandlerConfig::default()).await;
        let client = reqwest::Client::new();

        for (method, path) in [
            (reqwest::Method::GET, "/"),
            (reqwest::Method::POST, "/submit"),
            (reqwest::Method::PUT, "/some/deep/path?x=1"),
        ] {
            let response = client
                .request(method, format!("{}{}", base, path))
                .send()
                .await
                .unwrap();

            assert_eq!(response.status(), reqwest::StatusCode::OK);
            assert_eq!(
                response.headers().get("content-type").unwrap(),
                "text/html; charset=UTF-8"
            );
            let body = response.text().await.unwrap();
            assert!(body.contains("DOMAIN_NAMES is not set"));
        }
    }

    #[tokio::test]
    async fn test_unreachable_api_still_renders_rows() {
        // Nothing listens on the discard port, so every lookup fails
        let config = HandlerConfig::default()
            .with_domain_names("a.com,b.com")
            .with_api_base_url("http://127.0.0.1:9/");
        let base = spawn_server(config).await;

        let body = reqwest::get(format!("{}/", base))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();

        assert!(body.contains("<td>a.com</td>"));
        assert!(body.contains("<td>b.com</td>"));
        assert_eq!(body.matches("<td>--</td>").count(), 6);
    }
}
