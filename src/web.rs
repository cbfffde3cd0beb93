#[cfg(feature = "tls")]
use std::future::Future;
use std::net::SocketAddr;
#[cfg(feature = "tls")]
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{Router, response::Html, routing::get};
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::api::{self, AppState};
use crate::config::ServerConfig;

const INDEX_HTML: &str = include_str!("../assets/index.html");

/// The API carries no request bodies; anything larger is refused
const MAX_BODY_BYTES: usize = 16 * 1024;

/// How long open HTTPS connections may drain after a shutdown signal
#[cfg(feature = "tls")]
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Router serving the directory page and the JSON API
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .nest("/api", api::router())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Serve until ctrl-c, over HTTPS when TLS is configured
pub async fn run(server: &ServerConfig, state: AppState) -> Result<()> {
    let app = app(state);
    let addr = format!("{}:{}", server.host, server.port);

    if let Some(tls) = &server.tls {
        #[cfg(feature = "tls")]
        {
            let socket: SocketAddr = addr
                .parse()
                .with_context(|| format!("Invalid listen address {addr}"))?;
            let rustls = axum_server::tls_rustls::RustlsConfig::from_pem_file(
                &tls.cert_path,
                &tls.key_path,
            )
            .await
            .with_context(|| "Failed to load TLS certificate or key")?;
            tracing::info!("Web server running at https://{}", socket);
            axum_server::bind_rustls(socket, rustls)
                .handle(shutdown_handle(shutdown_signal()))
                .serve(app.into_make_service())
                .await
                .with_context(|| "HTTPS server failed")?;
            return Ok(());
        }
        #[cfg(not(feature = "tls"))]
        tracing::warn!(
            "TLS configured ({}) but built without the `tls` feature; serving plain HTTP",
            tls.cert_path.display()
        );
    }

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    let local: SocketAddr = listener.local_addr()?;
    tracing::info!("Web server running at http://{}", local);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .with_context(|| "HTTP server failed")?;
    Ok(())
}

/// Handle that starts a graceful shutdown once `signal` resolves
#[cfg(feature = "tls")]
fn shutdown_handle<F>(signal: F) -> axum_server::Handle
where
    F: Future<Output = ()> + Send + 'static,
{
    let handle = axum_server::Handle::new();
    let trigger = handle.clone();
    tokio::spawn(async move {
        signal.await;
        trigger.graceful_shutdown(Some(SHUTDOWN_GRACE));
    });
    handle
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down web server");
}
