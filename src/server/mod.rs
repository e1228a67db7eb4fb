//! API server
//!
//! Serves the resolver over HTTP on a Unix domain socket. Each route calls
//! exactly one resolver operation; the server adds nothing but JSON encoding
//! and request logging.

mod error;

pub use error::ErrorBody;

use anyhow::{bail, Context, Result};
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use std::future::Future;
use std::os::unix::fs::FileTypeExt;
use std::os::unix::net::UnixStream as StdUnixStream;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::UnixListener;
use tracing::{info, warn};

use crate::k8s::ClusterProbe;
use crate::models::{ActionResponse, Gateway, GatewayInstallationStatus, Route};
use crate::resolver::{ResolverError, StateResolver};

type Shared<P> = State<Arc<StateResolver<P>>>;
type ApiResult<T> = std::result::Result<Json<T>, ResolverError>;

/// Build the `/api` router
pub fn router<P: ClusterProbe + 'static>(resolver: Arc<StateResolver<P>>) -> Router {
    Router::new()
        .route("/api/status", get(status::<P>))
        .route("/api/gateways", get(gateways::<P>))
        .route("/api/routes", get(routes::<P>))
        .route("/api/install", post(install::<P>))
        .route("/api/deploy-sample", post(deploy_sample::<P>))
        .fallback(not_found)
        .layer(middleware::from_fn(log_request))
        .with_state(resolver)
}

/// Serve until SIGINT or SIGTERM
pub async fn serve<P: ClusterProbe + 'static>(
    socket_path: &Path,
    resolver: Arc<StateResolver<P>>,
) -> Result<()> {
    serve_with_shutdown(socket_path, resolver, shutdown_signal()).await
}

/// Serve until `shutdown` resolves, then remove the socket file
pub async fn serve_with_shutdown<P, F>(
    socket_path: &Path,
    resolver: Arc<StateResolver<P>>,
    shutdown: F,
) -> Result<()>
where
    P: ClusterProbe + 'static,
    F: Future<Output = ()> + Send + 'static,
{
    prepare_socket_path(socket_path)?;

    let listener = UnixListener::bind(socket_path)
        .with_context(|| format!("Failed to bind socket: {}", socket_path.display()))?;

    info!("Starting server on {}", socket_path.display());

    axum::serve(listener, router(resolver))
        .with_graceful_shutdown(shutdown)
        .await
        .context("API server failed")?;

    info!("Shutting down server");
    if let Err(e) = std::fs::remove_file(socket_path) {
        warn!("Failed to remove socket {}: {}", socket_path.display(), e);
    }

    Ok(())
}

/// Remove a stale socket and make sure the parent directory exists.
///
/// Refuses to touch anything that is not a socket, or a socket that still
/// accepts connections.
fn prepare_socket_path(socket_path: &Path) -> Result<()> {
    if let Ok(metadata) = std::fs::symlink_metadata(socket_path) {
        if !metadata.file_type().is_socket() {
            bail!("Refusing to replace non-socket file: {}", socket_path.display());
        }
        if StdUnixStream::connect(socket_path).is_ok() {
            bail!("Socket is already in use: {}", socket_path.display());
        }

        info!("Removing stale socket {}", socket_path.display());
        std::fs::remove_file(socket_path)
            .with_context(|| format!("Failed to remove stale socket: {}", socket_path.display()))?;
    }

    if let Some(parent) = socket_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for SIGINT: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    info!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "request"
    );

    response
}

async fn status<P: ClusterProbe + 'static>(
    State(resolver): Shared<P>,
) -> ApiResult<GatewayInstallationStatus> {
    Ok(Json(resolver.status().await?))
}

async fn gateways<P: ClusterProbe + 'static>(State(resolver): Shared<P>) -> ApiResult<Vec<Gateway>> {
    Ok(Json(resolver.gateways().await?))
}

async fn routes<P: ClusterProbe + 'static>(State(resolver): Shared<P>) -> ApiResult<Vec<Route>> {
    Ok(Json(resolver.routes().await?))
}

async fn install<P: ClusterProbe + 'static>(State(resolver): Shared<P>) -> ApiResult<ActionResponse> {
    Ok(Json(resolver.install_envoy_gateway().await?))
}

async fn deploy_sample<P: ClusterProbe + 'static>(
    State(resolver): Shared<P>,
) -> ApiResult<ActionResponse> {
    Ok(Json(resolver.deploy_sample().await?))
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(ErrorBody::new("not found")))
}
