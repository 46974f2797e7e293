//! HTTP surface: HTML pages and the JSON API over a shared [`Registry`].
//!
//! Store operations are synchronous (a list mutex plus a locked file write),
//! so handlers run them on tokio's blocking pool through
//! [`AppState::with_list`].

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::error::{Error, JsonError, Result};
use crate::registry::Registry;
use crate::store::ListStore;
use render::PageRenderer;

mod api;
mod pages;
pub mod render;

/// State shared with every handler
#[derive(Clone)]
pub struct AppState {
    registry: Arc<Registry>,
    renderer: Arc<PageRenderer>,
}

impl AppState {
    /// Run `f` against the resolved list on the blocking pool
    pub(crate) async fn with_list<T, F>(&self, requested: Option<String>, f: F) -> Result<T>
    where
        F: FnOnce(&mut ListStore) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let registry = Arc::clone(&self.registry);
        tokio::task::spawn_blocking(move || registry.with_list(requested.as_deref(), f))
            .await
            .map_err(|err| Error::OperationFailed(format!("list task failed: {err}")))?
    }
}

/// `?list=` on any route
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListQuery {
    pub list: Option<String>,
}

/// Build the full router
///
/// Fails only if the page template does not parse.
pub fn router(registry: Arc<Registry>) -> Result<Router> {
    let state = AppState {
        registry,
        renderer: Arc::new(PageRenderer::new()?),
    };
    let router = Router::new()
        .route("/", get(pages::index))
        .route("/add", post(pages::add))
        .route("/toggle/:id", post(pages::toggle))
        .route("/update/:id", post(pages::update))
        .route("/delete/:id", post(pages::delete))
        .route("/api/lists", get(api::lists))
        .route("/api/todos", get(api::list_todos).post(api::create_todo))
        .route(
            "/api/todos/:id",
            get(api::get_todo)
                .patch(api::update_todo)
                .delete(api::delete_todo),
        )
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state);
    Ok(router)
}

/// Bind `host:port`, moving on to the next port while ports are in use
///
/// Tries at most `attempts` consecutive ports.
pub async fn bind_with_fallback(host: &str, port: u16, attempts: u16) -> Result<TcpListener> {
    for offset in 0..attempts.max(1) {
        let Some(candidate) = port.checked_add(offset) else {
            break;
        };
        match TcpListener::bind((host, candidate)).await {
            Ok(listener) => {
                if offset > 0 {
                    tracing::warn!(requested = port, bound = candidate, "requested port busy, fell back");
                }
                return Ok(listener);
            }
            Err(err) if err.kind() == std::io::ErrorKind::AddrInUse => {
                tracing::debug!(port = candidate, "port in use");
            }
            Err(err) => return Err(Error::Io(err)),
        }
    }

    Err(Error::OperationFailed(format!(
        "no free port in {port}..{} on {host}",
        port.saturating_add(attempts.max(1) - 1)
    )))
}

/// Serve until Ctrl-C
pub async fn serve(registry: Arc<Registry>, listener: TcpListener) -> Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "todo-board listening");

    axum::serve(listener, router(registry)?)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("todo-board stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

async fn health_check() -> &'static str {
    "OK"
}

/// An [`Error`] rendered as an HTTP response with a JSON error body
#[derive(Debug)]
pub struct HttpError(pub Error);

impl From<Error> for HttpError {
    fn from(err: Error) -> Self {
        HttpError(err)
    }
}

impl HttpError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            Error::TitleRequired | Error::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            Error::TodoNotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        (status, Json(JsonError::from(&self.0))).into_response()
    }
}
