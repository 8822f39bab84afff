//! HTTP surface for the chatbot.
//!
//! ## Endpoints
//!
//! - `POST /predict` : classify text and return a supportive reply
//! - `GET /` : front-end page (`index.html` from the static directory)
//! - `GET /favicon.ico` : favicon from the static directory

use axum::Router;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::post;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeFile;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use uuid::Uuid;

use crate::classifier::ClassificationError;
use crate::config::{ServerConfig, WebConfig};
use crate::error::{BotError, Result};
use crate::pipeline::ChatPipeline;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// `POST /predict` request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictRequest {
    /// Free text from the user. Absent or `null` is treated as empty.
    #[serde(default)]
    pub text: Option<String>,
}

/// Fixed message for `/predict` bodies that are not a JSON object with a
/// string `text` field.
pub const INVALID_REQUEST_MESSAGE: &str =
    "Invalid request. Please send a JSON object with a \"text\" string.";

/// Error body for failed `/predict` calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Fixed, client-safe error message.
    pub error: String,
}

impl IntoResponse for ClassificationError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Shared state for axum handlers.
#[derive(Clone)]
struct AppState {
    pipeline: Arc<ChatPipeline>,
}

/// Build the application router.
///
/// Static routes are mounted only when `web.enabled`.
pub fn router(pipeline: Arc<ChatPipeline>, web: &WebConfig) -> Router {
    let mut app = Router::new()
        .route("/predict", post(handle_predict))
        .with_state(AppState { pipeline });

    if web.enabled {
        app = app
            .route_service("/", ServeFile::new(web.static_dir.join("index.html")))
            .route_service(
                "/favicon.ico",
                ServeFile::new(web.static_dir.join("favicon.ico")),
            );
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    app.layer(TraceLayer::new_for_http()).layer(cors)
}

// ---------------------------------------------------------------------------
// ChatServer
// ---------------------------------------------------------------------------

/// The `/predict` service running on a background task.
///
/// [`ChatServer::shutdown`] stops accepting connections and lets in-flight
/// predictions finish; dropping the server aborts it instead.
pub struct ChatServer {
    addr: SocketAddr,
    stop_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl ChatServer {
    /// Bind the listener from `config` and start answering requests.
    ///
    /// Port `0` picks a free port; read it back with [`ChatServer::addr`].
    ///
    /// # Errors
    ///
    /// Returns [`BotError::Server`] if the address cannot be bound.
    pub async fn start(
        pipeline: Arc<ChatPipeline>,
        config: &ServerConfig,
        web: &WebConfig,
    ) -> Result<Self> {
        let model_loaded = pipeline.is_model_loaded();
        let faq_entries = pipeline.faq().len();
        let app = router(pipeline, web);

        let bind_addr = format!("{}:{}", config.host, config.port);
        let listener = TcpListener::bind(&bind_addr)
            .await
            .map_err(|e| BotError::Server(format!("cannot listen on {bind_addr}: {e}")))?;
        let addr = listener
            .local_addr()
            .map_err(|e| BotError::Server(format!("listener on {bind_addr} has no address: {e}")))?;

        if !model_loaded {
            warn!(%addr, "serving in degraded mode: every /predict call will return 500");
        }
        info!(%addr, model_loaded, faq_entries, "accepting /predict requests");

        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let stopped = async {
                // A dropped sender also stops the server.
                let _ = stop_rx.await;
            };
            if let Err(e) = axum::serve(listener, app)
                .with_graceful_shutdown(stopped)
                .await
            {
                tracing::error!(error = %e, "chat server stopped unexpectedly");
            }
        });

        Ok(Self {
            addr,
            stop_tx: Some(stop_tx),
            task: Some(task),
        })
    }

    /// Local address the listener is bound to.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stop accepting connections and wait for in-flight requests.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::Server`] if the server task panicked.
    pub async fn shutdown(mut self) -> Result<()> {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        if let Some(task) = self.task.take() {
            task.await
                .map_err(|e| BotError::Server(format!("chat server task failed: {e}")))?;
        }
        info!(addr = %self.addr, "chat server stopped");
        Ok(())
    }
}

impl Drop for ChatServer {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// `POST /predict` : run the decision pipeline on the request text.
///
/// The model gate runs before the body is inspected, so a service without a
/// model answers every call with the model-unavailable error. A body that is
/// not a JSON object with a string (or absent) `text` gets a fixed
/// [`INVALID_REQUEST_MESSAGE`]; extractor detail is only logged.
async fn handle_predict(
    State(state): State<AppState>,
    payload: std::result::Result<Json<PredictRequest>, JsonRejection>,
) -> Response {
    let request_id = Uuid::new_v4();

    if !state.pipeline.is_model_loaded() {
        warn!(%request_id, "predict refused: model not loaded");
        return ClassificationError::ModelUnavailable.into_response();
    }

    let text = match payload {
        Ok(Json(request)) => request.text.unwrap_or_default(),
        Err(rejection) => {
            warn!(
                %request_id,
                status = rejection.status().as_u16(),
                error = %rejection.body_text(),
                "predict body rejected"
            );
            return invalid_request();
        }
    };

    match state.pipeline.respond(&text).await {
        Ok(decision) => {
            info!(
                %request_id,
                route = decision.route.as_str(),
                emotion = %decision.reply.emotion,
                "predict answered"
            );
            (StatusCode::OK, Json(decision.reply)).into_response()
        }
        Err(e) => {
            warn!(%request_id, error = %e, "predict failed");
            e.into_response()
        }
    }
}

fn invalid_request() -> Response {
    let body = ErrorResponse {
        error: INVALID_REQUEST_MESSAGE.to_owned(),
    };
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use crate::faq::FaqTable;

    #[test]
    fn predict_request_text_defaults_to_none() {
        let req: PredictRequest = serde_json::from_str("{}").unwrap();
        assert!(req.text.is_none());
        let req: PredictRequest = serde_json::from_str(r#"{"text":null}"#).unwrap();
        assert!(req.text.is_none());
    }

    #[test]
    fn predict_request_ignores_unknown_fields() {
        let req: PredictRequest =
            serde_json::from_str(r#"{"text":"hi","session":"abc"}"#).unwrap();
        assert_eq!(req.text.as_deref(), Some("hi"));
    }

    #[test]
    fn classification_error_maps_to_500() {
        let response = ClassificationError::PredictionFailed.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn start_binds_ephemeral_port() {
        let pipeline = Arc::new(ChatPipeline::new(None, FaqTable::default()));
        let config = ServerConfig {
            host: "127.0.0.1".to_owned(),
            port: 0,
        };
        let server = ChatServer::start(pipeline, &config, &WebConfig::default())
            .await
            .unwrap();
        assert_ne!(server.addr().port(), 0);
        assert!(server.addr().ip().is_loopback());
        server.shutdown().await.unwrap();
    }
}
