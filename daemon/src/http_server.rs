use anyhow::{anyhow, Context};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use eightball_core::{
    AnswerSourceRef, BatchDispatcher, DispatchLimits, EightBallConfig, QuestionRequest,
    QuestionResponder, RequestLogRef, ResponseRecord,
};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::net::TcpListener;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

/// Path served by both the single-question and the batch form
pub const ASK_PATH: &str = "/magic8ball/ask";

/// Application state shared with all routes
#[derive(Clone)]
pub struct AppState {
    responder: Arc<QuestionResponder>,
    dispatcher: Arc<BatchDispatcher>,
    request_log: RequestLogRef,
}

impl AppState {
    pub fn new(
        config: &EightBallConfig,
        source: AnswerSourceRef,
        request_log: RequestLogRef,
    ) -> Self {
        let responder = QuestionResponder::new(source);
        let dispatcher =
            BatchDispatcher::new(responder.clone(), DispatchLimits::from_config(config));

        Self {
            responder: Arc::new(responder),
            dispatcher: Arc::new(dispatcher),
            request_log,
        }
    }
}

/// Query string of the single-question form
#[derive(Debug, Deserialize)]
pub struct AskQuery {
    question: String,
}

/// Body returned with client errors
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Error type for HTTP server
#[derive(Debug)]
pub enum ApiError {
    /// The request could not be decoded
    BadRequest { status: StatusCode, message: String },
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::BadRequest { status, message } => {
                warn!(status = %status, error = %message, "Rejected request");
                (status, Json(ErrorResponse { error: message })).into_response()
            }
        }
    }
}

/// Build the router with all routes and middleware
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(ASK_PATH, get(ask_one).post(ask_batch))
        .layer(cors)
        .with_state(state)
}

/// Serve the API on an already bound listener until `shutdown` resolves
pub async fn run_server<F>(
    listener: TcpListener,
    state: AppState,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener
        .local_addr()
        .context("Failed to read listener address")?;
    listener
        .set_nonblocking(true)
        .context("Failed to switch listener to non-blocking mode")?;

    info!("Starting HTTP server on {}", addr);

    axum::Server::from_tcp(listener)
        .map_err(|e| anyhow!("Failed to start HTTP server: {}", e))?
        .serve(router(state).into_make_service())
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| anyhow!("HTTP server failed: {}", e))
}

/// GET /magic8ball/ask?question=... - answer one question inline
async fn ask_one(
    State(state): State<AppState>,
    query: Result<Query<AskQuery>, QueryRejection>,
) -> Result<Json<ResponseRecord>, ApiError> {
    let Query(AskQuery { question }) = query?;
    let span = info_span!("ask", request_id = %Uuid::new_v4(), method = "GET");

    let record = span.in_scope(|| {
        state.request_log.record(&format!(
            "Request received via HTTP GET URL: {} and question: {}",
            ASK_PATH, question
        ));
        let started = Instant::now();

        let record = state.responder.answer(1, &question);

        state.request_log.record(&format!(
            "Request completed in {} milliseconds",
            started.elapsed().as_millis()
        ));
        record
    });

    Ok(Json(record))
}

/// POST /magic8ball/ask - answer a batch of questions concurrently
async fn ask_batch(
    State(state): State<AppState>,
    payload: Result<Json<QuestionRequest>, JsonRejection>,
) -> Result<Json<Vec<ResponseRecord>>, ApiError> {
    let Json(request) = payload?;
    let span = info_span!("ask", request_id = %Uuid::new_v4(), method = "POST");

    async move {
        state.request_log.record(&format!(
            "Request received via HTTP POST URL: {} with {} questions",
            ASK_PATH,
            request.questions.len()
        ));
        let started = Instant::now();

        let records = state.dispatcher.dispatch(request.questions).await;

        state.request_log.record(&format!(
            "Request completed in {} milliseconds",
            started.elapsed().as_millis()
        ));
        Ok(Json(records))
    }
    .instrument(span)
    .await
}
