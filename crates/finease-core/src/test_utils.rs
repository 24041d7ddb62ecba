//! Test utilities for finease-core
//!
//! Axum-based mock servers standing in for the upstream backend and for an
//! OpenAI-compatible chat-completion endpoint. Both bind to an ephemeral port
//! on localhost and shut down when dropped.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Json, Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::Value;
use tokio::sync::oneshot;

use crate::upstream::{CATEGORY_BUDGETS_PATH, EXPENSES_BY_DAY_PATH};

/// A request seen by a mock server
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

type Recorder = Arc<Mutex<Vec<RecordedRequest>>>;

fn record(recorder: &Recorder, request: RecordedRequest) {
    if let Ok(mut seen) = recorder.lock() {
        seen.push(request);
    }
}

fn snapshot(recorder: &Recorder) -> Vec<RecordedRequest> {
    recorder.lock().map(|seen| seen.clone()).unwrap_or_default()
}

/// Handle to a server task that stops on drop
struct ServerHandle {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl ServerHandle {
    async fn spawn(app: Router) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

// =============================================================================
// Upstream backend
// =============================================================================

/// Canned responses for the two upstream endpoints
#[derive(Debug, Clone)]
pub struct UpstreamFixture {
    pub expenses_body: Value,
    pub budgets_body: Value,
    pub expenses_status: u16,
    pub budgets_status: u16,
}

impl UpstreamFixture {
    pub fn new(expenses_body: Value, budgets_body: Value) -> Self {
        Self {
            expenses_body,
            budgets_body,
            expenses_status: 200,
            budgets_status: 200,
        }
    }

    /// Fixture with no expenses and no categories
    pub fn empty() -> Self {
        Self::new(
            serde_json::json!({"success": true, "data": []}),
            serde_json::json!({"success": true, "categories": []}),
        )
    }

    pub fn failing_expenses(mut self, status: u16) -> Self {
        self.expenses_status = status;
        self
    }

    pub fn failing_budgets(mut self, status: u16) -> Self {
        self.budgets_status = status;
        self
    }
}

#[derive(Clone)]
struct UpstreamState {
    fixture: Arc<UpstreamFixture>,
    recorder: Recorder,
}

/// Mock upstream backend
pub struct MockUpstreamServer {
    handle: ServerHandle,
    recorder: Recorder,
}

impl MockUpstreamServer {
    pub async fn start(fixture: UpstreamFixture) -> Self {
        let recorder: Recorder = Arc::default();
        let state = UpstreamState {
            fixture: Arc::new(fixture),
            recorder: recorder.clone(),
        };

        let app = Router::new()
            .route(EXPENSES_BY_DAY_PATH, get(handle_expenses))
            .route(CATEGORY_BUDGETS_PATH, get(handle_budgets))
            .with_state(state);

        Self {
            handle: ServerHandle::spawn(app).await,
            recorder,
        }
    }

    /// Base URL (no trailing slash)
    pub fn url(&self) -> String {
        self.handle.url()
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        snapshot(&self.recorder)
    }
}

fn recorded(request: &Request, body: Option<Value>) -> RecordedRequest {
    RecordedRequest {
        path: request.uri().path().to_string(),
        query: request.uri().query().map(str::to_string),
        authorization: request
            .headers()
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    }
}

fn json_with_status(status: u16, body: &Value) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_success() {
        (status, Json(body.clone())).into_response()
    } else {
        (
            status,
            Json(serde_json::json!({"success": false, "message": "mock failure"})),
        )
            .into_response()
    }
}

async fn handle_expenses(State(state): State<UpstreamState>, request: Request) -> Response {
    record(&state.recorder, recorded(&request, None));
    json_with_status(state.fixture.expenses_status, &state.fixture.expenses_body)
}

async fn handle_budgets(State(state): State<UpstreamState>, request: Request) -> Response {
    record(&state.recorder, recorded(&request, None));
    json_with_status(state.fixture.budgets_status, &state.fixture.budgets_body)
}

// =============================================================================
// Chat completion endpoint
// =============================================================================

/// What the mock chat endpoint replies with
#[derive(Debug, Clone)]
pub enum ChatReply {
    /// A well-formed completion whose first choice has this content
    Content(String),
    /// An arbitrary JSON body with status 200
    RawBody(Value),
    /// An error status
    Status(u16),
    /// Wait this long before replying with the given content
    Delayed(std::time::Duration, String),
}

#[derive(Clone)]
struct ChatState {
    reply: Arc<ChatReply>,
    recorder: Recorder,
}

/// Mock OpenAI-compatible chat-completion server
pub struct MockChatServer {
    handle: ServerHandle,
    recorder: Recorder,
}

impl MockChatServer {
    pub async fn start(reply: ChatReply) -> Self {
        let recorder: Recorder = Arc::default();
        let state = ChatState {
            reply: Arc::new(reply),
            recorder: recorder.clone(),
        };

        let app = Router::new()
            .route("/chat/completions", post(handle_chat))
            .with_state(state);

        Self {
            handle: ServerHandle::spawn(app).await,
            recorder,
        }
    }

    /// Shorthand for a server replying with `content`
    pub async fn replying(content: &str) -> Self {
        Self::start(ChatReply::Content(content.to_string())).await
    }

    /// Base URL, usable as the model endpoint base
    pub fn url(&self) -> String {
        self.handle.url()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        snapshot(&self.recorder)
    }
}

fn completion(content: &str) -> Value {
    serde_json::json!({
        "id": "chatcmpl-mock",
        "object": "chat.completion",
        "model": "mock",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
}

async fn handle_chat(State(state): State<ChatState>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();
    let json = serde_json::from_slice::<Value>(&bytes).ok();
    let head = Request::from_parts(parts, axum::body::Body::empty());
    record(&state.recorder, recorded(&head, json));

    match state.reply.as_ref() {
        ChatReply::Content(content) => Json(completion(content)).into_response(),
        ChatReply::RawBody(body) => Json(body.clone()).into_response(),
        ChatReply::Status(status) => json_with_status(*status, &Value::Null),
        ChatReply::Delayed(wait, content) => {
            tokio::time::sleep(*wait).await;
            Json(completion(content)).into_response()
        }
    }
}
