//! Throwaway complaint endpoints for exercising the HTTP transport.

use std::{
    sync::{Arc, Mutex as StdMutex},
    time::Duration,
};

use async_trait::async_trait;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use shared::protocol::{HealthResponse, HEALTH_PATH, SUBMIT_COMPLAINT_PATH};
use tokio::{net::TcpListener, sync::Mutex};

use crate::{
    config::Settings, error::TransportError, payload::SubmissionPayload,
    transport::ComplaintTransport,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RecordedPart {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl RecordedPart {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

#[derive(Clone)]
struct ServerState {
    respond_with: StatusCode,
    delay: Option<Duration>,
    submissions: Arc<Mutex<Vec<Vec<RecordedPart>>>>,
}

pub(crate) struct ComplaintServer {
    pub base_url: String,
    submissions: Arc<Mutex<Vec<Vec<RecordedPart>>>>,
}

impl ComplaintServer {
    pub fn settings(&self) -> Settings {
        Settings {
            api_base_url: self.base_url.clone(),
            request_timeout_secs: 5,
            ..Settings::default()
        }
    }

    pub async fn submissions(&self) -> Vec<Vec<RecordedPart>> {
        self.submissions.lock().await.clone()
    }
}

async fn handle_submit(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> StatusCode {
    let mut parts = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.unwrap_or_default();
        parts.push(RecordedPart {
            name,
            file_name,
            content_type,
            bytes,
        });
    }
    state.submissions.lock().await.push(parts);

    if let Some(delay) = state.delay {
        tokio::time::sleep(delay).await;
    }
    state.respond_with
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".into(),
        service: "Rose Villa Complaint System".into(),
    })
}

pub(crate) async fn spawn_complaint_server(
    respond_with: StatusCode,
    delay: Option<Duration>,
) -> anyhow::Result<ComplaintServer> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let submissions = Arc::new(Mutex::new(Vec::new()));
    let state = ServerState {
        respond_with,
        delay,
        submissions: Arc::clone(&submissions),
    };
    let app = Router::new()
        .route(SUBMIT_COMPLAINT_PATH, post(handle_submit))
        .route(HEALTH_PATH, get(handle_health))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(ComplaintServer {
        base_url: format!("http://{addr}"),
        submissions,
    })
}

/// A base url nothing is listening on.
pub(crate) async fn closed_local_url() -> anyhow::Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{addr}"))
}

pub(crate) struct RecordingTransport {
    result: Result<(), TransportError>,
    payloads: StdMutex<Vec<SubmissionPayload>>,
}

impl RecordingTransport {
    pub fn accepting() -> Self {
        Self::with_result(Ok(()))
    }

    pub fn with_result(result: Result<(), TransportError>) -> Self {
        Self {
            result,
            payloads: StdMutex::new(Vec::new()),
        }
    }

    pub fn payloads(&self) -> Vec<SubmissionPayload> {
        self.payloads.lock().expect("lock").clone()
    }
}

#[async_trait]
impl ComplaintTransport for RecordingTransport {
    async fn submit(&self, payload: SubmissionPayload) -> Result<(), TransportError> {
        self.payloads.lock().expect("lock").push(payload);
        self.result.clone()
    }
}
