#![allow(dead_code)]

use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use bytes::Bytes;
use futures::stream::{self, BoxStream};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use meeting_summarizer::application::ports::{
    LlmClient, LlmClientError, StagingStore, StagingStoreError, TranscriptRequest,
    TranscriptionService, TranscriptionServiceError,
};
use meeting_summarizer::application::services::{
    AudioProcessingService, IngressHandler, PollPolicy, SummarizationService,
    TranscriptionOrchestrator,
};
use meeting_summarizer::domain::{ApiKey, StoragePath, TranscriptId, TranscriptionJob};
use meeting_summarizer::infrastructure::storage::ObjectStagingStore;
use meeting_summarizer::presentation::{AppState, create_router};

pub const TEST_TRANSCRIPT_ID: &str = "tx-123";
pub const TEST_UPLOAD_URL: &str = "https://cdn.assemblyai.test/upload/abc";

pub fn job_payload(status: &str) -> Value {
    json!({ "id": TEST_TRANSCRIPT_ID, "status": status })
}

pub fn completed_payload() -> Value {
    json!({
        "id": TEST_TRANSCRIPT_ID,
        "status": "completed",
        "summary": "- Budget approved\n- Launch moved to May",
        "iab_categories_result": {
            "status": "success",
            "summary": { "Business>Budget": 0.92, "Technology": 0.41 }
        },
        "utterances": [
            { "speaker": "A", "text": "Let's review the budget.", "start": 0, "end": 1800 },
            { "speaker": "B", "text": "It was approved yesterday.", "start": 1900, "end": 3500 }
        ]
    })
}

pub fn error_payload() -> Value {
    json!({
        "id": TEST_TRANSCRIPT_ID,
        "status": "error",
        "error": "Download error, unable to download audio"
    })
}

pub fn fast_policy() -> PollPolicy {
    PollPolicy {
        initial_interval: Duration::from_millis(1),
        max_interval: Duration::from_millis(4),
        backoff_factor: 2.0,
        max_attempts: 10,
        timeout: Duration::from_secs(5),
    }
}

pub fn test_key() -> Option<ApiKey> {
    Some(ApiKey::new("test-key"))
}

/// Transcription service answering from a script and counting every call.
pub struct ScriptedTranscriptionService {
    created: Value,
    polls: Mutex<VecDeque<Value>>,
    stall: bool,
    fail_create: bool,
    pub upload_calls: AtomicUsize,
    pub create_calls: AtomicUsize,
    pub poll_calls: AtomicUsize,
    pub uploaded: Mutex<Vec<Vec<u8>>>,
    pub requests: Mutex<Vec<TranscriptRequest>>,
}

impl ScriptedTranscriptionService {
    pub fn new(created: Value, polls: Vec<Value>) -> Self {
        Self {
            created,
            polls: Mutex::new(polls.into()),
            stall: false,
            fail_create: false,
            upload_calls: AtomicUsize::new(0),
            create_calls: AtomicUsize::new(0),
            poll_calls: AtomicUsize::new(0),
            uploaded: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Every poll reports `processing`.
    pub fn stalled() -> Self {
        let mut service = Self::new(job_payload("queued"), vec![]);
        service.stall = true;
        service
    }

    pub fn failing_create() -> Self {
        let mut service = Self::new(job_payload("queued"), vec![]);
        service.fail_create = true;
        service
    }

    pub fn total_calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
            + self.create_calls.load(Ordering::SeqCst)
            + self.poll_calls.load(Ordering::SeqCst)
    }

    pub fn polls(&self) -> usize {
        self.poll_calls.load(Ordering::SeqCst)
    }

    pub fn remaining_polls(&self) -> usize {
        self.polls.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<TranscriptRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait::async_trait]
impl TranscriptionService for ScriptedTranscriptionService {
    async fn upload(
        &self,
        _api_key: &ApiKey,
        audio: Vec<u8>,
    ) -> Result<String, TranscriptionServiceError> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        self.uploaded.lock().unwrap().push(audio);
        Ok(TEST_UPLOAD_URL.to_string())
    }

    async fn create_transcript(
        &self,
        _api_key: &ApiKey,
        request: &TranscriptRequest,
    ) -> Result<TranscriptionJob, TranscriptionServiceError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        if self.fail_create {
            return Err(TranscriptionServiceError::Status {
                status: 401,
                body: "Invalid API key".to_string(),
            });
        }
        TranscriptionJob::from_payload(self.created.clone())
            .map_err(|e| TranscriptionServiceError::InvalidResponse(e.to_string()))
    }

    async fn get_transcript(
        &self,
        _api_key: &ApiKey,
        _id: &TranscriptId,
    ) -> Result<TranscriptionJob, TranscriptionServiceError> {
        self.poll_calls.fetch_add(1, Ordering::SeqCst);
        if self.stall {
            return TranscriptionJob::from_payload(job_payload("processing"))
                .map_err(|e| TranscriptionServiceError::InvalidResponse(e.to_string()));
        }
        let next = self.polls.lock().unwrap().pop_front().ok_or_else(|| {
            TranscriptionServiceError::ApiRequestFailed("no scripted poll response".to_string())
        })?;
        TranscriptionJob::from_payload(next)
            .map_err(|e| TranscriptionServiceError::InvalidResponse(e.to_string()))
    }
}

/// In-memory staging store that records stored paths and counts deletes.
pub struct CountingStagingStore {
    inner: ObjectStagingStore,
    pub stored: Mutex<Vec<StoragePath>>,
    pub delete_calls: AtomicUsize,
}

impl CountingStagingStore {
    pub fn new() -> Self {
        Self {
            inner: ObjectStagingStore::in_memory(),
            stored: Mutex::new(Vec::new()),
            delete_calls: AtomicUsize::new(0),
        }
    }

    pub fn deletes(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    pub fn stored_paths(&self) -> Vec<StoragePath> {
        self.stored.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl StagingStore for CountingStagingStore {
    async fn store(
        &self,
        path: &StoragePath,
        stream: BoxStream<'_, Result<Bytes, io::Error>>,
    ) -> Result<u64, StagingStoreError> {
        self.stored.lock().unwrap().push(path.clone());
        self.inner.store(path, stream).await
    }

    async fn fetch(&self, path: &StoragePath) -> Result<Vec<u8>, StagingStoreError> {
        self.inner.fetch(path).await
    }

    async fn delete(&self, path: &StoragePath) -> Result<(), StagingStoreError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(path).await
    }

    async fn exists(&self, path: &StoragePath) -> Result<bool, StagingStoreError> {
        self.inner.exists(path).await
    }
}

pub fn byte_stream(chunks: &[&'static str]) -> BoxStream<'static, Result<Bytes, io::Error>> {
    let chunks: Vec<Result<Bytes, io::Error>> = chunks
        .iter()
        .map(|c| Ok(Bytes::from_static(c.as_bytes())))
        .collect();
    Box::pin(stream::iter(chunks))
}

pub enum FakeReply {
    Text(Option<String>),
    Fail,
}

pub struct FakeLlmClient {
    reply: FakeReply,
    pub calls: AtomicUsize,
    pub prompts: Mutex<Vec<String>>,
}

impl FakeLlmClient {
    pub fn new(reply: FakeReply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(text: &str) -> Self {
        Self::new(FakeReply::Text(Some(text.to_string())))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl LlmClient for FakeLlmClient {
    async fn generate(
        &self,
        _api_key: &ApiKey,
        prompt: &str,
    ) -> Result<Option<String>, LlmClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            FakeReply::Text(text) => Ok(text.clone()),
            FakeReply::Fail => Err(LlmClientError::ApiRequestFailed(
                "status 503 Service Unavailable: overloaded".to_string(),
            )),
        }
    }
}

pub struct TestApp {
    pub router: Router,
    pub service: Arc<ScriptedTranscriptionService>,
    pub store: Arc<CountingStagingStore>,
    pub llm: Arc<FakeLlmClient>,
    pub shutdown: CancellationToken,
}

pub fn create_test_app(
    service: ScriptedTranscriptionService,
    llm: FakeLlmClient,
    assemblyai_key: Option<ApiKey>,
    gemini_key: Option<ApiKey>,
) -> TestApp {
    let service = Arc::new(service);
    let store = Arc::new(CountingStagingStore::new());
    let llm = Arc::new(llm);

    let orchestrator = TranscriptionOrchestrator::new(
        service.clone(),
        store.clone(),
        assemblyai_key,
        fast_policy(),
    );
    let ingress = Arc::new(IngressHandler::new(store.clone()));
    let audio_processing = Arc::new(AudioProcessingService::new(ingress, orchestrator));
    let summarization = Arc::new(SummarizationService::new(llm.clone(), gemini_key));

    let shutdown = CancellationToken::new();
    let state = AppState {
        audio_processing,
        summarization,
        shutdown: shutdown.clone(),
        max_upload_bytes: 1024 * 1024,
    };

    TestApp {
        router: create_router(state),
        service,
        store,
        llm,
        shutdown,
    }
}

pub const BOUNDARY: &str = "test-boundary-7d1f";

/// A multipart/form-data body. Each part is (name, filename, content).
pub fn multipart_body(parts: &[(&str, Option<&str>, &str)]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, filename, content) in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match filename {
            Some(f) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                        name, f
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(b"Content-Type: audio/mpeg\r\n\r\n");
            }
            None => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                        .as_bytes(),
                );
            }
        }
        body.extend_from_slice(content.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}

pub async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Serves `app` on an ephemeral local port and returns its base URL.
pub async fn start_mock_server(app: Router) -> (String, oneshot::Sender<()>) {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}", addr);

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .ok();
    });

    (base_url, shutdown_tx)
}
