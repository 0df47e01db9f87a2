use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use meeting_summarizer::application::ports::{LlmClient, StagingStore, TranscriptionService};
use meeting_summarizer::application::services::{
    AudioProcessingService, IngressHandler, SummarizationService, TranscriptionOrchestrator,
};
use meeting_summarizer::domain::ApiKey;
use meeting_summarizer::infrastructure::llm::GeminiClient;
use meeting_summarizer::infrastructure::observability::{TracingConfig, init_tracing};
use meeting_summarizer::infrastructure::storage::ObjectStagingStore;
use meeting_summarizer::infrastructure::transcription::AssemblyAiClient;
use meeting_summarizer::presentation::{AppState, Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment).context("Failed to load settings")?;

    init_tracing(&TracingConfig::from_settings(environment, &settings.logging));

    // Credentials are checked per request; a missing key is only reported here.
    let assemblyai_key = ApiKey::from_optional(settings.assemblyai.api_key.as_deref());
    if assemblyai_key.is_none() {
        tracing::warn!("AssemblyAI API key not configured, transcription requests will fail");
    }
    let gemini_key = ApiKey::from_optional(settings.gemini.api_key.as_deref());
    if gemini_key.is_none() {
        tracing::warn!("Gemini API key not configured, summarization requests will fail");
    }

    let staging_store: Arc<dyn StagingStore> = Arc::new(
        ObjectStagingStore::local(PathBuf::from(&settings.staging.local_path))
            .context("Failed to prepare staging directory")?,
    );

    let transcription_service: Arc<dyn TranscriptionService> = Arc::new(AssemblyAiClient::new(
        &settings.assemblyai.base_url,
        Duration::from_secs(settings.assemblyai.request_timeout_secs),
    )?);

    let orchestrator = TranscriptionOrchestrator::new(
        transcription_service,
        Arc::clone(&staging_store),
        assemblyai_key,
        settings.assemblyai.polling.to_policy(),
    );
    let ingress = Arc::new(IngressHandler::new(staging_store));
    let audio_processing = Arc::new(AudioProcessingService::new(ingress, orchestrator));

    let llm_client: Arc<dyn LlmClient> = Arc::new(GeminiClient::new(
        &settings.gemini.base_url,
        &settings.gemini.model,
        Duration::from_secs(settings.gemini.request_timeout_secs),
    )?);
    let summarization = Arc::new(
        SummarizationService::new(llm_client, gemini_key)
            .with_fallback_summary(settings.gemini.fallback_summary.clone()),
    );

    let shutdown = CancellationToken::new();
    let state = AppState {
        audio_processing,
        summarization,
        shutdown: shutdown.clone(),
        max_upload_bytes: settings.staging.max_upload_bytes(),
    };

    let router = create_router(state);

    let host: IpAddr = settings
        .server
        .host
        .parse()
        .with_context(|| format!("Invalid server host: {}", settings.server.host))?;
    let addr = SocketAddr::from((host, settings.server.port));
    tracing::info!(environment = %environment, "Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on SIGINT or SIGTERM and cancels in-flight polling.
async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
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
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
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

    tracing::info!("Shutdown signal received, cancelling in-flight transcriptions");
    token.cancel();
}
