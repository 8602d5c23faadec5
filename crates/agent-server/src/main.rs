//! Weather agent HTTP server
//!
//! Axum-based server exposing the weather agent over REST.

mod handlers;
mod state;

use std::sync::Arc;

use axum::{routing::{get, post}, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agent_core::{GenerationOptions, LlmProvider, Message};
use agent_runtime::OllamaProvider;
use weather_agent::{WeatherAgent, WeatherAgentConfig};

use crate::handlers::{health_check, invoke_agent, list_models};
use crate::state::AppState;

/// Send a tiny completion so the first real request doesn't pay model load time
fn spawn_warmup(provider: Arc<dyn LlmProvider>, model: String) {
    tokio::spawn(async move {
        let messages = [Message::system("Warmup"), Message::user("Warmup")];
        let options = GenerationOptions {
            model,
            max_tokens: 10,
            ..Default::default()
        };

        match provider.complete(&messages, &options).await {
            Ok(_) => tracing::info!("Model warm"),
            Err(e) => tracing::warn!("Warmup failed: {}", e),
        }
    });
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    // Initialize LLM provider
    let provider: Arc<dyn LlmProvider> = Arc::new(OllamaProvider::from_env()?);

    match provider.health_check().await {
        Ok(true) => {
            tracing::info!("✓ Connected to Ollama");
            if let Ok(models) = provider.list_models().await {
                for model in models {
                    tracing::info!("  Model: {}", model.id);
                }
            }
        }
        Ok(false) | Err(_) => {
            tracing::warn!("⚠ Ollama not available - agent will fail");
            tracing::warn!("  Make sure Ollama is running: ollama serve");
        }
    }

    let config = WeatherAgentConfig::from_env();
    let model = config.model.clone();
    tracing::info!(
        model = %model,
        max_iterations = config.max_iterations,
        time_budget = ?config.time_budget,
        "Agent configured"
    );

    let agent = WeatherAgent::builder()
        .provider(provider.clone())
        .config(config)
        .build()?;

    spawn_warmup(provider.clone(), model.clone());

    let state = AppState {
        provider,
        agent: Arc::new(agent),
        model,
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health_check))
        .route("/api/models", get(list_models))
        .route("/api/agent/invoke", post(invoke_agent))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("🚀 Weather agent running on http://{}", addr);
    tracing::info!("  GET  /health           - Health check");
    tracing::info!("  GET  /api/models       - List available models");
    tracing::info!("  POST /api/agent/invoke - Run the weather agent");

    axum::serve(listener, app).await?;

    Ok(())
}
