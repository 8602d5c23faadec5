//! HTTP Handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use agent_core::{provider::ModelInfo, AgentError};
use weather_agent::{WeatherError, WeatherReport, WeatherRequest};

use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub ollama_connected: bool,
    pub model: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub models: Vec<ModelInfo>,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_response(err: &WeatherError) -> ApiError {
    let (status, code) = match err {
        WeatherError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
        WeatherError::Agent(agent) => match agent.root() {
            AgentError::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, "TIMEOUT"),
            AgentError::RateLimited(_) => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED"),
            AgentError::Transport(_) | AgentError::ProviderUnavailable(_) => {
                (StatusCode::BAD_GATEWAY, "PROVIDER_ERROR")
            }
            AgentError::SchemaViolation { .. } | AgentError::MaxIterations(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "NO_VALID_OUTPUT")
            }
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "AGENT_ERROR"),
        },
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "AGENT_ERROR"),
    };

    (
        status,
        Json(ErrorResponse {
            error: err.user_message(),
            code: code.into(),
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let ollama_connected = state.provider.health_check().await.unwrap_or(false);

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        ollama_connected,
        model: state.model.clone(),
    })
}

/// List models the provider serves
pub async fn list_models(State(state): State<AppState>) -> Result<Json<ModelsResponse>, ApiError> {
    let models = state.provider.list_models().await.map_err(|e| {
        tracing::warn!("Model listing failed: {}", e);
        (
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponse {
                error: e.user_message(),
                code: "PROVIDER_ERROR".into(),
            }),
        )
    })?;

    Ok(Json(ModelsResponse { models }))
}

/// Run the weather agent on one request
pub async fn invoke_agent(
    State(state): State<AppState>,
    Json(request): Json<WeatherRequest>,
) -> Result<Json<WeatherReport>, ApiError> {
    let report = state.agent.invoke(&request).await.map_err(|e| {
        if let WeatherError::Agent(agent) = &e {
            for message in agent.last_exchange() {
                tracing::debug!(role = %message.role, content = %message.content, "Last exchange");
            }
        }
        tracing::error!("Agent error: {}", e);
        error_response(&e)
    })?;

    Ok(Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_error_status_mapping() {
        let invalid = WeatherError::InvalidRequest("count must be at least 1".into());
        assert_eq!(error_response(&invalid).0, StatusCode::BAD_REQUEST);

        let timeout = WeatherError::Agent(
            AgentError::Timeout(Duration::from_secs(5)).with_exchange(Vec::new()),
        );
        assert_eq!(error_response(&timeout).0, StatusCode::GATEWAY_TIMEOUT);

        let exhausted = WeatherError::Agent(AgentError::MaxIterations(10));
        let (status, body) = error_response(&exhausted);
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.code, "NO_VALID_OUTPUT");
    }
}
