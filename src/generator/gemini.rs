use crate::config::GeminiConfig;
use crate::error::GenerationError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::timeout as tokio_timeout;
use tracing::{debug, error};

use super::TextCompletion;

const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    generation_config: GenerationSettings,
}

#[derive(Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct GenerationSettings {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<ApiError>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Option<Vec<CandidatePart>>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ApiError,
}

/// Client for the Google Generative Language API.
pub struct GeminiClient {
    api_key: String,
    model: String,
    api_base: String,
    timeout: Duration,
    max_output_tokens: u32,
    client: Client,
}

impl GeminiClient {
    /// Build a client from `GEMINI_API_KEY`. Fails fast with a configuration
    /// error when the credential is missing, before any network activity.
    pub fn from_env(config: &GeminiConfig) -> Result<Self, GenerationError> {
        let api_key = std::env::var(GEMINI_API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                GenerationError::Configuration(format!(
                    "{GEMINI_API_KEY_ENV} environment variable not set"
                ))
            })?;

        Ok(Self {
            api_key,
            model: config.model.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.timeout_sec),
            max_output_tokens: config.max_output_tokens,
            client: Client::new(),
        })
    }
}

#[async_trait]
impl TextCompletion for GeminiClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, GenerationError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.api_base, self.model, self.api_key
        );

        let body = GeminiRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: user.to_string(),
                }],
            }],
            system_instruction: Some(Content {
                role: None,
                parts: vec![Part {
                    text: system.to_string(),
                }],
            }),
            generation_config: GenerationSettings {
                temperature: 0.2,
                max_output_tokens: self.max_output_tokens,
            },
        };

        debug!(model = %self.model, "sending generation request");

        // The URL carries the API key; strip it from transport errors so the
        // credential never reaches logs or user-facing messages
        let round_trip = async {
            let response = self
                .client
                .post(&url)
                .json(&body)
                .send()
                .await
                .map_err(reqwest::Error::without_url)?;
            let status = response.status();
            let text = response.text().await.map_err(reqwest::Error::without_url)?;
            Ok::<_, reqwest::Error>((status, text))
        };

        let (status, text) = tokio_timeout(self.timeout, round_trip)
            .await
            .map_err(|_| GenerationError::Timeout(self.timeout))??;

        if !status.is_success() {
            // Body is usually the standard error envelope; fall back to raw text
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|b| b.error.message)
                .unwrap_or(text);
            error!(status = %status, "Gemini API error");
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GeminiResponse =
            serde_json::from_str(&text).map_err(|e| GenerationError::Parse {
                reason: format!("invalid response envelope: {e}"),
                raw: text.clone(),
            })?;

        if let Some(api_error) = parsed.error {
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message: api_error.message,
            });
        }

        parsed
            .candidates
            .as_ref()
            .and_then(|candidates| candidates.first())
            .and_then(|candidate| candidate.content.as_ref())
            .and_then(|content| content.parts.as_ref())
            .and_then(|parts| parts.iter().find(|part| !part.text.is_empty()))
            .map(|part| part.text.clone())
            .ok_or_else(|| GenerationError::Parse {
                reason: "response contained no text candidates".to_string(),
                raw: text,
            })
    }
}
