use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::{debug, error, instrument};

use super::Provider;
use crate::errors::{CoachError, CoachResult};
use crate::wire::ModelRequest;

/// Google Generative Language API (`generateContent`).
pub struct GeminiProvider {
    api_key: String,
    model: String,
    api_base: String,
    client: Client,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Image {
        #[serde(rename = "inlineData")]
        inline_data: InlineData<'a>,
    },
    Text {
        text: &'a str,
    },
}

#[derive(Serialize)]
struct InlineData<'a> {
    #[serde(rename = "mimeType")]
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: &'static str,
    #[serde(rename = "responseSchema")]
    response_schema: Value,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

impl GeminiProvider {
    /// Fails when the key is blank; the client is built once and reused.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        api_base: impl Into<String>,
        timeout_secs: Option<u64>,
    ) -> CoachResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(CoachError::Config("empty API key".into()));
        }
        let mut builder = Client::builder();
        if let Some(secs) = timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| CoachError::Config(format!("http client: {e}")))?;
        Ok(Self { api_key, model: model.into(), api_base: api_base.into(), client })
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base.trim_end_matches('/'), self.model)
    }

    fn body<'a>(req: &'a ModelRequest) -> GenerateRequest<'a> {
        let mut parts = Vec::with_capacity(2);
        if let Some(img) = &req.image {
            parts.push(Part::Image { inline_data: InlineData { mime_type: &img.mime_type, data: &img.data } });
        }
        parts.push(Part::Text { text: &req.prompt });
        GenerateRequest {
            contents: vec![Content { role: "user", parts }],
            generation_config: req.schema.as_ref().map(|s| GenerationConfig {
                response_mime_type: "application/json",
                response_schema: s.to_wire(),
            }),
        }
    }

    fn api_message(status: reqwest::StatusCode, text: &str) -> String {
        let msg = serde_json::from_str::<ErrorEnvelope>(text)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| text.to_string());
        format!("Gemini API error ({status}): {msg}")
    }

    fn extract_text(text: &str) -> CoachResult<String> {
        let parsed: GenerateResponse = serde_json::from_str(text)
            .map_err(|e| CoachError::Parse(format!("failed to parse Gemini response: {e}")))?;
        let joined: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();
        if joined.is_empty() {
            return Err(CoachError::Parse("no text in Gemini response".into()));
        }
        Ok(joined)
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    #[instrument(skip(self, req), fields(model = %self.model, mode = ?req.mode, tx = %req.transaction.id))]
    async fn send(&self, req: &ModelRequest) -> CoachResult<String> {
        let url = self.url();
        debug!(has_image = req.image.is_some(), has_schema = req.schema.is_some(), "POST generateContent");

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&Self::body(req))
            .send()
            .await
            .map_err(|e| CoachError::Request(format!("HTTP request failed: {e}")))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| CoachError::Request(format!("failed to read response: {e}")))?;

        if !status.is_success() {
            error!(%status, "Gemini API error");
            return Err(CoachError::Request(Self::api_message(status, &text)));
        }

        Self::extract_text(&text)
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

impl fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}
