use crate::config::Config;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Transcript text substituted when a successful response carries no
/// candidate text.
pub const NO_RESPONSE: &str = "No response";

/// Failure modes of a `generateContent` call. All of them collapse to the
/// same transcript message at the conversation boundary; the distinction
/// only matters for the diagnostic log.
#[derive(Debug, Error)]
pub enum GeminiError {
    /// The request never produced an HTTP response.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    /// The server answered with a non-2xx status.
    #[error("server returned HTTP {0}")]
    Status(reqwest::StatusCode),
    /// The response body was not valid JSON for the expected shape.
    #[error("malformed response body: {0}")]
    Shape(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

impl<'a> GenerateRequest<'a> {
    fn from_prompt(prompt: &'a str) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        }
    }
}

/// Response shape of `models/{model}:generateContent`. Every level is
/// optional so that a body missing any of them still deserializes; the
/// extraction policy decides what the transcript sees.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Client for the Gemini generative language HTTP API.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Self {
        // No request timeout: an issued call either settles or the process
        // exits with it.
        Self {
            http: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.clone(),
        }
    }

    /// Send one prompt and return the completion text.
    ///
    /// Only the first candidate's first part is consulted; a well-formed
    /// body without one yields [`NO_RESPONSE`].
    pub async fn generate(&self, prompt: &str) -> Result<String, GeminiError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        debug!(model = %self.model, "issuing generateContent request");

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&GenerateRequest::from_prompt(prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeminiError::Status(status));
        }

        let body = response.text().await?;
        let parsed: GenerateResponse = serde_json::from_str(&body)?;
        Ok(extract_text(parsed))
    }
}

fn extract_text(response: GenerateResponse) -> String {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().next())
        .and_then(|part| part.text)
        .unwrap_or_else(|| NO_RESPONSE.to_owned())
}
