//! Caption generation via the Gemini generateContent API.

use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::constants::{AI_CAPTION_ERROR_PREFIX, GEMINI_API_BASE, GENERATION_TIMEOUT};

/// Ways caption generation can fail.
///
/// Every variant displays with the fixed `AI Caption Error:` prefix so the
/// message can be shown to users (or matched by callers) as-is.
#[derive(Debug)]
pub enum CaptionError {
    /// No API key was configured; detected before any network call.
    MissingCredential,
    /// The request could not be sent or the response body not read.
    Request(String),
    /// The API answered with a non-success status.
    Api(u16, String),
    /// The response body was not the expected JSON shape.
    InvalidPayload(String),
    /// The response parsed but carried no caption text.
    EmptyResponse,
}

impl std::fmt::Display for CaptionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingCredential => {
                write!(f, "{AI_CAPTION_ERROR_PREFIX} GEMINI_API_KEY is not configured.")
            }
            Self::Request(err) => {
                write!(f, "{AI_CAPTION_ERROR_PREFIX} Could not connect to Gemini. ({err})")
            }
            Self::Api(status, detail) => {
                write!(f, "{AI_CAPTION_ERROR_PREFIX} Gemini returned HTTP {status}. ({detail})")
            }
            Self::InvalidPayload(err) => {
                write!(f, "{AI_CAPTION_ERROR_PREFIX} Could not parse the Gemini response. ({err})")
            }
            Self::EmptyResponse => {
                write!(f, "{AI_CAPTION_ERROR_PREFIX} Gemini returned no caption text.")
            }
        }
    }
}

impl std::error::Error for CaptionError {}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    #[serde(default)]
    text: Option<String>,
}

/// Client for the Gemini text-generation API.
///
/// The credential is injected at construction rather than read from ambient
/// process state; a missing credential surfaces as
/// [`CaptionError::MissingCredential`] without touching the network.
#[derive(Clone)]
pub struct CaptionClient {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl CaptionClient {
    /// Builds a client against the public Gemini endpoint.
    pub fn new(api_key: Option<String>, model: &str) -> Self {
        Self::with_base_url(api_key, model, GEMINI_API_BASE)
    }

    /// Builds a client against a custom API base URL, primarily for tests.
    pub fn with_base_url(api_key: Option<String>, model: &str, base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model: model.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Asks the model for a single short meme caption about `topic`.
    ///
    /// The raw model text is cleaned before returning: surrounding
    /// whitespace trimmed, double quotes removed, and only the first line
    /// kept. An empty cleaned caption is a valid result.
    pub async fn generate_caption(&self, topic: &str) -> Result<String, CaptionError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(CaptionError::MissingCredential)?;

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let req_body = json!({
            "contents": [
                {"parts": [{"text": build_prompt(topic)}]}
            ]
        });

        let resp = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .timeout(GENERATION_TIMEOUT)
            .json(&req_body)
            .send()
            .await
            .map_err(|err| CaptionError::Request(err.to_string()))?;

        let status = resp.status();
        let bytes = resp
            .bytes()
            .await
            .map_err(|err| CaptionError::Request(err.to_string()))?;

        if !status.is_success() {
            debug!("Gemini error body: {}", String::from_utf8_lossy(&bytes));
            return Err(CaptionError::Api(status.as_u16(), error_detail(&bytes)));
        }

        let parsed: GenerateContentResponse = serde_json::from_slice(&bytes)
            .map_err(|err| CaptionError::InvalidPayload(err.to_string()))?;

        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
            .ok_or(CaptionError::EmptyResponse)?;

        Ok(clean_caption(&text))
    }
}

/// Cleans raw model output into a single caption line.
///
/// Models sometimes wrap the caption in quotes or append alternatives on
/// following lines; strip the quotes and keep only the first line.
pub fn clean_caption(raw: &str) -> String {
    let cleaned = raw.trim().replace('"', "");
    cleaned.split('\n').next().unwrap_or("").trim().to_string()
}

fn build_prompt(topic: &str) -> String {
    format!(
        "Generate a single, short, funny, and relatable meme caption \
         based on the following topic: '{topic}'. \
         Only return the caption text, nothing else."
    )
}

/// First few hundred characters of an error body, for the user-facing message.
fn error_detail(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    text.trim().chars().take(300).collect()
}
