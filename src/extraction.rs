//! Question extraction over the Gemini completion API.
//!
//! We make a single `generateContent` call per material: the PDF bytes go
//! inline (base64) together with a fixed prompt, and a response schema
//! forces the model to answer with a strict JSON array of questions.
//! Calls are instrumented with latency and response sizes, never contents.
//!
//! NOTE: the API key is sent as a query parameter and must never be logged.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, instrument};

use crate::config::{Config, QUESTIONS_PER_MATERIAL};

/// One candidate question as returned by the extraction service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExtractedQuestion {
    pub question_text: String,
    pub choices: Vec<String>,
    pub correct_answer: String,
    pub bloom_level: String,
}

/// Opaque upstream failure. Surfaced to the operator unchanged; no draft
/// is created when extraction fails.
#[derive(Debug)]
pub enum ExtractionError {
    Upstream(String),
    InvalidResponse(String),
}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionError::Upstream(msg) => write!(f, "Extraction failed: {}", msg),
            ExtractionError::InvalidResponse(msg) => {
                write!(f, "Extraction returned an unusable response: {}", msg)
            }
        }
    }
}

impl std::error::Error for ExtractionError {}

impl From<ExtractionError> for crate::error::AppError {
    fn from(err: ExtractionError) -> Self {
        crate::error::AppError::UpstreamError(err.to_string())
    }
}

/// The extraction seam: given a source document, produce candidate
/// questions or fail as a whole. Implementations are opaque collaborators;
/// the review workflow never inspects partial results.
#[async_trait]
pub trait QuestionExtractor: Send + Sync {
    async fn extract(&self, material: &[u8]) -> Result<Vec<ExtractedQuestion>, ExtractionError>;
}

/// Production extractor backed by Gemini `generateContent`.
pub struct GeminiExtractor {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiExtractor {
    pub fn new(config: &Config) -> Self {
        // Document-sized prompts are slow; give the model room to answer.
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .expect("Failed to build HTTP client for the extractor");

        Self {
            client,
            api_key: config.gemini_api_key.clone(),
            base_url: config.gemini_base_url.clone(),
            model: config.gemini_model.clone(),
        }
    }

    fn request_body(&self, material: &[u8]) -> serde_json::Value {
        json!({
            "contents": [{
                "parts": [
                    {
                        "inline_data": {
                            "mime_type": "application/pdf",
                            "data": BASE64.encode(material),
                        }
                    },
                    {
                        "text": format!(
                            "Generate {} multiple-choice questions based on this document. \
                             Ensure a mix of Bloom's Taxonomy levels.",
                            QUESTIONS_PER_MATERIAL
                        )
                    }
                ]
            }],
            "generationConfig": {
                "response_mime_type": "application/json",
                "response_schema": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "question_text": { "type": "STRING" },
                            "choices": {
                                "type": "ARRAY",
                                "items": { "type": "STRING" }
                            },
                            "correct_answer": { "type": "STRING" },
                            "bloom_level": { "type": "STRING" }
                        },
                        "required": ["question_text", "choices", "correct_answer", "bloom_level"]
                    }
                }
            }
        })
    }
}

#[async_trait]
impl QuestionExtractor for GeminiExtractor {
    #[instrument(level = "info", skip(self, material), fields(model = %self.model, material_bytes = material.len()))]
    async fn extract(&self, material: &[u8]) -> Result<Vec<ExtractedQuestion>, ExtractionError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let start = std::time::Instant::now();
        let res = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .json(&self.request_body(material))
            .send()
            .await
            .map_err(|e| ExtractionError::Upstream(e.to_string()))?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            let msg = extract_api_error(&body).unwrap_or(body);
            error!(%status, "Extraction call rejected");
            return Err(ExtractionError::Upstream(format!("HTTP {}: {}", status, msg)));
        }

        let body: GenerateContentResponse = res
            .json()
            .await
            .map_err(|e| ExtractionError::InvalidResponse(e.to_string()))?;

        let text = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .and_then(|p| p.text)
            .ok_or_else(|| {
                ExtractionError::InvalidResponse("response carried no text part".to_string())
            })?;

        let questions: Vec<ExtractedQuestion> = serde_json::from_str(&text)
            .map_err(|e| ExtractionError::InvalidResponse(format!("JSON parse error: {}", e)))?;

        info!(
            elapsed = ?start.elapsed(),
            question_count = questions.len(),
            "Extraction completed"
        );

        Ok(questions)
    }
}

// --- Response DTOs ---

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Try to extract a clean error message from the API error body.
fn extract_api_error(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct EWrap {
        error: EObj,
    }
    #[derive(Deserialize)]
    struct EObj {
        message: String,
    }
    serde_json::from_str::<EWrap>(body).ok().map(|w| w.error.message)
}
