use crate::models::sales::Row;
use reqwest::blocking::Client;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};

pub const SYSTEM_INSTRUCTION: &str =
    "You are an expert senior sales analyst that answers questions about CSV data.";
pub const ANSWER_ERROR_PREFIX: &str = "Error getting answer from the completion service:";
pub const SAMPLE_ROWS: usize = 10;
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// API key supplied by the user. Never printed.
#[derive(Clone)]
pub struct Credential(String);

impl Credential {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("service error: {0}")]
    Api(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

pub trait CompletionService {
    fn complete(
        &self,
        system: &str,
        prompt: &str,
        credential: &Credential,
    ) -> Result<String, CompletionError>;
}

pub fn build_prompt(question: &str, data: &[Row]) -> String {
    let sample = &data[..data.len().min(SAMPLE_ROWS)];
    format!("CSV data: {:?}\n\nQuestion: {}\n\nAnswer:", sample, question)
}

/// Asks the completion service about the first rows of `data`. Failures are
/// returned as text starting with [`ANSWER_ERROR_PREFIX`].
pub fn get_answer(
    service: &dyn CompletionService,
    question: &str,
    data: &[Row],
    credential: &Credential,
) -> String {
    let prompt = build_prompt(question, data);
    debug!(sample_rows = data.len().min(SAMPLE_ROWS), "asking completion service");

    match service.complete(SYSTEM_INSTRUCTION, &prompt, credential) {
        Ok(answer) => answer.trim().to_string(),
        Err(e) => {
            warn!(error = %e, "completion request failed");
            format!("{} {}", ANSWER_ERROR_PREFIX, e)
        }
    }
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

/// Chat-completion client for OpenAI-compatible endpoints.
pub struct OpenAiClient {
    http: Client,
    model: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(model: String, base_url: String) -> Result<Self, String> {
        let http = Client::builder()
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {}", e))?;
        Ok(Self {
            http,
            model,
            base_url,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

impl CompletionService for OpenAiClient {
    fn complete(
        &self,
        system: &str,
        prompt: &str,
        credential: &Credential,
    ) -> Result<String, CompletionError> {
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(credential.expose())
            .json(&body)
            .send()?;

        let status = response.status();
        let text = response.text()?;
        if !status.is_success() {
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let value: Value = serde_json::from_str(&text)
            .map_err(|e| CompletionError::MalformedResponse(e.to_string()))?;
        extract_answer(&value)
    }
}

/// Pulls the first choice's message content out of a chat-completion body.
pub fn extract_answer(value: &Value) -> Result<String, CompletionError> {
    if let Some(error) = value.get("error") {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        return Err(CompletionError::Api(message));
    }

    value
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            CompletionError::MalformedResponse("no message content in first choice".to_string())
        })
}
