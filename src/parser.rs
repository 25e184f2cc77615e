use base64::engine::general_purpose;
use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};

use crate::auth::{GcloudToken, TokenSource};
use crate::config::Config;
use crate::vertex_ai::{VertexAIRequest, VertexAIResponse};

/// How a document is turned into text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserType {
    /// Transcribe pages with a multimodal LLM
    LlmParse,
}

impl fmt::Display for ParserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParserType::LlmParse => f.write_str("LLM_PARSE"),
        }
    }
}

/// Options for a single parse call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    pub parser_type: ParserType,
    /// Backend model identifier
    pub model: String,
    /// Pages sent to the model per request
    pub pages_per_split: usize,
    /// Upper bound on concurrent requests
    pub max_processes: usize,
}

impl ParseOptions {
    /// Options used to probe a model: one page, one worker
    pub fn probe(model: &str) -> Self {
        Self {
            parser_type: ParserType::LlmParse,
            model: model.to_string(),
            pages_per_split: 1,
            max_processes: 1,
        }
    }

    /// Rejects option combinations no backend can honour
    pub fn validate(&self) -> Result<(), ParseError> {
        if self.model.is_empty() {
            return Err(ParseError::InvalidOptions("model must not be empty".to_string()));
        }
        if self.pages_per_split == 0 {
            return Err(ParseError::InvalidOptions(
                "pages_per_split must be at least 1".to_string(),
            ));
        }
        if self.max_processes == 0 {
            return Err(ParseError::InvalidOptions(
                "max_processes must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Token accounting reported by the backend
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenUsage {
    pub input: u64,
    pub output: u64,
    pub total: u64,
}

/// Result of a successful parse
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseResponse {
    /// Text content extracted from the document
    pub raw: String,
    pub token_usage: TokenUsage,
    /// Model version that served the request, when reported
    pub model: Option<String>,
}

impl ParseResponse {
    /// True when the backend answered without any content
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

/// Error types for document parsing
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The input document could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// No usable credentials
    #[error("Authentication failed: {0}")]
    Auth(String),
    /// Transport-level failure talking to the backend
    #[error("Failed to make Vertex AI API request: {0}")]
    Http(#[from] reqwest::Error),
    /// The backend answered with a non-success status
    #[error("API request failed with status code {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    /// The backend answered but refused to produce content
    #[error("{0}")]
    Backend(String),
    #[error("Invalid parse options: {0}")]
    InvalidOptions(String),
}

/// Capability to parse a document with a given model
///
/// The availability check only depends on this trait, so tests can provide
/// deterministic implementations without network access.
pub trait DocumentParser {
    fn parse(
        &self,
        path: &Path,
        options: &ParseOptions,
    ) -> impl Future<Output = Result<ParseResponse, ParseError>>;
}

impl<P: DocumentParser + ?Sized> DocumentParser for &P {
    fn parse(
        &self,
        path: &Path,
        options: &ParseOptions,
    ) -> impl Future<Output = Result<ParseResponse, ParseError>> {
        (**self).parse(path, options)
    }
}

/// Parses documents with Gemini models on Vertex AI
pub struct VertexParser<T = GcloudToken> {
    project_id: String,
    region: String,
    base_url: String,
    tokens: T,
    client: reqwest::Client,
}

impl VertexParser<GcloudToken> {
    /// Creates a parser for the configured project and region using gcloud credentials
    pub fn new(config: &Config) -> Self {
        Self::with_token_source(config, GcloudToken)
    }
}

impl<T: TokenSource> VertexParser<T> {
    pub fn with_token_source(config: &Config, tokens: T) -> Self {
        Self {
            project_id: config.project_id.clone(),
            region: config.region.clone(),
            base_url: format!("https://{}-aiplatform.googleapis.com", config.region),
            tokens,
            client: reqwest::Client::new(),
        }
    }

    /// Overrides the API endpoint, e.g. to point at a local test server
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// The `generateContent` URL for a model
    pub fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/v1/projects/{}/locations/{}/publishers/google/models/{}:generateContent",
            self.base_url, self.project_id, self.region, model
        )
    }

    fn headers(&self) -> Result<HeaderMap, ParseError> {
        let access_token = self
            .tokens
            .access_token()
            .map_err(|e| ParseError::Auth(format!("{:#}", e)))?;

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", access_token))
                .map_err(|e| ParseError::Auth(format!("Invalid access token: {}", e)))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }
}

fn transcription_prompt(pages_per_split: usize) -> String {
    let scope = if pages_per_split == 1 {
        "the first page".to_string()
    } else {
        format!("the first {} pages", pages_per_split)
    };
    format!(
        "Transcribe {} of this document to Markdown. Return only the transcription.",
        scope
    )
}

impl<T: TokenSource> DocumentParser for VertexParser<T> {
    async fn parse(
        &self,
        path: &Path,
        options: &ParseOptions,
    ) -> Result<ParseResponse, ParseError> {
        options.validate()?;

        let pdf_bytes = tokio::fs::read(path).await.map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let pdf_base64 = general_purpose::STANDARD.encode(pdf_bytes);

        let headers = self.headers()?;
        let api_url = self.endpoint(&options.model);
        let request = VertexAIRequest::new_pdf_extraction(
            &pdf_base64,
            &transcription_prompt(options.pages_per_split),
            None,
        );

        tracing::debug!(
            model = %options.model,
            parser_type = %options.parser_type,
            url = %api_url,
            "sending generateContent request"
        );

        let response = self
            .client
            .post(&api_url)
            .headers(headers)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!(model = %options.model, %status, "received response");
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to get error details".to_string());
            return Err(ParseError::Status { status, body });
        }

        let response: VertexAIResponse = response.json().await?;

        if let Some(reason) = response
            .prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.as_deref())
        {
            return Err(ParseError::Backend(format!("Prompt blocked: {}", reason)));
        }

        let usage = response.usage_metadata.unwrap_or_default();
        Ok(ParseResponse {
            raw: response.text(),
            token_usage: TokenUsage {
                input: usage.prompt_token_count,
                output: usage.candidates_token_count,
                total: usage.total_token_count,
            },
            model: response.model_version.clone(),
        })
    }
}
