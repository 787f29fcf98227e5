//! REST client for the LLM provider.
//!
//! Wraps the provider's HTTP API (file upload, file deletion, grounded chat
//! completion) using [`reqwest`].

use serde::{Deserialize, Serialize};

/// Default provider endpoint (OpenAI-compatible surface).
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default model when `LLM_MODEL` is not set.
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Configuration for the LLM provider client.
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    /// Base API URL without a trailing slash.
    pub base_url: String,
    /// Bearer token for the provider.
    pub api_key: String,
    /// Model identifier sent with every completion request.
    pub model: String,
}

impl AssistantConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `LLM_API_KEY` is not set, signalling that the chat
    /// assistant is not configured.
    ///
    /// | Variable      | Required | Default                     |
    /// |---------------|----------|-----------------------------|
    /// | `LLM_API_KEY` | yes      | --                          |
    /// | `LLM_API_URL` | no       | `https://api.openai.com/v1` |
    /// | `LLM_MODEL`   | no       | `gpt-4o-mini`               |
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("LLM_API_KEY").ok()?;
        Some(Self {
            base_url: std::env::var("LLM_API_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            api_key,
            model: std::env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
        })
    }
}

/// One prior exchange turn passed back to the provider for context.
#[derive(Debug, Clone, Serialize)]
pub struct ChatTurn {
    /// `"user"` or `"assistant"`.
    pub role: &'static str,
    pub content: String,
}

/// Response returned by the provider after a successful file upload.
#[derive(Debug, Deserialize)]
pub struct UploadedFile {
    /// Provider-assigned file identifier, referenced in chat requests.
    pub id: String,
}

/// Errors from the LLM provider client.
#[derive(Debug, thiserror::Error)]
pub enum AssistantApiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("LLM API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The provider's response body did not have the expected shape.
    #[error("Malformed LLM response: {0}")]
    Malformed(String),
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    output_text: Option<String>,
}

/// HTTP client for the LLM provider.
pub struct AssistantApi {
    client: reqwest::Client,
    config: AssistantConfig,
}

impl AssistantApi {
    /// Create a new client with the given configuration.
    pub fn new(config: AssistantConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Upload a knowledge-base file to the provider's file store.
    ///
    /// Sends a multipart `POST /files` request with purpose `assistants`.
    /// The returned id is what chat requests reference for file-search
    /// grounding.
    pub async fn upload_file(
        &self,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadedFile, AssistantApiError> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(content_type)?;
        let form = reqwest::multipart::Form::new()
            .text("purpose", "assistants")
            .part("file", part);

        let response = self
            .client
            .post(format!("{}/files", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Remove a file from the provider's file store.
    pub async fn delete_file(&self, file_id: &str) -> Result<(), AssistantApiError> {
        let response = self
            .client
            .delete(format!("{}/files/{}", self.config.base_url, file_id))
            .bearer_auth(&self.config.api_key)
            .send()
            .await?;

        Self::check_status(response).await
    }

    /// Ask the provider to answer `user_message`, grounded in the uploaded
    /// files and given the prior `history` turns.
    pub async fn answer(
        &self,
        instructions: &str,
        history: &[ChatTurn],
        user_message: &str,
        file_ids: &[String],
    ) -> Result<String, AssistantApiError> {
        let mut input: Vec<serde_json::Value> = history
            .iter()
            .map(|turn| serde_json::json!({"role": turn.role, "content": turn.content}))
            .collect();
        input.push(serde_json::json!({"role": "user", "content": user_message}));

        let body = serde_json::json!({
            "model": self.config.model,
            "instructions": instructions,
            "input": input,
            "tools": [{"type": "file_search"}],
            "file_ids": file_ids,
        });

        let response = self
            .client
            .post(format!("{}/responses", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let completion: CompletionResponse = Self::parse_response(response).await?;
        completion
            .output_text
            .ok_or_else(|| AssistantApiError::Malformed("missing output_text".to_string()))
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the response
    /// unchanged on success, or an [`AssistantApiError::Api`] containing the
    /// status and body text on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, AssistantApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(AssistantApiError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, AssistantApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    /// Assert the response has a success status code, discarding the body.
    async fn check_status(response: reqwest::Response) -> Result<(), AssistantApiError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uploaded_file_deserializes_provider_shape() {
        let file: UploadedFile =
            serde_json::from_str(r#"{"id": "file-abc123", "bytes": 512}"#).unwrap();
        assert_eq!(file.id, "file-abc123");
    }

    #[test]
    fn completion_response_tolerates_extra_fields() {
        let completion: CompletionResponse =
            serde_json::from_str(r#"{"output_text": "hi", "usage": {"total_tokens": 9}}"#)
                .unwrap();
        assert_eq!(completion.output_text.as_deref(), Some("hi"));
    }

    #[test]
    fn completion_response_without_text_is_none() {
        let completion: CompletionResponse = serde_json::from_str(r#"{"id": "resp_1"}"#).unwrap();
        assert!(completion.output_text.is_none());
    }
}
