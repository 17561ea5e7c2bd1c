//! Blocking client for the Gemini `generateContent` API.

use super::types::{
    Content, ErrorResponse, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    InlineData, Part,
};
use super::{ModelBackend, ModelRequest};
use crate::error::{Error, Result};
use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use std::time::Duration;

/// Public Gemini endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

const API_VERSION: &str = "v1beta";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini client.
pub struct GeminiClient {
    base_url: String,
    http: reqwest::blocking::Client,
}

impl GeminiClient {
    /// Build a client. The key is sent as a header, never in the URL.
    pub fn new(api_key: &str, base_url: Option<&str>, timeout: Duration) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(Error::Config("GOOGLE_API_KEY is empty".to_string()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut key = HeaderValue::from_str(api_key.trim())
            .map_err(|_| Error::Config("GOOGLE_API_KEY contains invalid characters".to_string()))?;
        key.set_sensitive(true);
        headers.insert(API_KEY_HEADER, key);

        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url
                .unwrap_or(DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            http,
        })
    }

    fn generate_content_url(&self, model: &str) -> String {
        format!("{}/{}/models/{}:generateContent", self.base_url, API_VERSION, model)
    }

    fn build_request(request: &ModelRequest) -> GenerateContentRequest {
        let mut parts = vec![Part::text(request.prompt.clone())];
        let engine = base64::engine::general_purpose::STANDARD;
        for attachment in &request.attachments {
            parts.push(Part {
                text: None,
                inline_data: Some(InlineData {
                    mime_type: attachment.mime_type.clone(),
                    data: engine.encode(&attachment.data),
                }),
            });
        }

        GenerateContentRequest {
            contents: vec![Content {
                parts,
                role: Some("user".to_string()),
            }],
            generation_config: (request.json_output || request.temperature.is_some()).then(|| {
                GenerationConfig {
                    temperature: request.temperature,
                    response_mime_type: request
                        .json_output
                        .then(|| "application/json".to_string()),
                }
            }),
        }
    }
}

impl ModelBackend for GeminiClient {
    fn generate(&self, request: &ModelRequest) -> Result<String> {
        tracing::debug!(
            model = %request.model,
            attachments = request.attachments.len(),
            "sending generateContent request"
        );

        let body = Self::build_request(request);
        let response = self
            .http
            .post(self.generate_content_url(&request.model))
            .json(&body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().unwrap_or_default();
            let message = match serde_json::from_str::<ErrorResponse>(&error_body) {
                Ok(e) if e.error.status.is_empty() => e.error.message,
                Ok(e) => format!("{}: {}", e.error.status, e.error.message),
                Err(_) => format!("HTTP {}: {}", status, error_body.trim()),
            };
            return Err(Error::Model {
                message,
                status: Some(status.as_u16()),
            });
        }

        let parsed: GenerateContentResponse = response.json()?;
        if let Some(reason) = parsed.block_reason() {
            return Err(Error::Model {
                message: format!("prompt blocked: {}", reason),
                status: None,
            });
        }
        Ok(parsed.text())
    }
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Attachment;

    #[test]
    fn test_empty_key_is_config_error() {
        let err = GeminiClient::new("  ", None, Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_url_and_debug_hide_key() {
        let client = GeminiClient::new("secret-key", Some("http://localhost:9/"), Duration::from_secs(5)).unwrap();
        let url = client.generate_content_url("gemini-2.5-flash");
        assert_eq!(url, "http://localhost:9/v1beta/models/gemini-2.5-flash:generateContent");
        assert!(!format!("{:?}", client).contains("secret-key"));
    }

    #[test]
    fn test_build_request_encodes_attachments() {
        let request = ModelRequest {
            model: "m".into(),
            prompt: "check".into(),
            attachments: vec![Attachment {
                mime_type: "application/pdf".into(),
                data: b"%PDF".to_vec(),
            }],
            json_output: true,
            temperature: None,
        };
        let json = serde_json::to_value(GeminiClient::build_request(&request)).unwrap();
        assert_eq!(json["contents"][0]["parts"][1]["inlineData"]["data"], "JVBERg==");
        assert_eq!(json["generationConfig"]["responseMimeType"], "application/json");
        assert!(json["generationConfig"].get("temperature").is_none());
    }

    #[test]
    fn test_build_request_temperature() {
        let request = ModelRequest {
            model: "m".into(),
            prompt: "review".into(),
            temperature: Some(0.2),
            ..ModelRequest::default()
        };
        let json = serde_json::to_value(GeminiClient::build_request(&request)).unwrap();
        let temperature = json["generationConfig"]["temperature"].as_f64().unwrap();
        assert!((temperature - 0.2).abs() < 1e-6);
        assert!(json["generationConfig"].get("responseMimeType").is_none());

        let plain = ModelRequest { model: "m".into(), prompt: "p".into(), ..ModelRequest::default() };
        let json = serde_json::to_value(GeminiClient::build_request(&plain)).unwrap();
        assert!(json.get("generationConfig").is_none());
    }
}
