//! Typed HTTP client for the Generative Language API.

use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use super::error::{AnalysisError, AnalysisResult};
use super::service::ImageUpload;
use crate::config::{defaults, Config};

/// Seam between the analysis service and the hosted model.
#[async_trait]
pub trait ModelBackend: Send + Sync {
    /// Run a JSON-mode generation constrained by `schema`; returns the raw JSON text.
    async fn generate_structured(
        &self,
        api_key: &str,
        prompt: &str,
        schema: &Value,
    ) -> AnalysisResult<String>;

    /// Run a vision generation over one inline image; returns the raw text.
    async fn generate_from_image(
        &self,
        api_key: &str,
        prompt: &str,
        image: &ImageUpload,
    ) -> AnalysisResult<String>;
}

pub struct GeminiClient {
    base_url: String,
    analysis_model: String,
    ocr_model: String,
    client: reqwest::Client,
}

// ── API types ───────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RequestPart {
    Text {
        text: String,
    },
    #[serde(rename_all = "camelCase")]
    Inline {
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
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
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

const TEMPERATURE: f32 = 0.1;

// ── Client impl ─────────────────────────────────────

impl GeminiClient {
    pub fn new(base_url: &str, analysis_model: &str, ocr_model: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(defaults::REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|e| {
                log::warn!("Failed to build HTTP client with timeout: {}", e);
                reqwest::Client::new()
            });

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            analysis_model: analysis_model.to_string(),
            ocr_model: ocr_model.to_string(),
            client,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.gemini_base_url, &config.analysis_model, &config.ocr_model)
    }

    async fn generate(
        &self,
        api_key: &str,
        model: &str,
        body: &GenerateContentRequest,
    ) -> AnalysisResult<String> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            log::error!("Model {} returned {}: {}", model, status, message);
            return Err(AnalysisError::Upstream(format!(
                "Model request failed ({}): {}",
                status, message
            )));
        }

        let parsed: GenerateContentResponse = resp.json().await.map_err(|e| {
            AnalysisError::MalformedResponse(format!("invalid response envelope: {}", e))
        })?;

        let text = parsed
            .candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|c| &c.parts)
            .filter_map(|p| p.text.as_deref())
            .collect::<Vec<_>>()
            .join("");

        if text.trim().is_empty() {
            return Err(AnalysisError::Upstream("No response from AI".to_string()));
        }

        Ok(text)
    }
}

#[async_trait]
impl ModelBackend for GeminiClient {
    async fn generate_structured(
        &self,
        api_key: &str,
        prompt: &str,
        schema: &Value,
    ) -> AnalysisResult<String> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart::Text { text: prompt.to_string() }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                response_mime_type: Some("application/json"),
                response_schema: Some(schema.clone()),
            },
        };

        self.generate(api_key, &self.analysis_model, &body).await
    }

    async fn generate_from_image(
        &self,
        api_key: &str,
        prompt: &str,
        image: &ImageUpload,
    ) -> AnalysisResult<String> {
        let data = base64::engine::general_purpose::STANDARD.encode(&image.bytes);
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![
                    RequestPart::Text { text: prompt.to_string() },
                    RequestPart::Inline {
                        inline_data: InlineData {
                            mime_type: image.media_type.clone(),
                            data,
                        },
                    },
                ],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                response_mime_type: None,
                response_schema: None,
            },
        };

        self.generate(api_key, &self.ocr_model, &body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn text_response(text: &str) -> Value {
        json!({
            "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }]
        })
    }

    #[tokio::test]
    async fn test_structured_request_shape() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/test-model:generateContent"))
            .and(header("x-goog-api-key", "secret"))
            .and(body_partial_json(json!({
                "generationConfig": { "responseMimeType": "application/json" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(text_response("{\"ok\":true}")))
            .expect(1)
            .mount(&server)
            .await;

        let client = GeminiClient::new(&server.uri(), "test-model", "ocr-model");
        let out = client
            .generate_structured("secret", "prompt", &json!({"type": "OBJECT"}))
            .await
            .expect("generate");
        assert_eq!(out, "{\"ok\":true}");
    }

    #[tokio::test]
    async fn test_image_request_sends_inline_data() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/ocr-model:generateContent"))
            .and(body_partial_json(json!({
                "contents": [{ "parts": [{}, { "inlineData": { "mimeType": "image/png", "data": "AQID" } }] }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(text_response("Line 1\n\nLine 2")))
            .expect(1)
            .mount(&server)
            .await;

        let client = GeminiClient::new(&server.uri(), "test-model", "ocr-model");
        let image = ImageUpload {
            bytes: vec![1, 2, 3],
            media_type: "image/png".to_string(),
        };
        let out = client.generate_from_image("k", "prompt", &image).await.unwrap();
        assert_eq!(out, "Line 1\n\nLine 2");
    }

    #[tokio::test]
    async fn test_error_status_is_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(403)
                    .set_body_json(json!({ "error": { "code": 403, "message": "API key not valid" } })),
            )
            .mount(&server)
            .await;

        let client = GeminiClient::new(&server.uri(), "m", "o");
        let err = client.generate_structured("bad", "p", &json!({})).await.unwrap_err();
        match err {
            AnalysisError::Upstream(msg) => assert!(msg.contains("API key not valid")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_candidates_is_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
            .mount(&server)
            .await;

        let client = GeminiClient::new(&server.uri(), "m", "o");
        let err = client.generate_structured("k", "p", &json!({})).await.unwrap_err();
        assert!(matches!(err, AnalysisError::Upstream(_)));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_upstream() {
        let client = GeminiClient::new("http://127.0.0.1:1", "m", "o");
        let err = client.generate_structured("k", "p", &json!({})).await.unwrap_err();
        assert!(err.is_upstream());
    }
}
