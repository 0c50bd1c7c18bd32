//! Analysis orchestration: segment, check credential, call the model, decode.

use paper_types::AnalysisResponse;
use std::sync::Arc;

use super::decode::decode_analysis;
use super::error::{AnalysisError, AnalysisResult};
use super::gemini::ModelBackend;
use super::prompt::{analysis_prompt, analysis_response_schema, OCR_PROMPT};
use super::segmenter::split_paragraphs;

/// Largest accepted image upload.
pub const MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// An uploaded image awaiting text extraction.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub media_type: String,
}

impl ImageUpload {
    /// Reject empty, oversized, or non-image uploads.
    pub fn validate(&self) -> AnalysisResult<()> {
        if self.bytes.is_empty() {
            return Err(AnalysisError::Validation("No image data provided".to_string()));
        }
        if self.bytes.len() > MAX_IMAGE_SIZE {
            return Err(AnalysisError::Validation(
                "Image file is too large. Please select an image under 10MB.".to_string(),
            ));
        }
        if !self.media_type.trim().to_lowercase().starts_with("image/") {
            return Err(AnalysisError::Validation(format!(
                "Unsupported file type '{}'. Please upload an image.",
                self.media_type
            )));
        }
        Ok(())
    }
}

pub struct AnalysisService {
    backend: Arc<dyn ModelBackend>,
    api_key: Option<String>,
}

impl AnalysisService {
    pub fn new(backend: Arc<dyn ModelBackend>, api_key: Option<String>) -> Self {
        Self { backend, api_key }
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    fn credential(&self) -> AnalysisResult<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(AnalysisError::missing_credential)
    }

    /// Analyze raw note text. Blank input returns an empty result without
    /// touching the network.
    pub async fn analyze(&self, text: &str) -> AnalysisResult<AnalysisResponse> {
        let paragraphs = split_paragraphs(text);
        if paragraphs.is_empty() {
            return Ok(AnalysisResponse::empty());
        }

        let api_key = self.credential()?;

        log::info!("[ANALYSIS] Sending {} paragraphs for classification", paragraphs.len());

        let prompt = analysis_prompt(&paragraphs);
        let payload = self
            .backend
            .generate_structured(api_key, &prompt, &analysis_response_schema())
            .await
            .map_err(|e| {
                log::error!("[ANALYSIS] Model call failed: {}", e);
                wrap_upstream("Failed to analyze notes", e)
            })?;

        let result = decode_analysis(&payload).map_err(|e| {
            log::error!("[ANALYSIS] {}", e);
            e
        })?;

        if result.paragraphs.len() != paragraphs.len() {
            log::warn!(
                "[ANALYSIS] Model returned {} paragraphs for {} inputs",
                result.paragraphs.len(),
                paragraphs.len()
            );
        }

        Ok(result)
    }

    /// Transcribe lecture notes from an image.
    pub async fn extract_text(&self, image: &ImageUpload) -> AnalysisResult<String> {
        image.validate()?;
        let api_key = self.credential()?;

        log::info!(
            "[OCR] Extracting text from {} byte {} image",
            image.bytes.len(),
            image.media_type
        );

        let text = self
            .backend
            .generate_from_image(api_key, OCR_PROMPT, image)
            .await
            .map_err(|e| {
                log::error!("[OCR] Model call failed: {}", e);
                wrap_upstream("Failed to extract text from image", e)
            })?;

        let text = text.trim();
        if text.is_empty() {
            return Err(AnalysisError::Upstream(
                "No text extracted from image".to_string(),
            ));
        }
        Ok(text.to_string())
    }
}

fn wrap_upstream(context: &str, e: AnalysisError) -> AnalysisError {
    match e {
        AnalysisError::Upstream(msg) => AnalysisError::Upstream(format!("{}: {}", context, msg)),
        other => other,
    }
}
