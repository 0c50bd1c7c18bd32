use thiserror::Error;

/// Failure taxonomy for analysis and OCR requests.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// No API credential configured. Raised before any network attempt.
    #[error("{0}")]
    Configuration(String),

    /// Transport failure, non-success status, or empty payload.
    #[error("{0}")]
    Upstream(String),

    /// Payload did not decode against the expected response schema.
    #[error("Malformed response from model: {0}")]
    MalformedResponse(String),

    /// Rejected input (oversized or non-image upload, empty input).
    #[error("{0}")]
    Validation(String),
}

impl AnalysisError {
    pub fn missing_credential() -> Self {
        AnalysisError::Configuration(
            "GEMINI_API_KEY is not set in environment variables".to_string(),
        )
    }

    /// Malformed responses propagate the same way upstream failures do.
    pub fn is_upstream(&self) -> bool {
        matches!(self, AnalysisError::Upstream(_) | AnalysisError::MalformedResponse(_))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::Configuration(_) => "configuration",
            AnalysisError::Upstream(_) => "upstream",
            AnalysisError::MalformedResponse(_) => "malformed_response",
            AnalysisError::Validation(_) => "validation",
        }
    }
}

impl From<reqwest::Error> for AnalysisError {
    fn from(e: reqwest::Error) -> Self {
        AnalysisError::Upstream(format!("Request to model failed: {}", e))
    }
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
