//! Note analysis: paragraph segmentation, model calls, response decoding.
//!
//! The hosted model does the mood/importance/keyword classification and
//! OCR. This module owns everything around it: splitting input, checking
//! the credential, shaping the request, and validating what comes back.

pub mod decode;
pub mod error;
pub mod gemini;
pub mod prompt;
pub mod segmenter;
pub mod service;

pub use error::AnalysisError;
pub use gemini::GeminiClient;
pub use segmenter::split_paragraphs;
pub use service::{AnalysisService, ImageUpload, MAX_IMAGE_SIZE};
