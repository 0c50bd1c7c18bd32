use std::env;
use std::path::PathBuf;

/// Environment variable names - single source of truth
pub mod env_vars {
    /// Credential for the generative language API.
    pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
    /// Legacy name for the same credential, read when GEMINI_API_KEY is unset.
    pub const API_KEY: &str = "API_KEY";
    pub const PORT: &str = "PORT";
    /// Directory for persisted preferences (theme).
    pub const DATA_DIR: &str = "PAPER_DATA_DIR";
    /// Override the API base URL (used by tests and proxies).
    pub const GEMINI_BASE_URL: &str = "GEMINI_BASE_URL";
    pub const ANALYSIS_MODEL: &str = "GEMINI_ANALYSIS_MODEL";
    pub const OCR_MODEL: &str = "GEMINI_OCR_MODEL";
    /// Directory of the built web UI to serve at `/` (optional).
    pub const FRONTEND_DIST: &str = "PAPER_FRONTEND_DIST";
}

/// Default values
pub mod defaults {
    pub const PORT: u16 = 8080;
    pub const DATA_DIR: &str = ".paper";
    pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
    pub const ANALYSIS_MODEL: &str = "gemini-2.5-flash-lite";
    pub const OCR_MODEL: &str = "gemini-2.0-flash-exp";
    pub const PREFERENCES_FILE: &str = "preferences.ron";
    /// Upstream request timeout in seconds
    pub const REQUEST_TIMEOUT_SECS: u64 = 60;
}

#[derive(Clone, Debug)]
pub struct Config {
    /// None when no credential is configured; analysis and OCR then fail
    /// with a configuration error before any network attempt.
    pub api_key: Option<String>,
    pub port: u16,
    pub data_dir: PathBuf,
    pub gemini_base_url: String,
    pub analysis_model: String,
    pub ocr_model: String,
    pub frontend_dist: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let api_key = non_empty_var(env_vars::GEMINI_API_KEY)
            .or_else(|| non_empty_var(env_vars::API_KEY));

        let port = match env::var(env_vars::PORT) {
            Ok(raw) => raw.parse().unwrap_or_else(|e| {
                log::warn!("Invalid {} value '{}': {}, using {}", env_vars::PORT, raw, e, defaults::PORT);
                defaults::PORT
            }),
            Err(_) => defaults::PORT,
        };

        Self {
            api_key,
            port,
            data_dir: PathBuf::from(
                env::var(env_vars::DATA_DIR).unwrap_or_else(|_| defaults::DATA_DIR.to_string()),
            ),
            gemini_base_url: env::var(env_vars::GEMINI_BASE_URL)
                .unwrap_or_else(|_| defaults::GEMINI_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            analysis_model: env::var(env_vars::ANALYSIS_MODEL)
                .unwrap_or_else(|_| defaults::ANALYSIS_MODEL.to_string()),
            ocr_model: env::var(env_vars::OCR_MODEL)
                .unwrap_or_else(|_| defaults::OCR_MODEL.to_string()),
            frontend_dist: non_empty_var(env_vars::FRONTEND_DIST),
        }
    }

    /// Path of the persisted preferences file
    pub fn preferences_path(&self) -> PathBuf {
        self.data_dir.join(defaults::PREFERENCES_FILE)
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            port: defaults::PORT,
            data_dir: PathBuf::from(defaults::DATA_DIR),
            gemini_base_url: defaults::GEMINI_BASE_URL.to_string(),
            analysis_model: defaults::ANALYSIS_MODEL.to_string(),
            ocr_model: defaults::OCR_MODEL.to_string(),
            frontend_dist: None,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
