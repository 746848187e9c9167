use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::crypto::{CryptoError, ReportKey};
use crate::pipeline::explain::{
    LanguageModel, LlmError, OllamaClient, OpenAiClient, DEFAULT_OLLAMA_MODEL, DEFAULT_OLLAMA_URL,
    DEFAULT_OPENAI_MODEL, DEFAULT_OPENAI_URL,
};
use crate::pipeline::extraction::TesseractCli;

/// Application-level constants
pub const APP_NAME: &str = "Labsense";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_OCR_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_HISTORY_LIMIT: usize = 5;

/// Filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "labsense=info"
}

/// ~/Labsense/ on all platforms. Falls back to the working directory
/// when no home directory can be determined.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

pub fn default_database_path() -> PathBuf {
    app_data_dir().join("reports.db")
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },

    #[error("Invalid LABSENSE_ENCRYPTION_KEY: {0}")]
    InvalidKey(#[from] CryptoError),
}

// ═══════════════════════════════════════════
// Language model settings
// ═══════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    OpenAi,
    Ollama,
}

impl std::str::FromStr for LlmProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "ollama" => Ok(Self::Ollama),
            other => Err(format!("unknown provider '{other}', expected openai or ollama")),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct LlmSettings {
    pub provider: LlmProvider,
    pub model: Option<String>,
    pub openai_api_key: Option<String>,
    pub ollama_url: Option<String>,
    pub timeout_secs: u64,
}

impl LlmSettings {
    pub fn model_name(&self) -> &str {
        match (&self.model, self.provider) {
            (Some(model), _) => model,
            (None, LlmProvider::OpenAi) => DEFAULT_OPENAI_MODEL,
            (None, LlmProvider::Ollama) => DEFAULT_OLLAMA_MODEL,
        }
    }

    /// Build the client for the configured provider.
    pub fn language_model(&self) -> Result<LanguageModel, LlmError> {
        let model = self.model_name();
        match self.provider {
            LlmProvider::OpenAi => {
                let key = self.openai_api_key.as_deref().unwrap_or_default();
                let client = OpenAiClient::new(DEFAULT_OPENAI_URL, key, self.timeout_secs)?;
                Ok(LanguageModel::enabled(client, model))
            }
            LlmProvider::Ollama => {
                let url = self.ollama_url.as_deref().unwrap_or(DEFAULT_OLLAMA_URL);
                let client = OllamaClient::new(url, self.timeout_secs)?;
                Ok(LanguageModel::enabled(client, model))
            }
        }
    }

    /// Like `language_model`, but a misconfigured provider degrades to
    /// template explanations.
    pub fn language_model_or_disabled(&self) -> LanguageModel {
        match self.language_model() {
            Ok(model) => model,
            Err(e) => {
                tracing::warn!(error = %e, "Language model unavailable, explanations use templates");
                LanguageModel::Disabled
            }
        }
    }
}

impl std::fmt::Debug for LlmSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmSettings")
            .field("provider", &self.provider)
            .field("model", &self.model_name())
            .field("openai_api_key", &self.openai_api_key.as_ref().map(|_| ".."))
            .field("ollama_url", &self.ollama_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

// ═══════════════════════════════════════════
// Process configuration
// ═══════════════════════════════════════════

#[derive(Clone)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub encryption_key: Option<String>,
    pub bind_addr: SocketAddr,
    pub llm: LlmSettings,
    pub history_limit: usize,
    /// Upper bound on one `tesseract` run.
    pub ocr_timeout_secs: u64,
}

impl AppConfig {
    /// Read configuration from the process environment. Callers load
    /// `.env` first.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let database_path = var("LABSENSE_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(default_database_path);

        let bind_addr = parse_or("LABSENSE_BIND_ADDR", var("LABSENSE_BIND_ADDR"), || {
            DEFAULT_BIND_ADDR.parse().map_err(|e: std::net::AddrParseError| e.to_string())
        })?;

        let provider = parse_or("LABSENSE_LLM_PROVIDER", var("LABSENSE_LLM_PROVIDER"), || {
            Ok(LlmProvider::OpenAi)
        })?;

        let timeout_secs = parse_or(
            "LABSENSE_LLM_TIMEOUT_SECS",
            var("LABSENSE_LLM_TIMEOUT_SECS"),
            || Ok(DEFAULT_LLM_TIMEOUT_SECS),
        )?;

        let history_limit = parse_or(
            "LABSENSE_HISTORY_LIMIT",
            var("LABSENSE_HISTORY_LIMIT"),
            || Ok(DEFAULT_HISTORY_LIMIT),
        )?;

        let ocr_timeout_secs = parse_or(
            "LABSENSE_OCR_TIMEOUT_SECS",
            var("LABSENSE_OCR_TIMEOUT_SECS"),
            || Ok(DEFAULT_OCR_TIMEOUT_SECS),
        )?;

        Ok(Self {
            database_path,
            encryption_key: var("LABSENSE_ENCRYPTION_KEY"),
            bind_addr,
            llm: LlmSettings {
                provider,
                model: var("LABSENSE_LLM_MODEL"),
                openai_api_key: var("OPENAI_API_KEY"),
                ollama_url: var("OLLAMA_URL"),
                timeout_secs,
            },
            history_limit,
            ocr_timeout_secs,
        })
    }

    /// The system `tesseract`, bounded by `ocr_timeout_secs`.
    pub fn ocr_engine(&self) -> TesseractCli {
        TesseractCli::from_path(Duration::from_secs(self.ocr_timeout_secs))
    }

    /// Configured key, or a fresh one for this process only.
    pub fn report_key(&self) -> Result<ReportKey, ConfigError> {
        match &self.encryption_key {
            Some(encoded) => Ok(ReportKey::from_base64(encoded)?),
            None => {
                tracing::warn!(
                    "LABSENSE_ENCRYPTION_KEY not set, using an ephemeral key; stored reports will be unreadable after restart"
                );
                Ok(ReportKey::generate())
            }
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_path", &self.database_path)
            .field("encryption_key", &self.encryption_key.as_ref().map(|_| ".."))
            .field("bind_addr", &self.bind_addr)
            .field("llm", &self.llm)
            .field("history_limit", &self.history_limit)
            .field("ocr_timeout_secs", &self.ocr_timeout_secs)
            .finish()
    }
}

fn parse_or<T>(
    name: &'static str,
    raw: Option<String>,
    default: impl FnOnce() -> Result<T, String>,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let parsed = match raw {
        Some(raw) => raw.trim().parse::<T>().map_err(|e| e.to_string()),
        None => default(),
    };
    parsed.map_err(|reason| ConfigError::InvalidValue { name, reason })
}
