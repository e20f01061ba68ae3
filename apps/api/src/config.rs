use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::llm_client::DEFAULT_BASE_URL;

/// Which drafting backend serves generation requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmBackend {
    Remote,
    Mock,
}

impl LlmBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            LlmBackend::Remote => "remote",
            LlmBackend::Mock => "mock",
        }
    }
}

impl FromStr for LlmBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "remote" => Ok(LlmBackend::Remote),
            "mock" => Ok(LlmBackend::Mock),
            other => bail!("LLM_BACKEND must be 'remote' or 'mock', got '{other}'"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Nothing is required: a missing token only fails generation requests.
#[derive(Debug, Clone)]
pub struct Config {
    pub huggingface_token: Option<String>,
    pub llm_base_url: String,
    pub llm_backend: LlmBackend,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Config {
            huggingface_token: lookup("HUGGINGFACE_TOKEN").filter(|t| !t.trim().is_empty()),
            llm_base_url: lookup("LLM_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            llm_backend: lookup("LLM_BACKEND")
                .as_deref()
                .unwrap_or("remote")
                .parse()?,
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}
