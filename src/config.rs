use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Bounds applied while reading the comment file.
#[derive(Clone, Debug)]
pub struct ExtractConfig {
    /// Maximum number of accepted comments per run.
    pub limit: usize,
    /// Maximum characters kept per cleaned comment.
    pub char_limit: usize,
    /// Minimum length of the raw trimmed message for a record to count.
    pub min_length: usize,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub comments_path: PathBuf,
    pub groq_base_url: String,
    pub groq_api_key: String,
    pub groq_model: String,
    pub serper_base_url: String,
    pub serper_api_key: String,
    pub extract: ExtractConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let comments_path = env::var("SONGSCOUT_COMMENTS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./comments.txt"));

        Ok(Self {
            comments_path,
            groq_base_url: env::var("GROQ_BASE_URL")
                .unwrap_or_else(|_| "https://api.groq.com/openai/v1".to_string()),
            groq_api_key: env::var("GROQ_API_KEY")
                .context("GROQ_API_KEY must be set to call the extraction model")?,
            groq_model: env::var("GROQ_MODEL").unwrap_or_else(|_| "llama3-70b-8192".to_string()),
            serper_base_url: env::var("SERPER_BASE_URL")
                .unwrap_or_else(|_| "https://google.serper.dev".to_string()),
            serper_api_key: env::var("SERPER_API_KEY")
                .context("SERPER_API_KEY must be set to look up missing artists")?,
            extract: ExtractConfig {
                limit: env::var("COMMENT_LIMIT")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(15),
                char_limit: env::var("COMMENT_CHAR_LIMIT")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(350),
                min_length: env::var("COMMENT_MIN_LENGTH")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(3),
            },
        })
    }
}
