use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::models::Candidate;
use crate::pipeline::SongExtractor;

/// Chat-completions client for the Groq OpenAI-compatible endpoint.
#[derive(Clone)]
pub struct GroqClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

/// The structured payload the extraction prompt asks the model to emit.
#[derive(Debug, Deserialize)]
struct ExtractionPayload {
    #[serde(default)]
    songs: Vec<Candidate>,
}

impl GroqClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    async fn request_extraction(&self, prompt: &str) -> Result<Vec<Candidate>> {
        #[derive(Serialize)]
        struct ChatReq<'a> {
            model: &'a str,
            messages: [ChatMessage<'a>; 1],
            response_format: ResponseFormat<'a>,
        }

        #[derive(Serialize)]
        struct ChatMessage<'a> {
            role: &'a str,
            content: &'a str,
        }

        #[derive(Serialize)]
        struct ResponseFormat<'a> {
            #[serde(rename = "type")]
            kind: &'a str,
        }

        #[derive(Deserialize)]
        struct ChatResp {
            choices: Vec<Choice>,
        }

        #[derive(Deserialize)]
        struct Choice {
            message: ChoiceMessage,
        }

        #[derive(Deserialize)]
        struct ChoiceMessage {
            content: String,
        }

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&ChatReq {
                model: &self.model,
                messages: [ChatMessage {
                    role: "user",
                    content: prompt,
                }],
                response_format: ResponseFormat {
                    kind: "json_object",
                },
            })
            .send()
            .await
            .context("failed to call groq chat completions endpoint")?;

        if response.status() != StatusCode::OK {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            // JSON-mode failures carry the aborted generation in the error
            // body; try to parse it before giving up.
            if let Some(salvaged) = salvage_failed_generation(&body) {
                tracing::warn!(
                    "groq returned {status}; salvaged {} candidates from failed generation",
                    salvaged.len()
                );
                return Ok(salvaged);
            }
            anyhow::bail!(
                "groq chat completions returned {status}: {}",
                normalize_err_body(&body)
            );
        }

        let response = response
            .json::<ChatResp>()
            .await
            .context("failed to decode groq chat completions response")?;

        let content = response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .unwrap_or_default();

        let payload: ExtractionPayload = serde_json::from_str(&content)
            .context("groq response content was not the expected songs JSON")?;

        Ok(payload.songs)
    }
}

#[async_trait]
impl SongExtractor for GroqClient {
    async fn extract_candidates(&self, comments: &[String]) -> Vec<Candidate> {
        let prompt = extraction_prompt(comments);
        match self.request_extraction(&prompt).await {
            Ok(songs) => songs,
            Err(err) => {
                tracing::warn!("song extraction degraded to empty: {err:#}");
                Vec::new()
            }
        }
    }
}

/// Builds the extraction instruction with the newline-joined comments as
/// context.
fn extraction_prompt(comments: &[String]) -> String {
    let context = comments.join("\n");
    format!(
        "You are a music expert. Below are Instagram comments guessing songs in a video:\n\n\
         {context}\n\n\
         Extract all mentioned song titles and artists. If no artist is mentioned, leave it blank. \
         Include songs even if mentioned indirectly (e.g., lyrics or partial titles). \
         Do not treat band names (e.g., 'big thief', 'coldplay') as song titles unless clearly indicated. \
         Remove '@' from artist names (e.g., '@greenday' -> 'greenday'). \
         Output in JSON format with a field `songs` containing a list of objects with `song` and `artist` fields. \
         Ensure the output is valid JSON."
    )
}

/// Best-effort recovery from a JSON-mode failure: pull the partial generation
/// out of the error body, drop the known `scriptId` artifact, and re-parse.
/// Kept separate from the main path so the heuristic can change on its own.
fn salvage_failed_generation(body: &str) -> Option<Vec<Candidate>> {
    let error: serde_json::Value = serde_json::from_str(body).ok()?;
    let failed = error
        .get("error")?
        .get("failed_generation")?
        .as_str()?;

    let cleaned = failed.replace("scriptId", "");
    let payload: ExtractionPayload = serde_json::from_str(&cleaned).ok()?;
    Some(payload.songs)
}

fn normalize_err_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }

    if let Ok(json) = serde_json::from_str::<serde_json::Value>(trimmed) {
        if let Some(message) = json
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|v| v.as_str())
        {
            return message.to_string();
        }
    }

    trimmed.to_string()
}
