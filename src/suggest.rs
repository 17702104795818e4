//! Suggestion provider: converts free text into structured task and
//! music-discovery results through a remote model API. Calls are fallible;
//! callers decide the UI treatment and keep the designed fallbacks (empty
//! list for tasks, apology text for music).

use log::warn;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::models::Priority;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const SUGGEST_MODEL: &str = "gemini-3-flash-preview";
const DISCOVERY_MODEL: &str = "gemini-3-pro-preview";

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("no API key set; export API_KEY or GEMINI_API_KEY")]
    MissingApiKey,
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("malformed provider response: {0}")]
    Malformed(String),
}

/// A candidate task returned by the provider, already validated at this
/// trust boundary: title non-blank, priority one of the known levels.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskSuggestion {
    pub title: String,
    pub priority: Priority,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MusicLink {
    pub title: String,
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MusicDiscovery {
    pub text: String,
    pub links: Vec<MusicLink>,
}

impl MusicDiscovery {
    /// Designed fallback for the unavailable case
    pub fn unavailable() -> Self {
        Self {
            text: "Sorry, I couldn't connect to the music search right now.".to_string(),
            links: Vec::new(),
        }
    }
}

pub trait SuggestionProvider {
    fn suggest_tasks(&self, context: &str) -> Result<Vec<TaskSuggestion>, ProviderError>;
    fn find_music(&self, query: &str) -> Result<MusicDiscovery, ProviderError>;
}

// --- Wire types -----------------------------------------------------------

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
    #[serde(rename = "groundingMetadata")]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<Part>>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GroundingMetadata {
    #[serde(rename = "groundingChunks")]
    grounding_chunks: Option<Vec<GroundingChunk>>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    web: Option<WebSource>,
}

#[derive(Debug, Deserialize)]
struct WebSource {
    uri: Option<String>,
    title: Option<String>,
}

/// Shape of one entry in the JSON-schema constrained suggestion response
#[derive(Debug, Deserialize)]
struct WireSuggestion {
    title: String,
    priority: String,
}

impl GenerateResponse {
    fn text(&self) -> Option<String> {
        let parts = self
            .candidates
            .as_ref()?
            .first()?
            .content
            .as_ref()?
            .parts
            .as_ref()?;
        let text: String = parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect::<Vec<_>>()
            .join("");
        if text.is_empty() { None } else { Some(text) }
    }

    fn web_links(&self) -> Vec<MusicLink> {
        let Some(chunks) = self
            .candidates
            .as_ref()
            .and_then(|c| c.first())
            .and_then(|c| c.grounding_metadata.as_ref())
            .and_then(|m| m.grounding_chunks.as_ref())
        else {
            return Vec::new();
        };

        chunks
            .iter()
            .filter_map(|chunk| {
                let web = chunk.web.as_ref()?;
                Some(MusicLink {
                    title: web.title.clone()?,
                    uri: web.uri.clone()?,
                })
            })
            .collect()
    }
}

/// Validate the provider's raw suggestion JSON. Entries with a blank title
/// or a priority outside {low, medium, high} are dropped with a warning;
/// they never reach storage.
pub fn parse_suggestions(raw: &str) -> Result<Vec<TaskSuggestion>, ProviderError> {
    let wire: Vec<WireSuggestion> =
        serde_json::from_str(raw).map_err(|e| ProviderError::Malformed(e.to_string()))?;

    let suggestions = wire
        .into_iter()
        .filter_map(|entry| {
            let title = entry.title.trim();
            if title.is_empty() {
                warn!("dropping suggestion with blank title");
                return None;
            }
            match entry.priority.parse::<Priority>() {
                Ok(priority) => Some(TaskSuggestion {
                    title: title.to_string(),
                    priority,
                }),
                Err(err) => {
                    warn!("dropping suggestion '{}': {}", title, err);
                    None
                }
            }
        })
        .collect();

    Ok(suggestions)
}

// --- Remote implementation ------------------------------------------------

pub struct GeminiProvider {
    client: reqwest::blocking::Client,
    api_key: String,
}

impl GeminiProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            api_key,
        }
    }

    /// Read the API key from the environment (`API_KEY`, then
    /// `GEMINI_API_KEY`)
    pub fn from_env() -> Result<Self, ProviderError> {
        let api_key = std::env::var("API_KEY")
            .or_else(|_| std::env::var("GEMINI_API_KEY"))
            .map_err(|_| ProviderError::MissingApiKey)?;
        Ok(Self::new(api_key))
    }

    fn generate(
        &self,
        model: &str,
        body: &serde_json::Value,
    ) -> Result<GenerateResponse, ProviderError> {
        let url = format!("{}/{}:generateContent", API_BASE, model);
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()?
            .error_for_status()?
            .json::<GenerateResponse>()?;
        Ok(response)
    }
}

impl SuggestionProvider for GeminiProvider {
    fn suggest_tasks(&self, context: &str) -> Result<Vec<TaskSuggestion>, ProviderError> {
        let body = json!({
            "contents": [{
                "parts": [{
                    "text": format!(
                        "Based on this goal or context: \"{}\", suggest 3-5 specific, \
                         actionable daily tasks. Keep them concise.",
                        context
                    )
                }]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "title": { "type": "STRING" },
                            "priority": { "type": "STRING", "enum": ["low", "medium", "high"] }
                        },
                        "required": ["title", "priority"]
                    }
                }
            }
        });

        let response = self.generate(SUGGEST_MODEL, &body)?;
        let text = response
            .text()
            .ok_or_else(|| ProviderError::Malformed("empty suggestion response".to_string()))?;
        parse_suggestions(&text)
    }

    fn find_music(&self, query: &str) -> Result<MusicDiscovery, ProviderError> {
        let body = json!({
            "contents": [{
                "parts": [{
                    "text": format!(
                        "Find me high-quality focus music or playlists for: \"{}\". \
                         Provide a helpful summary of why these are good for productivity.",
                        query
                    )
                }]
            }],
            "tools": [{ "googleSearch": {} }]
        });

        let response = self.generate(DISCOVERY_MODEL, &body)?;
        let text = response
            .text()
            .unwrap_or_else(|| "Here is what I found:".to_string());
        let links = response.web_links();

        Ok(MusicDiscovery { text, links })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn well_formed_suggestions_parse_with_typed_priorities() {
        let raw = r#"[
            {"title": "Stretch", "priority": "medium"},
            {"title": "Plan the week", "priority": "high"}
        ]"#;
        let suggestions = parse_suggestions(raw).unwrap();
        assert_eq!(
            suggestions,
            vec![
                TaskSuggestion {
                    title: "Stretch".into(),
                    priority: Priority::Medium
                },
                TaskSuggestion {
                    title: "Plan the week".into(),
                    priority: Priority::High
                },
            ]
        );
    }

    #[test]
    fn unknown_priorities_are_dropped_not_stored() {
        let raw = r#"[
            {"title": "Stretch", "priority": "medium"},
            {"title": "Panic", "priority": "critical"}
        ]"#;
        let suggestions = parse_suggestions(raw).unwrap();
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].title, "Stretch");
    }

    #[test]
    fn blank_titles_are_dropped() {
        let raw = r#"[
            {"title": "   ", "priority": "low"},
            {"title": "Walk", "priority": "low"}
        ]"#;
        let suggestions = parse_suggestions(raw).unwrap();
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].title, "Walk");
    }

    #[test]
    fn garbage_payload_is_a_malformed_error() {
        assert!(matches!(
            parse_suggestions("not json"),
            Err(ProviderError::Malformed(_))
        ));
    }

    #[test]
    fn response_text_joins_candidate_parts() {
        let response: GenerateResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [
                {"text": "Hello "}, {"text": "world"}
            ]}}]}"#,
        )
        .unwrap();
        assert_eq!(response.text().unwrap(), "Hello world");
    }

    #[test]
    fn grounding_links_require_both_title_and_uri() {
        let response: GenerateResponse = serde_json::from_str(
            r#"{"candidates": [{
                "content": {"parts": [{"text": "ok"}]},
                "groundingMetadata": {"groundingChunks": [
                    {"web": {"uri": "https://example.com/a", "title": "A"}},
                    {"web": {"uri": "https://example.com/b"}},
                    {}
                ]}
            }]}"#,
        )
        .unwrap();
        let links = response.web_links();
        assert_eq!(
            links,
            vec![MusicLink {
                title: "A".into(),
                uri: "https://example.com/a".into()
            }]
        );
    }

    #[test]
    fn unavailable_fallback_has_apology_and_no_links() {
        let fallback = MusicDiscovery::unavailable();
        assert!(fallback.text.starts_with("Sorry"));
        assert!(fallback.links.is_empty());
    }
}
