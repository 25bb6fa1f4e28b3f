//! Gemini-backed score oracle.
//!
//! Asks a search-grounded Gemini model for the current result of one match
//! and parses the JSON it is instructed to reply with. Every failure mode —
//! transport, HTTP status, missing candidates, unparsable payload — degrades
//! to [`OracleSnapshot::fallback`]; the caller never sees an error.

use std::str::FromStr;
use std::time::Instant;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::config::Config;
use crate::metrics;

use super::types::{MatchStatus, OracleSnapshot};
use super::ScoreOracle;

/// Internal failure of one Gemini query. Absorbed before leaving the module.
#[derive(Error, Debug)]
enum GeminiError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("oracle returned HTTP {0}")]
    BadStatus(reqwest::StatusCode),

    #[error("malformed oracle payload: {0}")]
    Malformed(&'static str),
}

/// Score oracle over the Gemini `generateContent` API with Google Search
/// grounding enabled.
#[derive(Debug, Clone)]
pub struct GeminiOracle {
    /// HTTP client for API requests.
    http: reqwest::Client,
    /// API base URL.
    base_url: String,
    /// Model identifier.
    model: String,
    /// API key passed as a query parameter.
    api_key: String,
}

impl GeminiOracle {
    /// Create a new Gemini oracle from config with tuned HTTP settings.
    pub fn new(config: &Config, api_key: String) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(config.http_timeout_ms))
            .connect_timeout(std::time::Duration::from_secs(2))
            .tcp_keepalive(std::time::Duration::from_secs(30))
            .pool_max_idle_per_host(config.http_pool_size)
            .pool_idle_timeout(std::time::Duration::from_secs(90))
            .build()
            .expect("failed to create HTTP client");

        Self {
            http,
            base_url: config.gemini_api_url.clone(),
            model: config.gemini_model.clone(),
            api_key,
        }
    }

    fn prompt(home_team: &str, away_team: &str) -> String {
        format!(
            "Search Google for the exact live result of today's football match \
             {home_team} vs {away_team}. If it has not started, give the kick-off \
             time. If it is over, give the final result.\n\n\
             Reply ONLY with this JSON format (no markdown):\n\
             {{\n\
               \"homeScore\": number (0 if not started),\n\
               \"awayScore\": number (0 if not started),\n\
               \"status\": \"live\" or \"scheduled\" or \"finished\",\n\
               \"startTime\": \"HH:MM\",\n\
               \"minute\": number (e.g. 45, or null if not started/finished)\n\
             }}"
        )
    }

    async fn search(&self, home_team: &str, away_team: &str) -> Result<OracleSnapshot, GeminiError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": Self::prompt(home_team, away_team) }] }],
            // Enables Google Search grounding for fresh scores
            "tools": [{ "google_search": {} }],
        });

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GeminiError::BadStatus(response.status()));
        }

        let payload: GenerateContentResponse = response.json().await?;
        let text = payload
            .first_text()
            .ok_or(GeminiError::Malformed("no candidate text"))?;

        parse_snapshot_text(&text).ok_or(GeminiError::Malformed("unparsable snapshot"))
    }
}

#[async_trait]
impl ScoreOracle for GeminiOracle {
    #[instrument(skip(self))]
    async fn fetch_snapshot(&self, home_team: &str, away_team: &str) -> OracleSnapshot {
        metrics::inc_oracle_requests();
        let start = Instant::now();

        let snapshot = match self.search(home_team, away_team).await {
            Ok(snapshot) => {
                debug!(status = %snapshot.status, "oracle snapshot received");
                snapshot
            }
            Err(e) => {
                warn!(error = %e, "oracle query failed, substituting fallback snapshot");
                metrics::inc_oracle_fallbacks();
                OracleSnapshot::fallback()
            }
        };

        metrics::record_oracle_fetch_latency(start);
        snapshot
    }
}

/// Gemini generateContent response. Only the first candidate text matters.
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<ContentPart>>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    text: Option<String>,
}

impl GenerateContentResponse {
    fn first_text(&self) -> Option<String> {
        self.candidates
            .as_ref()?
            .first()?
            .content
            .as_ref()?
            .parts
            .as_ref()?
            .first()?
            .text
            .clone()
    }
}

/// Snapshot as the model writes it. All fields optional; validation decides
/// whether it becomes a usable snapshot.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSnapshot {
    home_score: Option<u32>,
    away_score: Option<u32>,
    status: Option<String>,
    start_time: Option<String>,
    minute: Option<u32>,
}

impl RawSnapshot {
    fn into_snapshot(self) -> Option<OracleSnapshot> {
        let status = MatchStatus::from_str(self.status.as_deref()?).ok()?;
        // The oracle cannot put a record back into the core's search state
        if status == MatchStatus::Searching {
            return None;
        }

        Some(OracleSnapshot {
            home_score: self.home_score?,
            away_score: self.away_score?,
            status,
            start_time: self
                .start_time
                .unwrap_or_else(|| OracleSnapshot::PLACEHOLDER_KICKOFF.to_string()),
            minute: self.minute,
        })
    }
}

/// Parse the model's reply text into a snapshot, tolerating markdown fences.
fn parse_snapshot_text(text: &str) -> Option<OracleSnapshot> {
    let clean = text.replace("```json", "").replace("```", "");
    let raw: RawSnapshot = serde_json::from_str(clean.trim()).ok()?;
    raw.into_snapshot()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_snapshot_text() {
        let text = r#"{"homeScore": 2, "awayScore": 1, "status": "live", "startTime": "20:45", "minute": 67}"#;
        let snapshot = parse_snapshot_text(text).unwrap();
        assert_eq!(snapshot.home_score, 2);
        assert_eq!(snapshot.away_score, 1);
        assert_eq!(snapshot.status, MatchStatus::Live);
        assert_eq!(snapshot.start_time, "20:45");
        assert_eq!(snapshot.minute, Some(67));
    }

    #[test]
    fn strips_markdown_fences() {
        let text = "```json\n{\"homeScore\": 0, \"awayScore\": 0, \"status\": \"scheduled\", \"startTime\": \"18:00\", \"minute\": null}\n```";
        let snapshot = parse_snapshot_text(text).unwrap();
        assert_eq!(snapshot.status, MatchStatus::Scheduled);
        assert_eq!(snapshot.minute, None);
    }

    #[test]
    fn missing_kickoff_defaults_to_placeholder() {
        let text = r#"{"homeScore": 1, "awayScore": 0, "status": "finished"}"#;
        let snapshot = parse_snapshot_text(text).unwrap();
        assert_eq!(snapshot.start_time, OracleSnapshot::PLACEHOLDER_KICKOFF);
    }

    #[test]
    fn rejects_malformed_payloads() {
        assert!(parse_snapshot_text("not json at all").is_none());
        assert!(parse_snapshot_text(r#"{"homeScore": 1}"#).is_none());
        assert!(
            parse_snapshot_text(
                r#"{"homeScore": 1, "awayScore": 0, "status": "postponed", "startTime": "x"}"#
            )
            .is_none()
        );
        // The oracle may not report the core-internal search state
        assert!(
            parse_snapshot_text(
                r#"{"homeScore": 0, "awayScore": 0, "status": "searching", "startTime": "x"}"#
            )
            .is_none()
        );
    }

    #[test]
    fn prompt_names_both_teams() {
        let prompt = GeminiOracle::prompt("Napoli", "Juventus");
        assert!(prompt.contains("Napoli vs Juventus"));
        assert!(prompt.contains("homeScore"));
    }
}
