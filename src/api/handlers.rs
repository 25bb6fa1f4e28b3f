//! HTTP API handlers.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};

use crate::outcome::{self, BetOutcome};
use crate::tracker::{MatchPoller, MatchRecord, SlipStore};

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// Whether the service is ready to accept slips.
    pub ready: Arc<std::sync::atomic::AtomicBool>,
    /// The slip store (read side).
    pub store: Arc<SlipStore>,
    /// The poller (write side).
    pub poller: Arc<MatchPoller>,
    /// Prometheus render handle, when the recorder is installed.
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new app state around a store/poller pair.
    pub fn new(store: Arc<SlipStore>, poller: Arc<MatchPoller>) -> Self {
        Self {
            ready: Arc::new(std::sync::atomic::AtomicBool::new(false)),
            store,
            poller,
            prometheus: None,
        }
    }

    /// Attach a Prometheus render handle for the /metrics endpoint.
    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }

    /// Set ready state.
    pub fn set_ready(&self, ready: bool) {
        self.ready
            .store(ready, std::sync::atomic::Ordering::SeqCst);
    }

    /// Check if ready.
    pub fn is_ready(&self) -> bool {
        self.ready.load(std::sync::atomic::Ordering::SeqCst)
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
}

/// Readiness check response.
#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    /// Whether service is ready.
    pub ready: bool,
}

/// Slip submission request body.
#[derive(Debug, Deserialize)]
pub struct SubmitSlipRequest {
    /// Free-text slip, one wager per line.
    pub text: String,
}

/// Slip submission response.
#[derive(Debug, Serialize)]
pub struct SubmitSlipResponse {
    /// Number of recognized bets.
    pub count: usize,
}

/// Validation error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable message.
    pub error: String,
}

/// One record plus its derived fields.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchView {
    /// The tracked record.
    #[serde(flatten)]
    pub record: MatchRecord,
    /// Current bet standing.
    pub outcome: BetOutcome,
    /// Whether the match is in play.
    pub is_live: bool,
}

/// Full slip snapshot with aggregates.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlipResponse {
    /// Records in slip order.
    pub matches: Vec<MatchView>,
    /// Percentage of bets currently won.
    pub progress: f64,
    /// Every bet currently won (false for an empty slip).
    pub all_won: bool,
    /// At least one bet currently lost.
    pub any_lost: bool,
    /// Initial load still in progress.
    pub loading: bool,
}

/// Health check handler - always returns 200.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// Readiness check handler - returns 200 if ready, 503 otherwise.
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    let is_ready = state.is_ready();
    let response = ReadyResponse { ready: is_ready };

    if is_ready {
        (StatusCode::OK, Json(response))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(response))
    }
}

/// Prometheus metrics render handler.
pub async fn render_metrics(State(state): State<AppState>) -> impl IntoResponse {
    match &state.prometheus {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, String::new()),
    }
}

/// Submit a new slip, replacing any active one.
pub async fn submit_slip(
    State(state): State<AppState>,
    Json(request): Json<SubmitSlipRequest>,
) -> impl IntoResponse {
    match state.poller.submit_slip(&request.text) {
        Ok(count) => (StatusCode::OK, Json(SubmitSlipResponse { count })).into_response(),
        Err(e) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}

/// Current slip snapshot with progress and summary flags.
pub async fn get_slip(State(state): State<AppState>) -> impl IntoResponse {
    let records = state.store.snapshot();
    let progress = outcome::progress(&records);
    let all_won = outcome::all_won(&records);
    let any_lost = outcome::any_lost(&records);

    let matches = records
        .into_iter()
        .map(|record| MatchView {
            outcome: outcome::evaluate(&record),
            is_live: record.is_live(),
            record,
        })
        .collect();

    Json(SlipResponse {
        matches,
        progress,
        all_won,
        any_lost,
        loading: state.store.is_loading(),
    })
}

/// Manual refresh of every record, finished matches included.
pub async fn refresh_slip(State(state): State<AppState>) -> impl IntoResponse {
    state.poller.refresh_all();
    StatusCode::ACCEPTED
}

/// Discard the current slip.
pub async fn clear_slip(State(state): State<AppState>) -> impl IntoResponse {
    state.poller.clear();
    StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::oracle::{OfflineOracle, ScoreOracle};

    fn test_state() -> AppState {
        let store = Arc::new(SlipStore::new());
        let oracle: Arc<dyn ScoreOracle> = Arc::new(OfflineOracle::new());
        let poller = Arc::new(MatchPoller::new(
            Arc::clone(&store),
            oracle,
            &Config::default(),
        ));
        AppState::new(store, poller)
    }

    #[tokio::test]
    async fn app_state_ready_toggle() {
        let state = test_state();
        assert!(!state.is_ready());

        state.set_ready(true);
        assert!(state.is_ready());

        state.set_ready(false);
        assert!(!state.is_ready());
    }
}
