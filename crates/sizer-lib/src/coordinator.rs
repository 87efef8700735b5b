//! Request coordination
//!
//! Owns the concurrency contract for a session: one request in flight at
//! a time, latest submission wins, and a single outcome slot guarded by
//! single-writer discipline. Cancellation is logical: a superseded
//! request's result is discarded, never delivered.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::engine::SizingEngine;
use crate::error::{FieldError, NormalizeError, SizingError};
use crate::models::{RecommendationRequest, SizingRecommendation};
use crate::normalizer;

/// Default simulated backend round-trip, matching the interactive
/// experience the sizing flow was designed around
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(1500);

/// Upper bound on a single submit before it is failed as timed out
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Coordinator tuning knobs; tests run with zero latency
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Injected latency standing in for a real backend round trip
    pub latency: Duration,
    /// Expiry after which a submit is reported as an internal failure
    pub timeout: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            latency: DEFAULT_LATENCY,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl CoordinatorConfig {
    /// Configuration with no simulated latency, for tests and embeddings
    /// that want the engine's real (sub-millisecond) response time
    pub fn immediate() -> Self {
        Self {
            latency: Duration::ZERO,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Everything `submit` can resolve to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RecommendationOutcome {
    Success {
        recommendations: Vec<SizingRecommendation>,
    },
    ValidationFailed {
        errors: Vec<FieldError>,
    },
    ParseFailed {
        reason: String,
    },
    InsufficientData,
    InternalFailure {
        reason: String,
    },
    /// A later submit replaced this request before it completed; its
    /// result was discarded
    Superseded,
}

/// Observable session state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    InFlight,
}

/// Coordinates recommendation requests for one session.
///
/// Holds exactly one mutable slot (the latest committed outcome); only
/// the most recent submit may write it.
pub struct RequestCoordinator {
    engine: SizingEngine,
    config: CoordinatorConfig,
    latest: AtomicU64,
    in_flight: AtomicUsize,
    slot: RwLock<Option<RecommendationOutcome>>,
}

impl RequestCoordinator {
    pub fn new(engine: SizingEngine, config: CoordinatorConfig) -> Self {
        Self {
            engine,
            config,
            latest: AtomicU64::new(0),
            in_flight: AtomicUsize::new(0),
            slot: RwLock::new(None),
        }
    }

    /// Submit one recommendation request.
    ///
    /// Suspends the caller until an outcome is available. If another
    /// submit arrives while this one is in flight, this request is
    /// superseded: its outcome is discarded and `Superseded` is returned
    /// to this caller, while the slot only ever reflects the latest
    /// request.
    pub async fn submit(&self, request: RecommendationRequest) -> RecommendationOutcome {
        let token = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        self.in_flight.fetch_add(1, Ordering::SeqCst);

        let outcome = self.run(request, token).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        // Commit only if no later submit has taken over
        if self.latest.load(Ordering::SeqCst) == token {
            let mut slot = self.slot.write().await;
            if self.latest.load(Ordering::SeqCst) == token {
                *slot = Some(outcome.clone());
                return outcome;
            }
        }

        debug!(token, "Discarding outcome of superseded request");
        RecommendationOutcome::Superseded
    }

    async fn run(&self, request: RecommendationRequest, token: u64) -> RecommendationOutcome {
        let engine = self.engine.clone();
        let latency = self.config.latency;

        let work = async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }

            // Normalization may read an uploaded buffer; keep it (and any
            // panic it could raise) off the async thread
            let joined =
                tokio::task::spawn_blocking(move || pipeline(&engine, request)).await;

            match joined {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!(token, error = %e, "Sizing worker failed");
                    RecommendationOutcome::InternalFailure {
                        reason: "sizing worker failed unexpectedly".to_string(),
                    }
                }
            }
        };

        match tokio::time::timeout(self.config.timeout, work).await {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!(token, timeout_ms = self.config.timeout.as_millis() as u64, "Submit timed out");
                RecommendationOutcome::InternalFailure {
                    reason: "timeout".to_string(),
                }
            }
        }
    }

    /// Current session state
    pub fn state(&self) -> SessionState {
        if self.in_flight.load(Ordering::SeqCst) > 0 {
            SessionState::InFlight
        } else {
            SessionState::Idle
        }
    }

    /// The latest committed outcome, if any
    pub async fn last_outcome(&self) -> Option<RecommendationOutcome> {
        self.slot.read().await.clone()
    }

    /// Drop the stored outcome, returning the session to Idle with no
    /// result
    pub async fn clear(&self) {
        *self.slot.write().await = None;
    }
}

/// The synchronous normalize-then-size pipeline; every failure becomes a
/// value, never an abort
fn pipeline(engine: &SizingEngine, request: RecommendationRequest) -> RecommendationOutcome {
    let profile = match normalizer::normalize(request) {
        Ok(profile) => profile,
        Err(NormalizeError::Validation(errors)) => {
            return RecommendationOutcome::ValidationFailed { errors }
        }
        Err(NormalizeError::Parse(e)) => {
            return RecommendationOutcome::ParseFailed {
                reason: e.to_string(),
            }
        }
        Err(NormalizeError::Insufficient) => return RecommendationOutcome::InsufficientData,
    };

    match engine.compute(&profile) {
        Ok(recommendations) => RecommendationOutcome::Success {
            recommendations: recommendations.to_vec(),
        },
        Err(SizingError::InsufficientData) => RecommendationOutcome::InsufficientData,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn coordinator() -> RequestCoordinator {
        RequestCoordinator::new(SizingEngine::new(), CoordinatorConfig::immediate())
    }

    fn from_scratch(users: &str, workload: &str, concurrency: &str) -> RecommendationRequest {
        RecommendationRequest::FromScratch {
            total_users: users.to_string(),
            workload_type: workload.to_string(),
            user_concurrency: concurrency.to_string(),
        }
    }

    #[tokio::test]
    async fn test_submit_success() {
        let coordinator = coordinator();
        let outcome = coordinator
            .submit(from_scratch("100", "database", "25"))
            .await;

        match &outcome {
            RecommendationOutcome::Success { recommendations } => {
                assert_eq!(recommendations.len(), 3);
            }
            other => panic!("expected success, got {:?}", other),
        }

        assert_eq!(coordinator.last_outcome().await, Some(outcome));
        assert_eq!(coordinator.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn test_validation_failure_is_a_value() {
        let coordinator = coordinator();
        let outcome = coordinator.submit(from_scratch("-5", "database", "25")).await;

        match outcome {
            RecommendationOutcome::ValidationFailed { errors } => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "total_users");
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_insufficient_data_outcome() {
        let coordinator = coordinator();
        let outcome = coordinator
            .submit(RecommendationRequest::Existing {
                cpu: "fast chip".to_string(),
                ram: "plenty".to_string(),
                hard_disk: "big".to_string(),
            })
            .await;
        assert_eq!(outcome, RecommendationOutcome::InsufficientData);
    }

    #[tokio::test]
    async fn test_clear_returns_to_idle_with_no_result() {
        let coordinator = coordinator();
        coordinator
            .submit(from_scratch("100", "database", "25"))
            .await;
        assert!(coordinator.last_outcome().await.is_some());

        coordinator.clear().await;
        assert!(coordinator.last_outcome().await.is_none());
        assert_eq!(coordinator.state(), SessionState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_supersession_latest_wins() {
        let coordinator = Arc::new(RequestCoordinator::new(
            SizingEngine::new(),
            CoordinatorConfig {
                latency: Duration::from_millis(500),
                timeout: DEFAULT_TIMEOUT,
            },
        ));

        // Request A: small web workload
        let a = {
            let coordinator = coordinator.clone();
            tokio::spawn(async move { coordinator.submit(from_scratch("10", "web-server", "2")).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;

        // Request B supersedes A while A is still sleeping
        let b = {
            let coordinator = coordinator.clone();
            tokio::spawn(async move { coordinator.submit(from_scratch("100", "database", "25")).await })
        };

        let a_outcome = a.await.unwrap();
        let b_outcome = b.await.unwrap();

        assert_eq!(a_outcome, RecommendationOutcome::Superseded);
        assert!(matches!(b_outcome, RecommendationOutcome::Success { .. }));

        // The slot reflects only B
        let last = coordinator.last_outcome().await.unwrap();
        match last {
            RecommendationOutcome::Success { recommendations } => {
                // B's database workload sizes larger than A's tiny web one
                assert_eq!(recommendations[0].cpu_vcpus, 4);
            }
            other => panic!("expected B's success in the slot, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_maps_to_internal_failure() {
        let coordinator = RequestCoordinator::new(
            SizingEngine::new(),
            CoordinatorConfig {
                latency: Duration::from_secs(60),
                timeout: Duration::from_secs(1),
            },
        );

        let outcome = coordinator
            .submit(from_scratch("100", "database", "25"))
            .await;
        match outcome {
            RecommendationOutcome::InternalFailure { reason } => {
                assert_eq!(reason, "timeout");
            }
            other => panic!("expected timeout failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_outcome_serialization_tagged() {
        let outcome = RecommendationOutcome::ParseFailed {
            reason: "uploaded file is empty".to_string(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["outcome"], "parse_failed");
        assert_eq!(json["reason"], "uploaded file is empty");
    }
}
