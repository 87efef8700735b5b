//! Core library for the workload sizer
//!
//! This crate provides the sizing and recommendation pipeline:
//! - Normalization of heterogeneous workload descriptions
//! - Tabular upload decoding (CSV/XLS/XLSX)
//! - The tiered sizing engine and cost model
//! - Request coordination (single slot, latest submission wins)
//! - Health checks and observability

pub mod coordinator;
pub mod engine;
pub mod error;
pub mod hardware;
pub mod health;
pub mod models;
pub mod normalizer;
pub mod observability;
pub mod tabular;

pub use coordinator::{
    CoordinatorConfig, RecommendationOutcome, RequestCoordinator, SessionState,
};
pub use engine::SizingEngine;
pub use error::{FieldError, NormalizeError, ParseError, SizingError};
pub use health::{ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse};
pub use models::*;
pub use observability::{SizerLogger, SizerMetrics};
