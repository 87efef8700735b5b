//! Core data models for the workload sizer

use serde::{Deserialize, Serialize};

/// Provenance of a workload profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    FromScratch,
    Existing,
    FileDerived,
}

/// Canonical, engine-internal description of a computing need,
/// independent of how it was originally described.
///
/// At least one of the user signals (`user_count`/`concurrency`) or the
/// observed hardware specs must be present, or the profile is rejected
/// before sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadProfile {
    pub source_kind: SourceKind,
    pub user_count: Option<u64>,
    pub concurrency: Option<u64>,
    /// Free-text classifier ("database", "web-server", ...), lowercased
    /// and trimmed during normalization.
    pub workload_category: Option<String>,
    pub observed_cpu: Option<String>,
    pub observed_ram: Option<String>,
    pub observed_storage: Option<String>,
}

impl WorkloadProfile {
    pub fn empty(source_kind: SourceKind) -> Self {
        Self {
            source_kind,
            user_count: None,
            concurrency: None,
            workload_category: None,
            observed_cpu: None,
            observed_ram: None,
            observed_storage: None,
        }
    }

    /// True when the profile carries no signal the engine could size from
    pub fn is_blank(&self) -> bool {
        self.user_count.is_none()
            && self.concurrency.is_none()
            && self.observed_cpu.is_none()
            && self.observed_ram.is_none()
            && self.observed_storage.is_none()
    }
}

/// Sizing class of a recommendation. The engine always returns all three,
/// in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Economy,
    Balanced,
    Performance,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Economy, Tier::Balanced, Tier::Performance];

    /// Multiplier applied to the load index for this tier
    pub fn multiplier(&self) -> f64 {
        match self {
            Tier::Economy => 0.5,
            Tier::Balanced => 1.0,
            Tier::Performance => 2.0,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tier::Economy => 0,
            Tier::Balanced => 1,
            Tier::Performance => 2,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Tier::Economy => "Economy Configuration",
            Tier::Balanced => "Balanced Configuration",
            Tier::Performance => "Performance Configuration",
        }
    }
}

/// One tiered sizing recommendation with explicit units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingRecommendation {
    pub tier: Tier,
    pub title: String,
    pub description: String,
    pub cpu_vcpus: u32,
    pub ram_gb: u32,
    pub storage_gb: u64,
    pub network_gbps: u32,
    /// Whole US dollars per month
    pub estimated_monthly_cost: u64,
}

/// A single recommendation request as submitted by the caller.
///
/// Form-captured fields arrive as raw strings; numeric validation happens
/// in the normalizer so that bad input produces field-level errors rather
/// than a deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecommendationRequest {
    FromScratch {
        total_users: String,
        workload_type: String,
        user_concurrency: String,
    },
    Existing {
        cpu: String,
        ram: String,
        hard_disk: String,
    },
    File {
        file_name: String,
        /// Base64-encoded file payload
        content: String,
    },
}

/// Row-level workload record produced by the tabular parser.
/// Every field is optional; a row with nothing recognized is skipped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowProfile {
    pub users: Option<u64>,
    pub concurrency: Option<u64>,
    pub workload: Option<String>,
    pub cpu: Option<String>,
    pub ram: Option<String>,
    pub disk: Option<String>,
}

impl RowProfile {
    /// True when no recognized column produced a value for this row
    pub fn is_empty(&self) -> bool {
        self.users.is_none()
            && self.concurrency.is_none()
            && self.workload.is_none()
            && self.cpu.is_none()
            && self.ram.is_none()
            && self.disk.is_none()
    }
}
