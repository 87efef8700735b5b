//! Workload sizing engine
//!
//! Pure tiering and cost model: derives a scalar load index from a
//! canonical profile, then produces exactly three recommendations
//! (Economy / Balanced / Performance) that are monotonic in every
//! resource dimension and in cost.

use crate::error::SizingError;
use crate::hardware::parse_spec;
use crate::models::{SizingRecommendation, SourceKind, Tier, WorkloadProfile};

/// Concurrent users one vCPU is expected to absorb
pub const LOAD_PER_VCPU: f64 = 5.0;

/// Concurrency assumed per total user when only a user count is known
pub const DEFAULT_CONCURRENCY_RATIO: f64 = 0.25;

/// Headroom applied when right-sizing an existing machine
pub const RAM_HEADROOM: f64 = 1.25;

/// RAM per core assumed when inferring core count from capacity
pub const GB_PER_CORE: f64 = 4.0;

/// Core count assumed when a spec parsed but carries no size signal
pub const DEFAULT_EXISTING_CORES: f64 = 4.0;

/// vCPU rounding ladder (power-of-two friendly steps)
const VCPU_LADDER: [u32; 7] = [2, 4, 8, 16, 32, 64, 128];

/// Network bandwidth ladder in Gbps, indexed by tier
const NETWORK_LADDER: [u32; 4] = [5, 10, 20, 40];

/// Storage is this multiple of RAM for storage-heavy categories
const STORAGE_RATIO_HEAVY: u64 = 16;
const STORAGE_RATIO_DEFAULT: u64 = 8;

/// Per-unit monthly rates in whole-dollar arithmetic
const CPU_RATE: f64 = 14.0;
const RAM_RATE: f64 = 3.0;
const STORAGE_RATE: f64 = 0.10;
const NETWORK_RATE: f64 = 2.0;

/// Cost model rates, overridable for alternative pricing tables
#[derive(Debug, Clone)]
pub struct CostRates {
    pub cpu_per_vcpu: f64,
    pub ram_per_gb: f64,
    pub storage_per_gb: f64,
    pub network_per_gbps: f64,
}

impl Default for CostRates {
    fn default() -> Self {
        Self {
            cpu_per_vcpu: CPU_RATE,
            ram_per_gb: RAM_RATE,
            storage_per_gb: STORAGE_RATE,
            network_per_gbps: NETWORK_RATE,
        }
    }
}

/// Pure, deterministic sizing engine
#[derive(Debug, Clone, Default)]
pub struct SizingEngine {
    rates: CostRates,
}

impl SizingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rates(rates: CostRates) -> Self {
        Self { rates }
    }

    /// Compute the three tiered recommendations for a profile.
    ///
    /// Fails only when the profile yields no usable load signal; all
    /// partial parse failures degrade gracefully before this point.
    pub fn compute(
        &self,
        profile: &WorkloadProfile,
    ) -> Result<[SizingRecommendation; 3], SizingError> {
        let load = self.load_index(profile)?;

        Ok(Tier::ALL.map(|tier| self.recommend(profile, tier, load)))
    }

    /// Derive the scalar load index from whichever signals the profile has
    fn load_index(&self, profile: &WorkloadProfile) -> Result<f64, SizingError> {
        if let Some(concurrency) = self.effective_concurrency(profile) {
            let weight = category_weight(profile.workload_category.as_deref());
            return Ok(concurrency * weight);
        }
        self.load_from_observed(profile)
    }

    fn effective_concurrency(&self, profile: &WorkloadProfile) -> Option<f64> {
        if let Some(c) = profile.concurrency {
            return Some(c as f64);
        }
        profile
            .user_count
            .map(|u| u as f64 * DEFAULT_CONCURRENCY_RATIO)
    }

    /// "Right-size the current box": infer an equivalent core count from
    /// the observed specs, with headroom.
    fn load_from_observed(&self, profile: &WorkloadProfile) -> Result<f64, SizingError> {
        let cpu = profile.observed_cpu.as_deref().and_then(parse_spec);
        let ram = profile.observed_ram.as_deref().and_then(parse_spec);
        let storage = profile.observed_storage.as_deref().and_then(parse_spec);

        if cpu.is_none() && ram.is_none() && storage.is_none() {
            return Err(SizingError::InsufficientData);
        }

        let ram_gb = ram.and_then(|s| s.as_gigabytes());
        let storage_gb = storage.and_then(|s| s.as_gigabytes());

        let cores = cpu
            .and_then(|s| s.as_cores())
            .or_else(|| ram_gb.map(|gb| gb / GB_PER_CORE))
            .or_else(|| storage_gb.map(|gb| gb / STORAGE_RATIO_HEAVY as f64 / GB_PER_CORE))
            .unwrap_or(DEFAULT_EXISTING_CORES);

        Ok(cores.max(1.0) * RAM_HEADROOM * LOAD_PER_VCPU)
    }

    fn recommend(
        &self,
        profile: &WorkloadProfile,
        tier: Tier,
        load: f64,
    ) -> SizingRecommendation {
        let tier_load = load * tier.multiplier();

        let cpu_vcpus = snap_vcpus(tier_load / LOAD_PER_VCPU);
        let ram_gb = (4 * cpu_vcpus).max(ceil4(tier_load));
        let storage_gb =
            ram_gb as u64 * storage_ratio(profile.workload_category.as_deref());
        let network_gbps = network_step(tier, cpu_vcpus);

        let cost = self.rates.cpu_per_vcpu * cpu_vcpus as f64
            + self.rates.ram_per_gb * ram_gb as f64
            + self.rates.storage_per_gb * storage_gb as f64
            + self.rates.network_per_gbps * network_gbps as f64;

        SizingRecommendation {
            tier,
            title: tier.title().to_string(),
            description: describe(tier, profile.source_kind),
            cpu_vcpus,
            ram_gb,
            storage_gb,
            network_gbps,
            estimated_monthly_cost: cost.round().max(0.0) as u64,
        }
    }
}

/// Demand multiplier for known workload categories
fn category_weight(category: Option<&str>) -> f64 {
    match category {
        Some("database") | Some("db") => 1.5,
        Some("analytics") => 1.8,
        _ => 1.0,
    }
}

fn storage_ratio(category: Option<&str>) -> u64 {
    match category {
        Some("database") | Some("db") | Some("analytics") => STORAGE_RATIO_HEAVY,
        _ => STORAGE_RATIO_DEFAULT,
    }
}

/// Snap a raw vCPU figure to the nearest ladder step, ties rounding up
fn snap_vcpus(raw: f64) -> u32 {
    let mut best = VCPU_LADDER[0];
    let mut best_dist = f64::INFINITY;
    for &step in &VCPU_LADDER {
        let dist = (raw - step as f64).abs();
        if dist < best_dist || (dist == best_dist && step > best) {
            best = step;
            best_dist = dist;
        }
    }
    best
}

fn ceil4(value: f64) -> u32 {
    ((value / 4.0).ceil() * 4.0).max(4.0) as u32
}

/// Network bandwidth keyed to tier, bumped one step for large machines
fn network_step(tier: Tier, cpu_vcpus: u32) -> u32 {
    let mut idx = tier.index();
    if cpu_vcpus >= 32 {
        idx += 1;
    }
    NETWORK_LADDER[idx.min(NETWORK_LADDER.len() - 1)]
}

fn describe(tier: Tier, source: SourceKind) -> String {
    let basis = match source {
        SourceKind::FromScratch => "your projected user load",
        SourceKind::Existing => "your current hardware",
        SourceKind::FileDerived => "the uploaded workload data",
    };
    let angle = match tier {
        Tier::Economy => "Cost-effective configuration",
        Tier::Balanced => "Optimal balance of performance and cost",
        Tier::Performance => "Higher performance for demanding workloads",
    };
    format!("{} sized from {}", angle, basis)
}
