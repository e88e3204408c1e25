//! `tdm-pipeline` — the demand pipeline orchestrator.
//!
//! Runs the stages in their fixed order, each reading state written by its
//! predecessor:
//!
//! 1. grid partitioning (zone assignment on nodes and POIs),
//! 2. trip-rate resolution for the selected purpose,
//! 3. node-level production/attraction,
//! 4. the zone-to-zone accessibility matrix,
//! 5. singly-constrained gravity distribution,
//! 6. agent sampling.
//!
//! The orchestrator owns all intermediate state and hands each stage only
//! what it reads; the finished [`DemandModel`] bundles every product for the
//! export layer.  Runs are deterministic for a given seed and input
//! snapshot — there is no incremental re-computation and no retry anywhere.

pub mod error;

#[cfg(test)]
mod tests;

use std::path::Path;

use tdm_core::{SimRng, TripPurpose};
use tdm_demand::{
    assign_node_demand, compute_accessibility, distribute, sample_agents, AccessibilityMatrix,
    DemandParams, FrictionCoefficients, RateBook, ResolvedRates, TripAgent, TripTable,
};
use tdm_grid::{GridConfig, GridPartitioner, ZoneSystem};
use tdm_net::{load_network, NetworkModel};

pub use error::{PipelineError, PipelineResult};

// ── Configuration ─────────────────────────────────────────────────────────────

/// Full configuration surface of a pipeline run.  Everything is optional in
/// spirit: the defaults reproduce a plain run with built-in rates.
#[derive(Clone, Debug, Default)]
pub struct PipelineConfig {
    pub grid: GridConfig,
    /// Trip purpose for rate resolution and friction defaults; purpose 1
    /// when unset (with a diagnostic).
    pub purpose: Option<TripPurpose>,
    /// Per-coefficient friction overrides.
    pub friction_a: Option<f64>,
    pub friction_b: Option<f64>,
    pub friction_c: Option<f64>,
    /// Latitude override for the accessibility stage, resolved independently
    /// of the partitioner's.
    pub access_latitude: Option<f64>,
    /// Fixed production/attraction for residential and boundary nodes.
    pub demand: DemandParams,
    /// Master seed for agent sampling.
    pub seed: u64,
}

// ── DemandModel ───────────────────────────────────────────────────────────────

/// Everything a finished run produced, ready for export.
#[derive(Debug)]
pub struct DemandModel {
    pub zones: ZoneSystem,
    pub rates: ResolvedRates,
    pub access: AccessibilityMatrix,
    pub trips: TripTable,
    pub agents: Vec<TripAgent>,
}

// ── DemandPipeline ────────────────────────────────────────────────────────────

/// The pipeline runner.
///
/// # Example
///
/// ```rust,ignore
/// let mut net = load_network(node_path, poi_path)?;
/// let model = DemandPipeline::new(config)
///     .rate_book(RateBook::load(Some(rate_path)))
///     .run(&mut net)?;
/// ```
pub struct DemandPipeline {
    config: PipelineConfig,
    rate_book: RateBook,
}

impl DemandPipeline {
    /// A pipeline over `config` using the built-in trip-rate defaults.
    pub fn new(config: PipelineConfig) -> Self {
        Self { config, rate_book: RateBook::builtin() }
    }

    /// Replace the trip-rate table (e.g. one loaded from a user file).
    pub fn rate_book(mut self, book: RateBook) -> Self {
        self.rate_book = book;
        self
    }

    /// Run every stage against `net`, mutating it in place (zone
    /// assignments, node demand) and returning the stage products.
    pub fn run(self, net: &mut NetworkModel) -> PipelineResult<DemandModel> {
        // Accessibility resolves its latitude from the ingested nodes, not
        // from anything the partitioner synthesizes.
        let mean_latitude = net.mean_latitude();

        log::debug!("stage 1/6: grid partition");
        let zones = GridPartitioner::new(self.config.grid.clone()).partition(net)?;

        log::debug!("stage 2/6: trip-rate resolution");
        let rates = ResolvedRates::resolve(&self.rate_book, &net.pois, self.config.purpose);

        log::debug!("stage 3/6: node demand");
        assign_node_demand(net, &rates, &self.config.demand);

        log::debug!("stage 4/6: accessibility matrix");
        let access = compute_accessibility(&zones, mean_latitude, self.config.access_latitude);

        log::debug!("stage 5/6: gravity distribution");
        let coefficients = FrictionCoefficients::resolve(
            self.config.purpose,
            self.config.friction_a,
            self.config.friction_b,
            self.config.friction_c,
        );
        let trips = distribute(&zones, net, &access, coefficients)?;

        log::debug!("stage 6/6: agent sampling");
        let mut rng = SimRng::new(self.config.seed);
        let agents = sample_agents(&trips, &zones, net, &mut rng)?;

        Ok(DemandModel { zones, rates, access, trips, agents })
    }

    /// Convenience: ingest the node/POI tables and run.
    pub fn run_from_files(
        self,
        node_path: &Path,
        poi_path: &Path,
    ) -> PipelineResult<(NetworkModel, DemandModel)> {
        let mut net = load_network(node_path, poi_path)?;
        let model = self.run(&mut net)?;
        Ok((net, model))
    }
}
