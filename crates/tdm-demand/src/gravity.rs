//! Singly-constrained gravity distribution.
//!
//! Zone production and attraction are aggregated from demand-bearing member
//! nodes, a distance-decay friction weight is applied to the accessibility
//! matrix, and each origin's production is spread across destinations in
//! proportion to attraction-weighted friction.  One shot — no iterative
//! balancing loop.

use tdm_core::TripPurpose;
use tdm_grid::ZoneSystem;
use tdm_net::NetworkModel;

use crate::access::AccessibilityMatrix;
use crate::matrix::ZoneMatrix;
use crate::{DemandError, DemandResult};

/// Guard against zero total attraction-weighted friction at an origin.
const MIN_ATTRACTION_FRICTION: f64 = 1e-6;

// ── FrictionCoefficients ──────────────────────────────────────────────────────

/// Coefficients of the friction function `F(d) = a · d^b · e^(c·d)`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FrictionCoefficients {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl FrictionCoefficients {
    /// Calibrated defaults per trip purpose.
    pub fn defaults_for(purpose: TripPurpose) -> Self {
        match purpose {
            TripPurpose::HomeBasedWork => Self { a: 28507.0, b: -0.02, c: -0.123 },
            TripPurpose::HomeBasedOther => Self { a: 139173.0, b: -1.285, c: -0.094 },
            TripPurpose::NonHomeBased => Self { a: 219113.0, b: -1.332, c: -0.1 },
        }
    }

    /// Resolve the effective coefficients: the purpose's defaults (purpose 1
    /// when unset, with a diagnostic) overridden per coefficient by any
    /// caller-supplied values.
    pub fn resolve(
        purpose: Option<TripPurpose>,
        a: Option<f64>,
        b: Option<f64>,
        c: Option<f64>,
    ) -> Self {
        let purpose = purpose.unwrap_or_else(|| {
            log::warn!("trip purpose not given; using purpose 1 friction defaults");
            TripPurpose::HomeBasedWork
        });
        let defaults = Self::defaults_for(purpose);
        let resolved = Self {
            a: a.unwrap_or(defaults.a),
            b: b.unwrap_or(defaults.b),
            c: c.unwrap_or(defaults.c),
        };
        log::info!(
            "friction coefficients for purpose {purpose}: a={}, b={}, c={}",
            resolved.a,
            resolved.b,
            resolved.c
        );
        resolved
    }

    /// Friction weight for a distance in kilometres; 0 at zero distance.
    #[inline]
    pub fn friction(&self, distance_km: f64) -> f64 {
        if distance_km == 0.0 {
            0.0
        } else {
            self.a * distance_km.powf(self.b) * (self.c * distance_km).exp()
        }
    }
}

// ── TripTable ─────────────────────────────────────────────────────────────────

/// The distribution product: dense OD volumes plus the intermediate friction
/// matrix and the zone totals they were computed from.
#[derive(Debug)]
pub struct TripTable {
    pub volumes: ZoneMatrix,
    pub friction: ZoneMatrix,
    /// Total production per zone, in zone order.
    pub zone_production: Vec<f64>,
    /// Total attraction per zone, in zone order.
    pub zone_attraction: Vec<f64>,
    pub coefficients: FrictionCoefficients,
}

/// Distribute zonal production across destinations.
///
/// Volumes are left unrounded here; the ceiling to whole trips happens only
/// when the demand table is materialized for agent generation.
pub fn distribute(
    zones: &ZoneSystem,
    net: &NetworkModel,
    access: &AccessibilityMatrix,
    coefficients: FrictionCoefficients,
) -> DemandResult<TripTable> {
    let n = zones.len();

    // ── Zone totals over demand-bearing member nodes ──────────────────────
    let mut zone_production = vec![0.0; n];
    let mut zone_attraction = vec![0.0; n];
    let mut demand_nodes = 0usize;
    for node in &net.nodes {
        if !node.kind.bears_demand() {
            continue;
        }
        let Some(index) = node.zone.and_then(|z| zones.index_of(z)) else {
            continue;
        };
        zone_production[index] += node.production;
        zone_attraction[index] += node.attraction;
        demand_nodes += 1;
    }
    if demand_nodes == 0 {
        return Err(DemandError::NoDemandSource);
    }

    // ── Friction matrix ───────────────────────────────────────────────────
    let mut friction = ZoneMatrix::zeros(n);
    for i in 0..n {
        for j in 0..n {
            friction.set(i, j, coefficients.friction(access.distances.get(i, j)));
        }
    }

    // ── Attraction-weighted friction per origin, then volumes ─────────────
    let mut volumes = ZoneMatrix::zeros(n);
    for i in 0..n {
        let total: f64 = (0..n)
            .map(|j| zone_attraction[j] * friction.get(i, j))
            .sum();
        let denominator = total.max(MIN_ATTRACTION_FRICTION);
        for j in 0..n {
            let volume =
                zone_production[i] * zone_attraction[j] * friction.get(i, j) / denominator;
            volumes.set(i, j, volume);
        }
    }

    Ok(TripTable {
        volumes,
        friction,
        zone_production,
        zone_attraction,
        coefficients,
    })
}
